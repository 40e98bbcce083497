pub mod application_service;
pub mod authorization;
pub mod campus_service;
pub mod eligibility_service;
pub mod job_service;
pub mod user_service;

#[cfg(test)]
pub(crate) mod test_support;
