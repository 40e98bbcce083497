pub mod application;
pub mod campus;
pub mod job;
pub mod user;
