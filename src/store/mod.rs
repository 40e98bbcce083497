//! Durable records for users, jobs, applications and campuses.
//!
//! Both backends enforce the same uniqueness rules and report a violation as
//! [`Error::AlreadyExists`](crate::error::Error::AlreadyExists), so callers treat a
//! store-level conflict exactly like a failed pre-check.

pub mod memory;
pub mod postgres;

use crate::error::Result;
use crate::models::{
    application::{Application, ApplicationStatus},
    campus::Campus,
    job::Job,
    user::{Role, User},
};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    /// Case-insensitive match on name or email.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive match on company, title or description.
    pub search: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub student_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
}

impl ApplicationFilter {
    pub fn for_student(student_id: Uuid) -> Self {
        Self {
            student_id: Some(student_id),
            ..Self::default()
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<()>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Newest first.
    async fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>>;
    async fn save_user(&self, user: &User) -> Result<()>;

    async fn insert_job(&self, job: &Job) -> Result<()>;
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>>;
    /// Newest first, paged by `offset`/`limit` when given.
    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>>;
    /// Ignores paging.
    async fn count_jobs(&self, filter: &JobFilter) -> Result<i64>;
    async fn save_job(&self, job: &Job) -> Result<()>;
    async fn delete_job(&self, id: Uuid) -> Result<bool>;

    async fn insert_application(&self, application: &Application) -> Result<()>;
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>>;
    async fn find_application_for(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>>;
    /// Most recently applied first.
    async fn find_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>>;
    async fn save_application(&self, application: &Application) -> Result<()>;
    async fn delete_applications_for_job(&self, job_id: Uuid) -> Result<u64>;

    async fn insert_campus(&self, campus: &Campus) -> Result<()>;
    async fn find_campus(&self, id: Uuid) -> Result<Option<Campus>>;
    /// Case-insensitive exact match.
    async fn find_campus_by_name(&self, name: &str) -> Result<Option<Campus>>;
    /// Sorted by name.
    async fn find_campuses(&self) -> Result<Vec<Campus>>;
    async fn save_campus(&self, campus: &Campus) -> Result<()>;
    async fn delete_campus(&self, id: Uuid) -> Result<bool>;
}
