use super::{ApplicationFilter, JobFilter, Store, UserFilter};
use crate::error::{Error, Result};
use crate::models::{application::Application, campus::Campus, job::Job, user::User};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store used in development and tests.
///
/// Every write happens under one lock, which makes the uniqueness checks atomic
/// for a single instance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    campuses: Vec<Campus>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn job_matches(job: &Job, filter: &JobFilter) -> bool {
    match filter.search.as_deref() {
        Some(search) if !search.is_empty() => {
            let needle = search.to_lowercase();
            contains_ci(&job.company_name, &needle)
                || contains_ci(&job.title, &needle)
                || contains_ci(&job.description, &needle)
        }
        _ => true,
    }
}

fn application_matches(application: &Application, filter: &ApplicationFilter) -> bool {
    filter.student_id.map_or(true, |id| application.student_id == id)
        && filter.job_id.map_or(true, |id| application.job_id == id)
        && filter.status.map_or(true, |status| application.status == status)
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id == user.id || u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(Error::AlreadyExists(
                "A user with this email already exists".to_string(),
            ));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let tables = self.inner.read().await;
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| filter.role.map_or(true, |role| u.role == role))
            .filter(|u| match needle.as_deref() {
                Some(n) => contains_ci(&u.name, n) || contains_ci(&u.email, n),
                None => true,
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(Error::AlreadyExists(
                "A user with this email already exists".to_string(),
            ));
        }
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        *slot = user.clone();
        Ok(())
    }

    async fn insert_job(&self, job: &Job) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables.jobs.iter().any(|j| j.id == job.id) {
            return Err(Error::AlreadyExists("Job already exists".to_string()));
        }
        tables.jobs.push(job.clone());
        Ok(())
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        let tables = self.inner.read().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let tables = self.inner.read().await;
        let mut jobs: Vec<Job> = tables
            .jobs
            .iter()
            .filter(|j| job_matches(j, filter))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(jobs.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_jobs(&self, filter: &JobFilter) -> Result<i64> {
        let tables = self.inner.read().await;
        Ok(tables.jobs.iter().filter(|j| job_matches(j, filter)).count() as i64)
    }

    async fn save_job(&self, job: &Job) -> Result<()> {
        let mut tables = self.inner.write().await;
        let slot = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        *slot = job.clone();
        Ok(())
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.inner.write().await;
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        Ok(tables.jobs.len() != before)
    }

    async fn insert_application(&self, application: &Application) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables.applications.iter().any(|a| {
            a.id == application.id
                || (a.student_id == application.student_id && a.job_id == application.job_id)
        }) {
            return Err(Error::AlreadyExists(
                "An application for this student and job already exists".to_string(),
            ));
        }
        tables.applications.push(application.clone());
        Ok(())
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        let tables = self.inner.read().await;
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_application_for(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>> {
        let tables = self.inner.read().await;
        Ok(tables
            .applications
            .iter()
            .find(|a| a.student_id == student_id && a.job_id == job_id)
            .cloned())
    }

    async fn find_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>> {
        let tables = self.inner.read().await;
        let mut applications: Vec<Application> = tables
            .applications
            .iter()
            .filter(|a| application_matches(a, filter))
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }

    async fn save_application(&self, application: &Application) -> Result<()> {
        let mut tables = self.inner.write().await;
        let slot = tables
            .applications
            .iter_mut()
            .find(|a| a.id == application.id)
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        *slot = application.clone();
        Ok(())
    }

    async fn delete_applications_for_job(&self, job_id: Uuid) -> Result<u64> {
        let mut tables = self.inner.write().await;
        let before = tables.applications.len();
        tables.applications.retain(|a| a.job_id != job_id);
        Ok((before - tables.applications.len()) as u64)
    }

    async fn insert_campus(&self, campus: &Campus) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables
            .campuses
            .iter()
            .any(|c| c.id == campus.id || c.name.eq_ignore_ascii_case(&campus.name))
        {
            return Err(Error::AlreadyExists(
                "Campus with this name already exists".to_string(),
            ));
        }
        tables.campuses.push(campus.clone());
        Ok(())
    }

    async fn find_campus(&self, id: Uuid) -> Result<Option<Campus>> {
        let tables = self.inner.read().await;
        Ok(tables.campuses.iter().find(|c| c.id == id).cloned())
    }

    async fn find_campus_by_name(&self, name: &str) -> Result<Option<Campus>> {
        let tables = self.inner.read().await;
        Ok(tables
            .campuses
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_campuses(&self) -> Result<Vec<Campus>> {
        let tables = self.inner.read().await;
        let mut campuses = tables.campuses.clone();
        campuses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(campuses)
    }

    async fn save_campus(&self, campus: &Campus) -> Result<()> {
        let mut tables = self.inner.write().await;
        if tables
            .campuses
            .iter()
            .any(|c| c.id != campus.id && c.name.eq_ignore_ascii_case(&campus.name))
        {
            return Err(Error::AlreadyExists(
                "Campus with this name already exists".to_string(),
            ));
        }
        let slot = tables
            .campuses
            .iter_mut()
            .find(|c| c.id == campus.id)
            .ok_or_else(|| Error::NotFound("Campus not found".to_string()))?;
        *slot = campus.clone();
        Ok(())
    }

    async fn delete_campus(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.inner.write().await;
        let before = tables.campuses.len();
        tables.campuses.retain(|c| c.id != id);
        Ok(tables.campuses.len() != before)
    }
}
