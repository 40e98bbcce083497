use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::Job;
use crate::models::user::User;
use crate::services::authorization::{require_admin, require_admin_or_student_self, require_student};
use crate::store::{ApplicationFilter, Store};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

const DUPLICATE_APPLICATION: &str = "Already applied to this job";

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn Store>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn load_job(&self, job_id: Uuid) -> Result<Job> {
        self.store
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    /// Creates an `Applied` record for the acting student.
    ///
    /// A job whose deadline is today still accepts applications.
    pub async fn submit(&self, actor: &User, job_id: Uuid, now: DateTime<Utc>) -> Result<Application> {
        require_student(actor, "Only students can apply to jobs")?;
        let job = self.load_job(job_id).await?;

        if !job.is_open_on(now.date_naive()) {
            return Err(Error::DeadlinePassed);
        }

        if self
            .store
            .find_application_for(actor.id, job.id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyExists(DUPLICATE_APPLICATION.to_string()));
        }

        let application = Application::new(actor.id, job.id, ApplicationStatus::Applied, now);
        match self.store.insert_application(&application).await {
            Ok(()) => {}
            // Lost a race with a concurrent submit for the same pair.
            Err(Error::AlreadyExists(_)) => {
                return Err(Error::AlreadyExists(DUPLICATE_APPLICATION.to_string()))
            }
            Err(e) => return Err(e),
        }

        tracing::info!(
            application = %application.id,
            student = %actor.id,
            job = %job.id,
            "application submitted"
        );
        Ok(application)
    }

    /// Marks the job as declined by the student, creating the record when none exists.
    ///
    /// Allowed past the deadline.
    pub async fn reject(&self, actor: &User, job_id: Uuid, now: DateTime<Utc>) -> Result<Application> {
        require_student(actor, "Only students can reject jobs")?;
        let job = self.load_job(job_id).await?;

        if let Some(existing) = self.store.find_application_for(actor.id, job.id).await? {
            return self.mark_rejected(existing, now).await;
        }

        let application = Application::new(actor.id, job.id, ApplicationStatus::Rejected, now);
        match self.store.insert_application(&application).await {
            Ok(()) => {
                tracing::info!(student = %actor.id, job = %job.id, "job rejected by student");
                Ok(application)
            }
            Err(Error::AlreadyExists(_)) => {
                let existing = self
                    .store
                    .find_application_for(actor.id, job.id)
                    .await?
                    .ok_or_else(|| Error::Internal("application vanished during reject".to_string()))?;
                self.mark_rejected(existing, now).await
            }
            Err(e) => Err(e),
        }
    }

    async fn mark_rejected(&self, mut application: Application, now: DateTime<Utc>) -> Result<Application> {
        if application.status == ApplicationStatus::Selected {
            tracing::warn!(
                application = %application.id,
                "student rejecting a job they were selected for"
            );
        }
        application.transition(ApplicationStatus::Rejected, now);
        self.store.save_application(&application).await?;
        tracing::info!(
            application = %application.id,
            student = %application.student_id,
            job = %application.job_id,
            "job rejected by student"
        );
        Ok(application)
    }

    /// Admin-only move to any status except `Applied`. Any prior status may be overwritten.
    pub async fn set_status(
        &self,
        actor: &User,
        application_id: Uuid,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Application> {
        require_admin(actor, "Only admins can update application status")?;
        if !status.is_admin_target() {
            return Err(Error::InvalidStatus(format!(
                "Status must be one of Shortlisted, Selected, Rejected (got {})",
                status
            )));
        }

        let mut application = self
            .store
            .find_application(application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        let previous = application.status;
        application.transition(status, now);
        self.store.save_application(&application).await?;

        tracing::info!(
            application = %application.id,
            admin = %actor.id,
            from = %previous,
            to = %status,
            "application status updated"
        );
        Ok(application)
    }

    pub async fn get(&self, actor: &User, application_id: Uuid) -> Result<Application> {
        let application = self
            .store
            .find_application(application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        require_admin_or_student_self(
            actor,
            application.student_id,
            "Not authorized to view this application",
        )?;
        Ok(application)
    }

    /// The acting student's own applications, newest first.
    pub async fn list_mine(&self, actor: &User) -> Result<Vec<Application>> {
        require_student(actor, "Only students have applications")?;
        self.store
            .find_applications(&ApplicationFilter::for_student(actor.id))
            .await
    }

    /// Admins see everything the filter matches. Students are narrowed to their own
    /// records and may only filter by status.
    pub async fn list(&self, actor: &User, filter: ApplicationFilter) -> Result<Vec<Application>> {
        let filter = if actor.is_admin() {
            filter
        } else {
            ApplicationFilter {
                status: filter.status,
                ..ApplicationFilter::for_student(actor.id)
            }
        };
        self.store.find_applications(&filter).await
    }
}
