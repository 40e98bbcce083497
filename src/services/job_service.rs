use crate::dto::job_dto::{student_ids, CreateJobPayload, JobListQuery, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::Job;
use crate::models::user::User;
use crate::services::authorization::{require_admin, require_admin_or_owner, require_admin_or_self, require_student};
use crate::services::eligibility_service::{self, CriteriaReport, JobBuckets};
use crate::store::{ApplicationFilter, JobFilter, Store};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn Store>,
}

#[derive(Debug)]
pub struct JobList {
    pub items: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl JobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn load(&self, job_id: Uuid) -> Result<Job> {
        self.store
            .find_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    pub async fn create(&self, actor: &User, payload: CreateJobPayload, now: DateTime<Utc>) -> Result<Job> {
        require_admin(actor, "Only admins can create jobs")?;
        let new_job = payload.into_new_job()?;

        let job = Job {
            id: Uuid::new_v4(),
            company_name: new_job.company_name.trim().to_string(),
            title: new_job.title.trim().to_string(),
            description: new_job.description,
            eligibility: new_job.eligibility,
            deadline: new_job.deadline,
            campuses: trimmed(new_job.campuses),
            allowed_students: new_job.allowed_students,
            created_by: actor.id,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_job(&job).await?;

        tracing::info!(job = %job.id, admin = %actor.id, company = %job.company_name, "job created");
        Ok(job)
    }

    /// Merges the supplied fields into the job. Allowed for admins and the job's creator.
    pub async fn update(
        &self,
        actor: &User,
        job_id: Uuid,
        payload: UpdateJobPayload,
        now: DateTime<Utc>,
    ) -> Result<Job> {
        let mut job = self.load(job_id).await?;
        require_admin_or_owner(actor, job.created_by, "Not authorized to update this job")?;
        payload.validate()?;

        if let Some(company_name) = payload.company_name {
            job.company_name = company_name.trim().to_string();
        }
        if let Some(title) = payload.title {
            job.title = title.trim().to_string();
        }
        if let Some(description) = payload.description {
            job.description = description;
        }
        if let Some(eligibility) = payload.eligibility {
            eligibility.merge_into(&mut job.eligibility);
        }
        if let Some(deadline) = payload.deadline {
            job.deadline = deadline;
        }
        if let Some(campuses) = payload.campuses {
            job.campuses = trimmed(campuses);
        }
        if let Some(allowed_students) = payload.allowed_students {
            job.allowed_students = student_ids(&allowed_students);
        }
        job.updated_at = now;

        self.store.save_job(&job).await?;
        tracing::info!(job = %job.id, actor = %actor.id, "job updated");
        Ok(job)
    }

    /// Removes the job and every application that references it.
    ///
    /// Not atomic: applications go first, so a failure part-way leaves the job in
    /// place and the delete can simply be retried.
    pub async fn delete(&self, actor: &User, job_id: Uuid) -> Result<()> {
        let job = self.load(job_id).await?;
        require_admin_or_owner(actor, job.created_by, "Not authorized to delete this job")?;

        let removed = self.store.delete_applications_for_job(job.id).await?;
        if !self.store.delete_job(job.id).await? {
            return Err(Error::NotFound("Job not found".to_string()));
        }

        tracing::info!(job = %job.id, actor = %actor.id, applications = removed, "job deleted");
        Ok(())
    }

    pub async fn get(&self, job_id: Uuid) -> Result<Job> {
        self.load(job_id).await
    }

    pub async fn list(&self, query: JobListQuery) -> Result<JobList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| Error::BadRequest("page is out of range".to_string()))?;

        let filter = JobFilter {
            search,
            offset: Some(offset),
            limit: Some(per_page),
        };
        let items = self.store.find_jobs(&filter).await?;
        let total = self.store.count_jobs(&filter).await?;
        let total_pages = (total + per_page - 1) / per_page;

        Ok(JobList {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    async fn buckets_for(&self, actor: &User, now: DateTime<Utc>) -> Result<JobBuckets> {
        require_student(actor, "Only students have job listings")?;
        let jobs = self.store.find_jobs(&JobFilter::default()).await?;
        let applications = self
            .store
            .find_applications(&ApplicationFilter::for_student(actor.id))
            .await?;
        Ok(eligibility_service::classify(
            actor,
            jobs,
            &applications,
            now.date_naive(),
        ))
    }

    /// Jobs the student can still apply to.
    pub async fn available(&self, actor: &User, now: DateTime<Utc>) -> Result<Vec<Job>> {
        Ok(self.buckets_for(actor, now).await?.available)
    }

    /// Jobs the student missed: past deadline, never applied to or rejected.
    pub async fn over_deadline(&self, actor: &User, now: DateTime<Utc>) -> Result<Vec<Job>> {
        Ok(self.buckets_for(actor, now).await?.over_deadline)
    }

    pub async fn eligibility_report(
        &self,
        actor: &User,
        job_id: Uuid,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<CriteriaReport> {
        require_admin_or_self(actor, student_id, "Not authorized to view this report")?;
        let job = self.load(job_id).await?;
        let student = self
            .store
            .find_user(student_id)
            .await?
            .filter(User::is_student)
            .ok_or_else(|| Error::NotFound("Student not found".to_string()))?;

        Ok(eligibility_service::evaluate_criteria(
            &student,
            &job,
            now.date_naive(),
        ))
    }
}

fn trimmed(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::job_dto::EligibilityCriteriaPayload;
    use crate::models::application::{Application, ApplicationStatus};
    use crate::services::test_support::{admin, at, student};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use tokio_test::{assert_err, assert_ok};

    fn payload(deadline: &str) -> CreateJobPayload {
        CreateJobPayload {
            company_name: "Tech Corp".into(),
            title: "Frontend Developer".into(),
            description: "Build product UI".into(),
            eligibility: Some(EligibilityCriteriaPayload {
                branches: Some(vec!["Computer Science".into()]),
                years: Some(vec![4]),
                min_cgpa: Some(Decimal::new(70, 1)),
                required_skills: Some(vec!["React".into()]),
            }),
            deadline: crate::utils::time::parse_day(deadline),
            campuses: vec![" BCA Himachal ".into()],
            allowed_students: Vec::new(),
        }
    }

    async fn setup() -> (JobService, Arc<MemoryStore>, User, User) {
        let store = Arc::new(MemoryStore::new());
        let admin = admin();
        let student = student("Raj Kumar");
        assert_ok!(store.insert_user(&admin).await);
        assert_ok!(store.insert_user(&student).await);
        (JobService::new(store.clone()), store, admin, student)
    }

    #[tokio::test]
    async fn only_admins_create_jobs() {
        let (service, _, admin, student) = setup().await;

        let err = assert_err!(service.create(&student, payload("2025-04-01"), at(2025, 3, 1)).await);
        assert!(matches!(err, Error::Forbidden(_)));

        let job = assert_ok!(service.create(&admin, payload("2025-04-01"), at(2025, 3, 1)).await);
        assert_eq!(job.created_by, admin.id);
        assert_eq!(job.campuses, vec!["BCA Himachal".to_string()]);
        assert_eq!(job.eligibility.min_cgpa, Decimal::new(70, 1));
    }

    #[tokio::test]
    async fn create_requires_campus_and_deadline() {
        let (service, _, admin, _) = setup().await;

        let mut no_campus = payload("2025-04-01");
        no_campus.campuses.clear();
        let err = assert_err!(service.create(&admin, no_campus, at(2025, 3, 1)).await);
        assert_eq!(err.kind(), "validation_error");

        let mut no_deadline = payload("2025-04-01");
        no_deadline.deadline = None;
        let err = assert_err!(service.create(&admin, no_deadline, at(2025, 3, 1)).await);
        assert_eq!(err.kind(), "validation_error");

        let mut mistyped = payload("2025-04-01");
        mistyped.allowed_students = vec!["not-a-uuid-typo".into()];
        let err = assert_err!(service.create(&admin, mistyped, at(2025, 3, 1)).await);
        assert_eq!(err.kind(), "validation_error");
    }

    #[tokio::test]
    async fn deleting_a_job_removes_its_applications() {
        let (service, store, admin, _) = setup().await;
        let job = assert_ok!(service.create(&admin, payload("2025-04-01"), at(2025, 3, 1)).await);

        let mut application_ids = Vec::new();
        for name in ["A", "B", "C"] {
            let s = student(name);
            assert_ok!(store.insert_user(&s).await);
            let application = Application::new(s.id, job.id, ApplicationStatus::Applied, at(2025, 3, 2));
            assert_ok!(store.insert_application(&application).await);
            application_ids.push(application.id);
        }

        assert_ok!(service.delete(&admin, job.id).await);

        let err = assert_err!(service.get(job.id).await);
        assert!(matches!(err, Error::NotFound(_)));
        for id in application_ids {
            assert_eq!(assert_ok!(store.find_application(id).await), None);
        }
    }

    #[tokio::test]
    async fn update_merges_and_checks_ownership() {
        let (service, _, admin, student) = setup().await;
        let job = assert_ok!(service.create(&admin, payload("2025-04-01"), at(2025, 3, 1)).await);

        let err = assert_err!(
            service
                .update(&student, job.id, UpdateJobPayload::default(), at(2025, 3, 2))
                .await
        );
        assert!(matches!(err, Error::Forbidden(_)));

        let updated = assert_ok!(
            service
                .update(
                    &admin,
                    job.id,
                    UpdateJobPayload {
                        title: Some("Senior Frontend Developer".into()),
                        eligibility: Some(EligibilityCriteriaPayload {
                            min_cgpa: Some(Decimal::new(75, 1)),
                            ..Default::default()
                        }),
                        ..Default::default()
                    },
                    at(2025, 3, 2),
                )
                .await
        );
        assert_eq!(updated.title, "Senior Frontend Developer");
        assert_eq!(updated.company_name, "Tech Corp");
        assert_eq!(updated.eligibility.min_cgpa, Decimal::new(75, 1));
        assert_eq!(updated.eligibility.years, vec![4]);
        assert_eq!(updated.updated_at, at(2025, 3, 2));

        let mut emptied = UpdateJobPayload::default();
        emptied.campuses = Some(Vec::new());
        assert!(service.update(&admin, job.id, emptied, at(2025, 3, 3)).await.is_err());
    }

    #[tokio::test]
    async fn listing_pages_and_searches() {
        let (service, _, admin, _) = setup().await;
        for i in 0..12 {
            let mut p = payload("2025-04-01");
            p.title = format!("Role {}", i);
            assert_ok!(service.create(&admin, p, at(2025, 3, 1)).await);
        }
        let mut rust = payload("2025-04-01");
        rust.company_name = "Ferrous Systems".into();
        assert_ok!(service.create(&admin, rust, at(2025, 3, 1)).await);

        let first = assert_ok!(service.list(JobListQuery::default()).await);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 13);
        assert_eq!(first.total_pages, 2);

        let far = assert_err!(
            service
                .list(JobListQuery {
                    page: Some(i64::MAX),
                    ..Default::default()
                })
                .await
        );
        assert_eq!(far.kind(), "validation_error");

        let found = assert_ok!(
            service
                .list(JobListQuery {
                    search: Some("ferrous".into()),
                    ..Default::default()
                })
                .await
        );
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].company_name, "Ferrous Systems");
    }

    #[tokio::test]
    async fn student_buckets_follow_deadline_and_history() {
        let (service, store, admin, student) = setup().await;
        let open = assert_ok!(service.create(&admin, payload("2025-04-01"), at(2025, 3, 1)).await);
        let closed = assert_ok!(service.create(&admin, payload("2025-02-01"), at(2025, 1, 1)).await);
        let applied = assert_ok!(service.create(&admin, payload("2025-04-05"), at(2025, 3, 1)).await);
        assert_ok!(
            store
                .insert_application(&Application::new(
                    student.id,
                    applied.id,
                    ApplicationStatus::Applied,
                    at(2025, 3, 2)
                ))
                .await
        );

        let now = at(2025, 3, 10);
        let available = assert_ok!(service.available(&student, now).await);
        assert_eq!(available, vec![open]);
        let over = assert_ok!(service.over_deadline(&student, now).await);
        assert_eq!(over, vec![closed]);

        assert!(service.available(&admin, now).await.is_err());
    }

    #[tokio::test]
    async fn eligibility_report_is_self_or_admin() {
        let (service, store, admin, student) = setup().await;
        let other = crate::services::test_support::student("Priya Singh");
        assert_ok!(store.insert_user(&other).await);
        let job = assert_ok!(service.create(&admin, payload("2025-04-01"), at(2025, 3, 1)).await);

        let report = assert_ok!(
            service
                .eligibility_report(&student, job.id, student.id, at(2025, 3, 10))
                .await
        );
        assert!(report.overall);

        let err = assert_err!(
            service
                .eligibility_report(&other, job.id, student.id, at(2025, 3, 10))
                .await
        );
        assert!(matches!(err, Error::Forbidden(_)));

        assert_ok!(
            service
                .eligibility_report(&admin, job.id, other.id, at(2025, 3, 10))
                .await
        );
    }
}
