use super::{ApplicationFilter, JobFilter, Store, UserFilter};
use crate::error::{Error, Result};
use crate::models::{
    application::Application,
    campus::Campus,
    job::{EligibilityCriteria, Job},
    user::User,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, branch, year, cgpa, skills, campus, created_at, updated_at";
const JOB_COLUMNS: &str = "id, company_name, title, description, eligible_branches, eligible_years, min_cgpa, required_skills, deadline, campuses, allowed_students, created_by, created_at, updated_at";
const APPLICATION_COLUMNS: &str = "id, student_id, job_id, status, applied_at, updated_at";
const CAMPUS_COLUMNS: &str = "id, name, location, description, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    branch: Option<String>,
    year: Option<i32>,
    cgpa: Option<Decimal>,
    skills: Vec<String>,
    campus: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse().map_err(Error::Internal)?,
            branch: row.branch,
            year: row.year,
            cgpa: row.cgpa,
            skills: row.skills,
            campus: row.campus,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct JobRow {
    id: Uuid,
    company_name: String,
    title: String,
    description: String,
    eligible_branches: Vec<String>,
    eligible_years: Vec<i32>,
    min_cgpa: Decimal,
    required_skills: Vec<String>,
    deadline: NaiveDate,
    campuses: Vec<String>,
    allowed_students: Vec<Uuid>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            company_name: row.company_name,
            title: row.title,
            description: row.description,
            eligibility: EligibilityCriteria {
                branches: row.eligible_branches,
                years: row.eligible_years,
                min_cgpa: row.min_cgpa,
                required_skills: row.required_skills,
            },
            deadline: row.deadline,
            campuses: row.campuses,
            allowed_students: row.allowed_students,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    id: Uuid,
    student_id: Uuid,
    job_id: Uuid,
    status: String,
    applied_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            student_id: row.student_id,
            job_id: row.job_id,
            status: row.status.parse().map_err(Error::Internal)?,
            applied_at: row.applied_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CampusRow {
    id: Uuid,
    name: String,
    location: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CampusRow> for Campus {
    fn from(row: CampusRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location: row.location,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Substring pattern for `ILIKE ... ESCAPE '\'`; wildcards in the search text match literally.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_job_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    builder.push(" WHERE TRUE");
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = like_pattern(search);
        builder
            .push(" AND (company_name ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR title ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR description ILIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, branch, year, cgpa, skills, campus, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.branch)
        .bind(user.year)
        .bind(user.cgpa)
        .bind(&user.skills)
        .bind(&user.campus)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM users WHERE TRUE",
            USER_COLUMNS
        ));
        if let Some(role) = filter.role {
            builder.push(" AND role = ").push_bind(role.as_str());
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            builder
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\' OR email ILIKE ")
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(User::try_from).collect()
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, role = $5, branch = $6, year = $7,
                cgpa = $8, skills = $9, campus = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.branch)
        .bind(user.year)
        .bind(user.cgpa)
        .bind(&user.skills)
        .bind(&user.campus)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn insert_job(&self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (
                id, company_name, title, description, eligible_branches, eligible_years,
                min_cgpa, required_skills, deadline, campuses, allowed_students, created_by,
                created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)
            "#,
        )
        .bind(job.id)
        .bind(&job.company_name)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.eligibility.branches)
        .bind(&job.eligibility.years)
        .bind(job.eligibility.min_cgpa)
        .bind(&job.eligibility.required_skills)
        .bind(job.deadline)
        .bind(&job.campuses)
        .bind(&job.allowed_students)
        .bind(job.created_by)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>> {
        let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Job::from))
    }

    async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        push_job_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");
        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        if let Some(offset) = filter.offset {
            builder.push(" OFFSET ").push_bind(offset);
        }

        let rows = builder
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn count_jobs(&self, filter: &JobFilter) -> Result<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_job_filter(&mut builder, filter);
        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn save_job(&self, job: &Job) -> Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE jobs
            SET company_name = $2, title = $3, description = $4, eligible_branches = $5,
                eligible_years = $6, min_cgpa = $7, required_skills = $8, deadline = $9,
                campuses = $10, allowed_students = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(job.id)
        .bind(&job.company_name)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.eligibility.branches)
        .bind(&job.eligibility.years)
        .bind(job.eligibility.min_cgpa)
        .bind(&job.eligibility.required_skills)
        .bind(job.deadline)
        .bind(&job.campuses)
        .bind(&job.allowed_students)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        Ok(())
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn insert_application(&self, application: &Application) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (id, student_id, job_id, status, applied_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(application.id)
        .bind(application.student_id)
        .bind(application.job_id)
        .bind(application.status.as_str())
        .bind(application.applied_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        );
        sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Application::try_from)
            .transpose()
    }

    async fn find_application_for(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE student_id = $1 AND job_id = $2",
            APPLICATION_COLUMNS
        );
        sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(student_id)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Application::try_from)
            .transpose()
    }

    async fn find_applications(&self, filter: &ApplicationFilter) -> Result<Vec<Application>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM applications WHERE TRUE",
            APPLICATION_COLUMNS
        ));
        if let Some(student_id) = filter.student_id {
            builder.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(job_id) = filter.job_id {
            builder.push(" AND job_id = ").push_bind(job_id);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY applied_at DESC");

        let rows = builder
            .build_query_as::<ApplicationRow>()
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Application::try_from).collect()
    }

    async fn save_application(&self, application: &Application) -> Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE applications
            SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(application.id)
        .bind(application.status.as_str())
        .bind(application.updated_at)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Application not found".to_string()));
        }
        Ok(())
    }

    async fn delete_applications_for_job(&self, job_id: Uuid) -> Result<u64> {
        let res = sqlx::query("DELETE FROM applications WHERE job_id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn insert_campus(&self, campus: &Campus) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO campuses (id, name, location, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(campus.id)
        .bind(&campus.name)
        .bind(&campus.location)
        .bind(&campus.description)
        .bind(campus.created_at)
        .bind(campus.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_campus(&self, id: Uuid) -> Result<Option<Campus>> {
        let query = format!("SELECT {} FROM campuses WHERE id = $1", CAMPUS_COLUMNS);
        let row = sqlx::query_as::<_, CampusRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Campus::from))
    }

    async fn find_campus_by_name(&self, name: &str) -> Result<Option<Campus>> {
        let query = format!(
            "SELECT {} FROM campuses WHERE LOWER(name) = LOWER($1)",
            CAMPUS_COLUMNS
        );
        let row = sqlx::query_as::<_, CampusRow>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Campus::from))
    }

    async fn find_campuses(&self) -> Result<Vec<Campus>> {
        let query = format!("SELECT {} FROM campuses ORDER BY name ASC", CAMPUS_COLUMNS);
        let rows = sqlx::query_as::<_, CampusRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Campus::from).collect())
    }

    async fn save_campus(&self, campus: &Campus) -> Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE campuses
            SET name = $2, location = $3, description = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(campus.id)
        .bind(&campus.name)
        .bind(&campus.location)
        .bind(&campus.description)
        .bind(campus.updated_at)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Campus not found".to_string()));
        }
        Ok(())
    }

    async fn delete_campus(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM campuses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
