use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Descriptive requirements attached to a job. An empty list means no restriction.
///
/// These are advisory: display gating never consults them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityCriteria {
    pub branches: Vec<String>,
    pub years: Vec<i32>,
    pub min_cgpa: Decimal,
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub company_name: String,
    pub title: String,
    pub description: String,
    pub eligibility: EligibilityCriteria,
    pub deadline: NaiveDate,
    pub campuses: Vec<String>,
    /// When non-empty, only these students may see the job.
    #[serde(default)]
    pub allowed_students: Vec<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        self.deadline >= today
    }

    pub fn has_allow_list(&self) -> bool {
        !self.allowed_students.is_empty()
    }
}
