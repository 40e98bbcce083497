use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::job::{EligibilityCriteria, Job};
use crate::services::job_service::JobList;
use crate::utils::time::deserialize_optional_day;
use crate::utils::validation::{validate_cgpa, validate_no_blank_entries, validate_uuid_entries};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityCriteriaPayload {
    pub branches: Option<Vec<String>>,
    pub years: Option<Vec<i32>>,
    pub min_cgpa: Option<Decimal>,
    pub required_skills: Option<Vec<String>>,
}

impl EligibilityCriteriaPayload {
    pub fn into_criteria(self) -> EligibilityCriteria {
        EligibilityCriteria {
            branches: self.branches.unwrap_or_default(),
            years: self.years.unwrap_or_default(),
            min_cgpa: self.min_cgpa.unwrap_or(Decimal::ZERO),
            required_skills: self.required_skills.unwrap_or_default(),
        }
    }

    /// Fields left out keep their current value.
    pub fn merge_into(self, current: &mut EligibilityCriteria) {
        if let Some(branches) = self.branches {
            current.branches = branches;
        }
        if let Some(years) = self.years {
            current.years = years;
        }
        if let Some(min_cgpa) = self.min_cgpa {
            current.min_cgpa = min_cgpa;
        }
        if let Some(required_skills) = self.required_skills {
            current.required_skills = required_skills;
        }
    }
}

fn validate_criteria(criteria: &EligibilityCriteriaPayload) -> Result<(), ValidationError> {
    if let Some(min_cgpa) = criteria.min_cgpa.as_ref() {
        validate_cgpa(min_cgpa)?;
    }
    Ok(())
}

/// Anything other than an array counts as "no restriction". Array entries are kept
/// as sent so that a malformed id fails validation.
fn lenient_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(entries_from_value(value))
}

fn lenient_optional_id_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Null => None,
        other => Some(entries_from_value(other)),
    })
}

fn entries_from_value(value: JsonValue) -> Vec<String> {
    match value {
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                JsonValue::String(raw) => raw,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Entries must already have passed `validate_uuid_entries`.
pub fn student_ids(values: &[String]) -> Vec<Uuid> {
    values
        .iter()
        .filter_map(|raw| Uuid::parse_str(raw.trim()).ok())
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, message = "company_name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(custom(function = "validate_criteria"))]
    pub eligibility: Option<EligibilityCriteriaPayload>,
    #[serde(deserialize_with = "deserialize_optional_day")]
    pub deadline: Option<NaiveDate>,
    #[validate(
        length(min = 1, message = "at least one campus is required"),
        custom(function = "validate_no_blank_entries")
    )]
    pub campuses: Vec<String>,
    #[validate(custom(function = "validate_uuid_entries"))]
    #[serde(deserialize_with = "lenient_id_list")]
    pub allowed_students: Vec<String>,
}

/// A create request with every required field present and checked.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company_name: String,
    pub title: String,
    pub description: String,
    pub eligibility: EligibilityCriteria,
    pub deadline: NaiveDate,
    pub campuses: Vec<String>,
    pub allowed_students: Vec<Uuid>,
}

impl CreateJobPayload {
    /// Runs the field validators and the presence checks together so every problem is
    /// reported in one response.
    pub fn into_new_job(self) -> Result<NewJob, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        match (self.eligibility, self.deadline) {
            (Some(eligibility), Some(deadline)) if errors.errors().is_empty() => Ok(NewJob {
                company_name: self.company_name,
                title: self.title,
                description: self.description,
                eligibility: eligibility.into_criteria(),
                deadline,
                campuses: self.campuses,
                allowed_students: student_ids(&self.allowed_students),
            }),
            (eligibility, deadline) => {
                if eligibility.is_none() {
                    errors.add("eligibility", ValidationError::new("required"));
                }
                if deadline.is_none() {
                    errors.add("deadline", ValidationError::new("required"));
                }
                Err(errors)
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub company_name: Option<String>,
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_criteria"))]
    pub eligibility: Option<EligibilityCriteriaPayload>,
    #[serde(deserialize_with = "deserialize_optional_day")]
    pub deadline: Option<NaiveDate>,
    #[validate(
        length(min = 1, message = "a job must belong to at least one campus"),
        custom(function = "validate_no_blank_entries")
    )]
    pub campuses: Option<Vec<String>>,
    #[validate(custom(function = "validate_uuid_entries"))]
    #[serde(deserialize_with = "lenient_optional_id_list")]
    pub allowed_students: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

impl From<JobList> for JobListResponse {
    fn from(value: JobList) -> Self {
        Self {
            jobs: value.items,
            total: value.total,
            current_page: value.page,
            total_pages: value.total_pages,
        }
    }
}
