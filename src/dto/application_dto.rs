use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::application::ApplicationStatus;

/// Body of both apply and reject requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRefPayload {
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub job_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
}
