use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::User;
use crate::utils::validation::{validate_cgpa, validate_no_blank_entries};

/// Public self-registration. Always creates a student; any `role` in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SignupPayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub branch: Option<String>,
    #[validate(range(min = 1, max = 6))]
    pub year: Option<i32>,
    #[validate(custom(function = "validate_cgpa"))]
    pub cgpa: Option<Decimal>,
    #[validate(custom(function = "validate_no_blank_entries"))]
    pub skills: Vec<String>,
    pub campus: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}
