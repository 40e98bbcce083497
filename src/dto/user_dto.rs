use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::auth_dto::SignupPayload;
use crate::models::user::Role;
use crate::utils::validation::{validate_cgpa, validate_no_blank_entries};

/// Profile fields a user may change. Role and password are deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateUserPayload {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub branch: Option<String>,
    #[validate(range(min = 1, max = 6))]
    pub year: Option<i32>,
    #[validate(custom(function = "validate_cgpa"))]
    pub cgpa: Option<Decimal>,
    #[validate(custom(function = "validate_no_blank_entries"))]
    pub skills: Option<Vec<String>>,
    pub campus: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
}

/// Account created by an admin, who may pick the role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateUserPayload {
    #[serde(flatten)]
    #[validate(nested)]
    pub account: SignupPayload,
    /// Defaults to `Student`.
    pub role: Option<Role>,
}
