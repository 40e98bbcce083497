use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{ApplicationListQuery, JobRefPayload, UpdateStatusPayload},
    error::{Error, Result},
    models::{application::ApplicationStatus, user::User},
    services::authorization::require_admin,
    store::ApplicationFilter,
    utils::time,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = JobRefPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<crate::models::application::Application>),
        (status = 400, description = "Deadline has passed"),
        (status = 403, description = "Caller is not a student"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied to this job")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Json(payload): Json<JobRefPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .submit(&actor, payload.job_id, time::now())
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    post,
    path = "/api/applications/reject",
    request_body = JobRefPayload,
    responses(
        (status = 200, description = "Job marked as rejected by the student", body = Json<crate::models::application::Application>),
        (status = 403, description = "Caller is not a student"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn reject_job(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Json(payload): Json<JobRefPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .reject(&actor, payload.job_id, time::now())
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<crate::models::application::Application>),
        (status = 400, description = "Status is not Shortlisted, Selected or Rejected"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    require_admin(&actor, "Only admins can update application status")?;
    let status: ApplicationStatus = payload.status.parse().map_err(Error::InvalidStatus)?;
    let application = state
        .application_service
        .set_status(&actor, id, status, time::now())
        .await?;
    Ok(Json(application))
}

#[utoipa::path(
    get,
    path = "/api/applications/my",
    responses(
        (status = 200, description = "Caller's applications, newest first", body = Json<Vec<crate::models::application::Application>>),
        (status = 403, description = "Caller is not a student")
    )
)]
#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_mine(&actor).await?;
    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("job_id" = Option<Uuid>, Query, description = "Filter by job (admins)"),
        ("student_id" = Option<Uuid>, Query, description = "Filter by student (admins)"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Applications, newest first", body = Json<Vec<crate::models::application::Application>>)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let filter = ApplicationFilter {
        student_id: query.student_id,
        job_id: query.job_id,
        status: query.status,
    };
    let applications = state.application_service.list(&actor, filter).await?;
    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = Json<crate::models::application::Application>),
        (status = 403, description = "Not the caller's application"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get(&actor, id).await?;
    Ok(Json(application))
}
