use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::job_dto::{CreateJobPayload, JobListQuery, JobListResponse, UpdateJobPayload},
    error::Result,
    models::user::User,
    utils::time,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = Json<crate::models::job::Job>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .create(&actor, payload, time::now())
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("search" = Option<String>, Query, description = "Matches company, title or description"),
        ("page" = Option<i64>, Query, description = "Page number, from 1"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Jobs, newest first", body = Json<JobListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let result = state.job_service.list(query).await?;
    Ok(Json(JobListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/available",
    responses(
        (status = 200, description = "Open jobs the student has not acted on", body = Json<Vec<crate::models::job::Job>>),
        (status = 403, description = "Caller is not a student")
    )
)]
#[axum::debug_handler]
pub async fn available_jobs(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.available(&actor, time::now()).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/overdeadline",
    responses(
        (status = 200, description = "Closed jobs the student never acted on", body = Json<Vec<crate::models::job::Job>>),
        (status = 403, description = "Caller is not a student")
    )
)]
#[axum::debug_handler]
pub async fn over_deadline_jobs(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.over_deadline(&actor, time::now()).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = Json<crate::models::job::Job>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Json<crate::models::job::Job>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is neither an admin nor the creator"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .update(&actor, id, payload, time::now())
        .await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job and its applications deleted"),
        (status = 403, description = "Caller is neither an admin nor the creator"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/eligibility/{student_id}",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Per-criterion match report", body = Json<crate::services::eligibility_service::CriteriaReport>),
        (status = 403, description = "Caller is neither an admin nor that student"),
        (status = 404, description = "Job or student not found")
    )
)]
#[axum::debug_handler]
pub async fn eligibility_report(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let report = state
        .job_service
        .eligibility_report(&actor, id, student_id, time::now())
        .await?;
    Ok(Json(report))
}
