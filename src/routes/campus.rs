use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::campus_dto::{CreateCampusPayload, UpdateCampusPayload},
    error::Result,
    models::user::User,
    utils::time,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/campuses",
    responses(
        (status = 200, description = "Campuses sorted by name", body = Json<Vec<crate::models::campus::Campus>>)
    )
)]
#[axum::debug_handler]
pub async fn list_campuses(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let campuses = state.campus_service.list().await?;
    Ok(Json(campuses))
}

#[utoipa::path(
    get,
    path = "/api/campuses/{id}",
    params(
        ("id" = Uuid, Path, description = "Campus ID")
    ),
    responses(
        (status = 200, description = "Campus found", body = Json<crate::models::campus::Campus>),
        (status = 404, description = "Campus not found")
    )
)]
#[axum::debug_handler]
pub async fn get_campus(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let campus = state.campus_service.get(id).await?;
    Ok(Json(campus))
}

#[utoipa::path(
    post,
    path = "/api/campuses",
    request_body = CreateCampusPayload,
    responses(
        (status = 201, description = "Campus created", body = Json<crate::models::campus::Campus>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Campus name already taken")
    )
)]
#[axum::debug_handler]
pub async fn create_campus(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Json(payload): Json<CreateCampusPayload>,
) -> Result<impl IntoResponse> {
    let campus = state
        .campus_service
        .create(&actor, payload, time::now())
        .await?;
    Ok((StatusCode::CREATED, Json(campus)))
}

#[utoipa::path(
    put,
    path = "/api/campuses/{id}",
    params(
        ("id" = Uuid, Path, description = "Campus ID")
    ),
    request_body = UpdateCampusPayload,
    responses(
        (status = 200, description = "Campus updated", body = Json<crate::models::campus::Campus>),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Campus not found"),
        (status = 409, description = "Campus name already taken")
    )
)]
#[axum::debug_handler]
pub async fn update_campus(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCampusPayload>,
) -> Result<impl IntoResponse> {
    let campus = state
        .campus_service
        .update(&actor, id, payload, time::now())
        .await?;
    Ok(Json(campus))
}

#[utoipa::path(
    delete,
    path = "/api/campuses/{id}",
    params(
        ("id" = Uuid, Path, description = "Campus ID")
    ),
    responses(
        (status = 204, description = "Campus deleted"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Campus not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_campus(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.campus_service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
