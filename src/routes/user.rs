use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::user_dto::{CreateUserPayload, UpdateUserPayload, UserListQuery},
    error::Result,
    models::user::User,
    utils::time,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("role" = Option<String>, Query, description = "Student or Admin"),
        ("search" = Option<String>, Query, description = "Matches name or email")
    ),
    responses(
        (status = 200, description = "Users, newest first", body = Json<Vec<User>>),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse> {
    let users = state.user_service.list(&actor, query).await?;
    Ok(Json(users))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Account created", body = Json<User>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .create(&actor, payload, time::now())
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = Json<User>),
        (status = 403, description = "Not the caller and caller is not an admin"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get(&actor, id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Profile updated", body = Json<User>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Not the caller and caller is not an admin"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .update(&actor, id, payload, time::now())
        .await?;
    Ok(Json(user))
}
