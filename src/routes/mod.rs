pub mod application;
pub mod auth;
pub mod campus;
pub mod health;
pub mod job;
pub mod user;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::{middleware::auth::require_bearer_auth, AppState};

/// Every endpoint of the service. Routes in `protected` see the caller as an
/// `Extension<User>`.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/campuses", get(campus::list_campuses))
        .route("/api/campuses/:id", get(campus::get_campus));

    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/users", get(user::list_users).post(user::create_user))
        .route("/api/users/:id", get(user::get_user).put(user::update_user))
        .route("/api/jobs", get(job::list_jobs).post(job::create_job))
        .route("/api/jobs/available", get(job::available_jobs))
        .route("/api/jobs/overdeadline", get(job::over_deadline_jobs))
        .route(
            "/api/jobs/:id",
            get(job::get_job).put(job::update_job).delete(job::delete_job),
        )
        .route(
            "/api/jobs/:id/eligibility/:student_id",
            get(job::eligibility_report),
        )
        .route(
            "/api/applications",
            get(application::list_applications).post(application::apply),
        )
        .route("/api/applications/my", get(application::my_applications))
        .route("/api/applications/reject", post(application::reject_job))
        .route("/api/applications/:id", get(application::get_application))
        .route(
            "/api/applications/:id/status",
            put(application::update_status),
        )
        .route("/api/campuses", post(campus::create_campus))
        .route(
            "/api/campuses/:id",
            put(campus::update_campus).delete(campus::delete_campus),
        )
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    public.merge(protected).with_state(state)
}
