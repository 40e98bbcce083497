use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::Error, AppState};

/// Resolves the bearer token to a live account and stores the `User` in request extensions.
///
/// A valid token whose subject no longer exists is rejected like a bad token.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let claims = match state.tokens.verify(token.trim()) {
        Ok(claims) => claims,
        Err(err) => return err.into_response(),
    };

    match state.store.find_user(claims.sub).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!(user = %claims.sub, "token subject no longer exists");
            unauthorized("invalid_token")
        }
        Err(err) => err.into_response(),
    }
}

fn unauthorized(code: &str) -> Response {
    Error::Unauthorized(code.to_string()).into_response()
}
