//! Bearer authentication for the API routes.

use crate::response::{message, MessageBody};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};

/// Validate `Authorization: Bearer <token>` and store the caller's
/// [`Identity`](crate::auth::Identity) in the request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<MessageBody>)> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| message(StatusCode::UNAUTHORIZED, "missing or invalid Authorization header"))?;

    let claims = state.jwt.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        message(StatusCode::UNAUTHORIZED, "invalid or expired token")
    })?;

    req.extensions_mut().insert(claims.identity());
    Ok(next.run(req).await)
}
