//! Integer id path segment (`/{id}` constrained to integers).

use crate::response::{message, MessageBody};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    Json,
};

/// A path id that parsed as `i32`. Sign is not checked here; handlers decide.
/// A non-integer segment does not match the route and answers 404.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<MessageBody>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| message(StatusCode::NOT_FOUND, "no route matches the requested path"))?;
        raw.trim()
            .parse::<i32>()
            .map(EntityId)
            .map_err(|_| message(StatusCode::NOT_FOUND, format!("'{}' is not an integer id", raw)))
    }
}
