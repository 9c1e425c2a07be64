//! CRUD handlers shared by every resource kind: list, privileged list, read,
//! create, update, permanent delete and logical delete.

use crate::auth::{has_privilege, ADMIN_ROLE};
use crate::error::AppError;
use crate::extractors::{CurrentIdentity, EntityId};
use crate::resource::Resource;
use crate::response::{created_at, message};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Log with the failure's severity and hand the error back for the response.
fn failed<R: Resource>(action: &'static str, id: Option<i32>) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        err.log_failure(R::LABEL, action, id);
        err
    }
}

fn require_positive<R: Resource>(id: i32) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::BadRequest(format!(
            "{} id must be greater than zero",
            R::LABEL
        )));
    }
    Ok(())
}

/// GET /api/E — service projection; any failure is a 500.
pub async fn list<R: Resource>(State(state): State<AppState>) -> Result<Json<Vec<R::Dto>>, AppError> {
    R::service(&state)
        .get_all()
        .await
        .map(Json)
        .map_err(|e| failed::<R>("list", None)(e.into_unclassified()))
}

/// GET /api/E/jwt — administrators get the raw store records, everyone else
/// the service projection.
pub async fn list_jwt<R: Resource>(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let service = R::service(&state);
    let result = if has_privilege(&identity, ADMIN_ROLE) {
        tracing::debug!(subject = %identity.subject, resource = R::LABEL, "privileged listing");
        service.list_records().await.map(|rows| Json(rows).into_response())
    } else {
        service.get_all().await.map(|rows| Json(rows).into_response())
    };
    result.map_err(|e| failed::<R>("list_jwt", None)(e.into_unclassified()))
}

/// GET /api/E/{id}
pub async fn read<R: Resource>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<R::Dto>, AppError> {
    R::service(&state)
        .get_by_id(id)
        .await
        .map(Json)
        .map_err(failed::<R>("read", Some(id)))
}

/// POST /api/E — 201 with `Location: /api/E/{id}`.
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<R::Request>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let dto = R::service(&state)
        .create(request)
        .await
        .map_err(failed::<R>("create", None))?;
    let location = format!("{}/{}", R::BASE_PATH, R::dto_id(&dto));
    Ok(created_at(location, dto))
}

/// PUT /api/E — id travels in the body.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<R::Request>, JsonRejection>,
) -> Result<Json<R::Dto>, AppError> {
    let precondition = || {
        AppError::BadRequest(format!(
            "{} id must be greater than zero and the body must not be empty",
            R::LABEL
        ))
    };
    let Json(request) = payload.map_err(|_| precondition())?;
    let id = R::request_id(&request);
    if id <= 0 {
        return Err(precondition());
    }
    R::service(&state)
        .update(request)
        .await
        .map(Json)
        .map_err(failed::<R>("update", Some(id)))
}

/// DELETE /api/E/permanent/{id}
pub async fn delete_permanent<R: Resource>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    require_positive::<R>(id)?;
    R::service(&state)
        .delete_permanent(id)
        .await
        .map_err(failed::<R>("delete_permanent", Some(id)))?;
    Ok(message(StatusCode::OK, format!("{} deleted successfully", R::LABEL)))
}

/// PUT /api/E/Logico/{id}
pub async fn delete_logical<R: Resource>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    require_positive::<R>(id)?;
    R::service(&state)
        .delete_logical(id)
        .await
        .map_err(failed::<R>("delete_logical", Some(id)))?;
    Ok(message(StatusCode::OK, format!("{} logically deleted successfully", R::LABEL)))
}
