//! Service layer: one `CrudService` per resource kind.

mod role;
mod user;
mod validation;

pub use role::PgRoleService;
pub use user::PgUserService;
pub use validation::{FieldRule, RequestValidator};

use crate::error::AppError;
use crate::resource::Resource;
use async_trait::async_trait;

/// Persistence operations behind the HTTP handlers. Implementations report
/// failures as `Validation`, `NotFound`, or an external-service error.
#[async_trait]
pub trait CrudService<R: Resource>: Send + Sync {
    /// Projected listing of active records.
    async fn get_all(&self) -> Result<Vec<R::Dto>, AppError>;

    /// Raw store listing for privileged callers.
    async fn list_records(&self) -> Result<Vec<R::Entity>, AppError>;

    async fn get_by_id(&self, id: i32) -> Result<R::Dto, AppError>;

    async fn create(&self, request: R::Request) -> Result<R::Dto, AppError>;

    async fn update(&self, request: R::Request) -> Result<R::Dto, AppError>;

    /// Mark the record inactive; it stays in the store.
    async fn delete_logical(&self, id: i32) -> Result<(), AppError>;

    /// Remove the record irrecoverably.
    async fn delete_permanent(&self, id: i32) -> Result<(), AppError>;
}

/// Constraint violations are the caller's fault; everything else is the store's.
pub(crate) fn map_db_error(label: &str, err: sqlx::Error) -> AppError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            return AppError::Validation(format!("{} already exists", label));
        }
        if db.is_foreign_key_violation() {
            return AppError::Validation(format!("{} references a record that does not exist", label));
        }
        if db.is_check_violation() {
            return AppError::Validation(format!("{} violates a store constraint", label));
        }
    }
    AppError::Db(err)
}

pub(crate) fn not_found(label: &str, id: i32) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", label, id))
}
