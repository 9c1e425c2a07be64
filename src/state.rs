//! Shared application state for all routes.

use crate::auth::JwtService;
use crate::resource::{Roles, Users};
use crate::service::{CrudService, PgRoleService, PgUserService};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtService,
    pub roles: Arc<dyn CrudService<Roles>>,
    pub users: Arc<dyn CrudService<Users>>,
}

impl AppState {
    /// State backed by the PostgreSQL services; tables live in `schema`.
    pub fn with_pool(pool: PgPool, jwt: JwtService, schema: &str) -> Self {
        AppState {
            jwt,
            roles: Arc::new(PgRoleService::new(pool.clone(), schema)),
            users: Arc::new(PgUserService::new(pool, schema)),
        }
    }
}
