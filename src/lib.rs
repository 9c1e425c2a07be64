//! Role and user administration REST backend.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod resource;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use auth::{has_privilege, Identity, JwtService, ADMIN_ROLE};
pub use config::AppConfig;
pub use error::{classify, AppError, ConfigError, ErrorClass};
pub use resource::{Resource, Roles, Users};
pub use routes::{api_routes, common_routes, common_routes_with_ready, resource_routes};
pub use service::CrudService;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
