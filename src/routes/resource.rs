//! CRUD routes for one resource kind, mounted at `R::BASE_PATH`.
//! Every route requires a valid bearer token.

use crate::auth::require_bearer;
use crate::handlers::{create, delete_logical, delete_permanent, list, list_jwt, read, update};
use crate::resource::{Resource, Roles, Users};
use crate::state::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, put},
    Router,
};

pub fn resource_routes<R: Resource>(state: AppState) -> Router {
    let base = R::BASE_PATH;
    Router::new()
        .route(base, get(list::<R>).post(create::<R>).put(update::<R>))
        .route(&format!("{}/jwt", base), get(list_jwt::<R>))
        .route(&format!("{}/:id", base), get(read::<R>))
        .route(&format!("{}/permanent/:id", base), delete(delete_permanent::<R>))
        .route(&format!("{}/Logico/:id", base), put(delete_logical::<R>))
        .route_layer(from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

/// Role and user routes.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .merge(resource_routes::<Roles>(state.clone()))
        .merge(resource_routes::<Users>(state))
}
