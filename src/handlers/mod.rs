//! HTTP handlers for the resource CRUD endpoints.

pub mod resource;
pub use resource::*;
