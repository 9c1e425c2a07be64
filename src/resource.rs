//! Binds an entity kind to its route prefix, payload types and service.

use crate::model::{Role, RoleDto, RoleRequest, User, UserDto, UserRequest};
use crate::service::CrudService;
use crate::state::AppState;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

pub trait Resource: Sized + Send + Sync + 'static {
    /// Raw stored record, returned to privileged callers.
    type Entity: Serialize + Send + Sync + 'static;
    /// Projection returned by the service layer.
    type Dto: Serialize + Send + Sync + 'static;
    /// Create/update payload.
    type Request: DeserializeOwned + Send + Sync + 'static;

    /// Name used in messages and logs, e.g. "Rol".
    const LABEL: &'static str;
    /// Route prefix, e.g. "/api/Rol".
    const BASE_PATH: &'static str;

    fn service(state: &AppState) -> Arc<dyn CrudService<Self>>;

    fn dto_id(dto: &Self::Dto) -> i32;

    fn request_id(request: &Self::Request) -> i32;
}

pub struct Roles;

impl Resource for Roles {
    type Entity = Role;
    type Dto = RoleDto;
    type Request = RoleRequest;

    const LABEL: &'static str = "Rol";
    const BASE_PATH: &'static str = "/api/Rol";

    fn service(state: &AppState) -> Arc<dyn CrudService<Self>> {
        state.roles.clone()
    }

    fn dto_id(dto: &RoleDto) -> i32 {
        dto.id
    }

    fn request_id(request: &RoleRequest) -> i32 {
        request.id
    }
}

pub struct Users;

impl Resource for Users {
    type Entity = User;
    type Dto = UserDto;
    type Request = UserRequest;

    const LABEL: &'static str = "User";
    const BASE_PATH: &'static str = "/api/User";

    fn service(state: &AppState) -> Arc<dyn CrudService<Self>> {
        state.users.clone()
    }

    fn dto_id(dto: &UserDto) -> i32 {
        dto.id
    }

    fn request_id(request: &UserRequest) -> i32 {
        request.id
    }
}
