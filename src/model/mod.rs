mod role;
mod user;

pub use role::{Role, RoleDto, RoleRequest};
pub use user::{User, UserDto, UserRequest};
