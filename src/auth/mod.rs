//! Authentication: bearer tokens, caller identity, privilege checks.

mod identity;
mod jwt;
mod middleware;

pub use identity::{has_privilege, Identity, ADMIN_ROLE};
pub use jwt::{AccessClaims, JwtService, TokenError};
pub use middleware::require_bearer;
