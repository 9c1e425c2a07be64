//! Role records and their projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored role row, as returned by the privileged listing.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoleDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        RoleDto {
            id: role.id,
            name: role.name,
            description: role.description,
        }
    }
}

/// Create/update payload. `id` is ignored on create and required on update.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
