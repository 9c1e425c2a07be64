//! User records and their projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user row, as returned by the privileged listing.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role_id: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role_id: Option<i32>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            username: user.username,
            email: user.email,
            role_id: user.role_id,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role_id: Option<i32>,
}
