//! Runtime settings read from the environment (after `.env` via dotenvy).

use crate::error::ConfigError;
use regex::Regex;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/admin";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
pub const DEFAULT_SCHEMA: &str = "admin";

/// Unquoted PostgreSQL identifier; the schema name is spliced into SQL text.
const SCHEMA_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]{0,62}$";

#[derive(Clone, Debug)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub schema: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub jwt: JwtSettings,
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let schema = get("ADMIN_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        let schema_ok = Regex::new(SCHEMA_PATTERN)
            .map(|re| re.is_match(&schema))
            .unwrap_or(false);
        if !schema_ok {
            return Err(ConfigError::Invalid {
                var: "ADMIN_SCHEMA",
                reason: format!("'{}' is not a plain SQL identifier", schema),
            });
        }
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                reason: format!("'{}' is not a positive integer", v),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse().map_err(|e| ConfigError::Invalid {
            var: "BIND_ADDR",
            reason: format!("{}: {}", bind_raw, e),
        })?;
        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "MAX_BODY_BYTES",
                reason: format!("'{}' is not a byte count", v),
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let jwt = JwtSettings {
            secret: get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            issuer: get("JWT_ISSUER"),
            audience: get("JWT_AUDIENCE"),
        };

        Ok(AppConfig {
            database_url,
            schema,
            max_connections,
            bind_addr,
            jwt,
            max_body_bytes,
        })
    }
}
