//! Database bootstrap: target database, schema, and the `roles` / `users` tables.
//! The schema name comes from `AppConfig::schema` and is validated there.

use crate::error::{AppError, ConfigError};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Schema-qualified table name (e.g. "admin.roles").
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", schema, table)
}

/// Create the schema and tables if missing. Safe to run on every start.
pub async fn ensure_tables(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;

    let roles = qualified_table(schema, "roles");
    let roles_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id SERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
        roles
    );
    sqlx::query(&roles_ddl).execute(pool).await?;

    let users = qualified_table(schema, "users");
    let users_ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id SERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            role_id INTEGER REFERENCES {}(id) ON DELETE SET NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
        users, roles
    );
    sqlx::query(&users_ddl).execute(pool).await?;
    let users_active_idx = format!(
        "CREATE INDEX IF NOT EXISTS users_active_idx ON {} (active)",
        users
    );
    sqlx::query(&users_active_idx).execute(pool).await?;

    tracing::info!(schema, "admin tables ready");
    Ok(())
}

/// One round-trip to the database; backs `/ready`.
pub async fn ping(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("SELECT 1").fetch_optional(pool).await?;
    Ok(())
}

/// Target database of a connection URL and the URL of the `postgres`
/// maintenance database on the same server.
#[derive(Debug, PartialEq, Eq)]
struct DatabaseTarget {
    maintenance_url: String,
    name: String,
}

impl DatabaseTarget {
    fn parse(url: &str) -> Result<Self, ConfigError> {
        let (server, rest) = url
            .split_once("://")
            .and_then(|(scheme, rest)| rest.rsplit_once('/').map(|(host, db)| (format!("{}://{}", scheme, host), db)))
            .ok_or_else(|| ConfigError::Invalid {
                var: "DATABASE_URL",
                reason: "expected postgres://host/database".into(),
            })?;
        let (name, query) = match rest.split_once('?') {
            Some((name, query)) => (name, Some(query)),
            None => (rest, None),
        };
        let maintenance_url = match query {
            Some(q) => format!("{}/postgres?{}", server, q),
            None => format!("{}/postgres", server),
        };
        Ok(DatabaseTarget {
            maintenance_url,
            name: name.trim().to_string(),
        })
    }
}

/// Create the database named in `database_url` when the server does not have it yet.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let target = DatabaseTarget::parse(database_url)?;
    if target.name.is_empty() || target.name == "postgres" {
        return Ok(());
    }
    let mut conn = sqlx::postgres::PgConnectOptions::from_str(&target.maintenance_url)?
        .connect()
        .await?;
    let (present,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&target.name)
        .fetch_one(&mut conn)
        .await?;
    if present {
        tracing::debug!(database = %target.name, "database present");
        return Ok(());
    }
    let escaped = target.name.replace('"', "\"\"");
    sqlx::query(&format!("CREATE DATABASE \"{}\"", escaped))
        .execute(&mut conn)
        .await?;
    tracing::info!(database = %target.name, "created database");
    Ok(())
}
