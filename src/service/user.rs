//! PostgreSQL-backed user service.

use super::{map_db_error, not_found, CrudService, FieldRule, RequestValidator};
use crate::error::AppError;
use crate::model::{User, UserDto, UserRequest};
use crate::resource::Users;
use crate::store::qualified_table;
use async_trait::async_trait;
use sqlx::PgPool;

const LABEL: &str = "User";
const USERNAME_PATTERN: &str = r"^[A-Za-z0-9_.-]+$";
const DTO_COLUMNS: &str = "id, username, email, role_id";

#[derive(Clone)]
pub struct PgUserService {
    pool: PgPool,
    table: String,
    roles_table: String,
}

impl PgUserService {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgUserService {
            pool,
            table: qualified_table(schema, "users"),
            roles_table: qualified_table(schema, "roles"),
        }
    }

    fn validate(request: &UserRequest) -> Result<(), AppError> {
        RequestValidator::validate(&[
            (
                "username",
                Some(request.username.as_str()),
                FieldRule::required().length(3, 50).pattern(USERNAME_PATTERN),
            ),
            ("email", Some(request.email.as_str()), FieldRule::required().max(255).format("email")),
        ])?;
        if let Some(role_id) = request.role_id {
            RequestValidator::positive_id("Rol", role_id)?;
        }
        Ok(())
    }

    /// Users may only be attached to an active role.
    async fn ensure_role_assignable(&self, role_id: Option<i32>) -> Result<(), AppError> {
        let Some(role_id) = role_id else {
            return Ok(());
        };
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND active)",
            self.roles_table
        );
        let (exists,): (bool,) = sqlx::query_as(&sql).bind(role_id).fetch_one(&self.pool).await?;
        if !exists {
            return Err(AppError::Validation(format!(
                "Rol with id {} does not exist or is inactive",
                role_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CrudService<Users> for PgUserService {
    async fn get_all(&self) -> Result<Vec<UserDto>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE active ORDER BY id",
            DTO_COLUMNS,
            self.table
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, UserDto>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn list_records(&self) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT id, username, email, role_id, active, created_at, deleted_at \
             FROM {} WHERE active ORDER BY id",
            self.table
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> Result<UserDto, AppError> {
        RequestValidator::positive_id(LABEL, id)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND active",
            DTO_COLUMNS,
            self.table
        );
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, UserDto>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(LABEL, id))
    }

    async fn create(&self, request: UserRequest) -> Result<UserDto, AppError> {
        Self::validate(&request)?;
        self.ensure_role_assignable(request.role_id).await?;
        let sql = format!(
            "INSERT INTO {} (username, email, role_id) VALUES ($1, $2, $3) RETURNING {}",
            self.table,
            DTO_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, UserDto>(&sql)
            .bind(request.username.trim())
            .bind(request.email.trim())
            .bind(request.role_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(LABEL, e))?;
        tracing::info!(id = row.id, "user created");
        Ok(row)
    }

    async fn update(&self, request: UserRequest) -> Result<UserDto, AppError> {
        RequestValidator::positive_id(LABEL, request.id)?;
        Self::validate(&request)?;
        self.ensure_role_assignable(request.role_id).await?;
        let sql = format!(
            "UPDATE {} SET username = $2, email = $3, role_id = $4 WHERE id = $1 AND active RETURNING {}",
            self.table,
            DTO_COLUMNS
        );
        tracing::debug!(sql = %sql, id = request.id, "query");
        sqlx::query_as::<_, UserDto>(&sql)
            .bind(request.id)
            .bind(request.username.trim())
            .bind(request.email.trim())
            .bind(request.role_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(LABEL, e))?
            .ok_or_else(|| not_found(LABEL, request.id))
    }

    async fn delete_logical(&self, id: i32) -> Result<(), AppError> {
        RequestValidator::positive_id(LABEL, id)?;
        let sql = format!(
            "UPDATE {} SET active = FALSE, deleted_at = NOW() WHERE id = $1 AND active",
            self.table
        );
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found(LABEL, id));
        }
        Ok(())
    }

    async fn delete_permanent(&self, id: i32) -> Result<(), AppError> {
        RequestValidator::positive_id(LABEL, id)?;
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found(LABEL, id));
        }
        Ok(())
    }
}
