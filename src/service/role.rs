//! PostgreSQL-backed role service.

use super::{map_db_error, not_found, CrudService, FieldRule, RequestValidator};
use crate::error::AppError;
use crate::model::{Role, RoleDto, RoleRequest};
use crate::resource::Roles;
use crate::store::qualified_table;
use async_trait::async_trait;
use sqlx::PgPool;

const LABEL: &str = "Rol";

#[derive(Clone)]
pub struct PgRoleService {
    pool: PgPool,
    table: String,
}

impl PgRoleService {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgRoleService {
            pool,
            table: qualified_table(schema, "roles"),
        }
    }

    fn validate(request: &RoleRequest) -> Result<(), AppError> {
        RequestValidator::validate(&[
            ("name", Some(request.name.as_str()), FieldRule::required().max(100)),
            ("description", request.description.as_deref(), FieldRule::optional().max(255)),
        ])
    }
}

fn normalized_description(request: &RoleRequest) -> Option<String> {
    request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl CrudService<Roles> for PgRoleService {
    async fn get_all(&self) -> Result<Vec<RoleDto>, AppError> {
        let sql = format!(
            "SELECT id, name, description FROM {} WHERE active ORDER BY id",
            self.table
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, RoleDto>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn list_records(&self) -> Result<Vec<Role>, AppError> {
        let sql = format!(
            "SELECT id, name, description, active, created_at, deleted_at FROM {} ORDER BY id",
            self.table
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Role>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> Result<RoleDto, AppError> {
        RequestValidator::positive_id(LABEL, id)?;
        let sql = format!(
            "SELECT id, name, description FROM {} WHERE id = $1 AND active",
            self.table
        );
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, RoleDto>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(LABEL, id))
    }

    async fn create(&self, request: RoleRequest) -> Result<RoleDto, AppError> {
        Self::validate(&request)?;
        let sql = format!(
            "INSERT INTO {} (name, description) VALUES ($1, $2) RETURNING id, name, description",
            self.table
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, RoleDto>(&sql)
            .bind(request.name.trim())
            .bind(normalized_description(&request))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(LABEL, e))?;
        tracing::info!(id = row.id, "role created");
        Ok(row)
    }

    async fn update(&self, request: RoleRequest) -> Result<RoleDto, AppError> {
        RequestValidator::positive_id(LABEL, request.id)?;
        Self::validate(&request)?;
        let sql = format!(
            "UPDATE {} SET name = $2, description = $3 WHERE id = $1 AND active \
             RETURNING id, name, description",
            self.table
        );
        tracing::debug!(sql = %sql, id = request.id, "query");
        sqlx::query_as::<_, RoleDto>(&sql)
            .bind(request.id)
            .bind(request.name.trim())
            .bind(normalized_description(&request))
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
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(LABEL, e))?;
        if result.rows_affected() == 0 {
            return Err(not_found(LABEL, id));
        }
        Ok(())
    }
}
