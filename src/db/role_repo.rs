// src/db/role_repo.rs

use sqlx::PgPool;

use crate::common::error::AppError;
use crate::models::role::{Role, RoleFields};

#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Role>, AppError> {
        sqlx::query_as::<_, Role>("SELECT id, title, description FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("fetching roles"))
    }

    pub async fn create(&self, fields: &RoleFields) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO roles (title, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&fields.title)
        .bind(fields.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::database("creating role"))
    }

    pub async fn update(&self, id: i32, fields: &RoleFields) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE roles SET title = $1, description = $2 WHERE id = $3")
            .bind(&fields.title)
            .bind(fields.description.as_deref())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("updating role"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Role"));
        }
        Ok(())
    }

    // As atribuições do cargo caem junto (ON DELETE CASCADE em employee_roles)
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("deleting role"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Role"));
        }
        Ok(())
    }
}
