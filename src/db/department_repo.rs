// src/db/department_repo.rs

use sqlx::PgPool;

use crate::common::error::AppError;
use crate::models::department::{Department, DepartmentFields};

#[derive(Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Department>, AppError> {
        sqlx::query_as::<_, Department>("SELECT id, name, location FROM departments ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("fetching departments"))
    }

    pub async fn create(&self, fields: &DepartmentFields) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO departments (name, location) VALUES ($1, $2) RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.location)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::database("creating department"))
    }

    pub async fn update(&self, id: i32, fields: &DepartmentFields) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE departments SET name = $1, location = $2 WHERE id = $3")
            .bind(&fields.name)
            .bind(&fields.location)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("updating department"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Department"));
        }
        Ok(())
    }

    // Funcionários do departamento ficam com department_id NULL (ON DELETE SET NULL)
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("deleting department"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Department"));
        }
        Ok(())
    }
}
