// src/db/employee_repo.rs

use std::collections::HashMap;

use sqlx::{Executor, PgPool, Postgres};

use crate::common::{
    db_utils::{like_pattern, violation, Violation},
    error::AppError,
};
use crate::models::employee::{
    Employee, EmployeeFields, EmployeeRoleRow, Pagination, RoleSummary, INVALID_DEPARTMENT,
};

// Filtro de busca compartilhado entre a listagem e a contagem
const SEARCH_FILTER: &str = r#"
    e.first_name ILIKE $1
    OR e.last_name ILIKE $1
    OR e.email ILIKE $1
    OR d.name ILIKE $1
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    /// Página de funcionários que casam com `search`, já com o nome do departamento.
    /// Cargos ficam vazios aqui; veja `roles_for_employees`.
    pub async fn list_page(
        &self,
        pagination: Pagination,
        search: &str,
    ) -> Result<Vec<Employee>, AppError> {
        let sql = format!(
            r#"
            SELECT e.id, e.first_name, e.last_name, e.email, e.position, e.salary,
                   e.department_id, d.name AS department_name
            FROM employees e
            LEFT JOIN departments d ON e.department_id = d.id
            WHERE {SEARCH_FILTER}
            GROUP BY e.id, d.name
            ORDER BY e.id
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, Employee>(&sql)
            .bind(like_pattern(search))
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("fetching employees"))
    }

    /// Total de funcionários distintos com o mesmo filtro, sem paginação.
    pub async fn count_matching(&self, search: &str) -> Result<i64, AppError> {
        let sql = format!(
            r#"
            SELECT COUNT(DISTINCT e.id)
            FROM employees e
            LEFT JOIN departments d ON e.department_id = d.id
            WHERE {SEARCH_FILTER}
            "#
        );

        sqlx::query_scalar::<_, i64>(&sql)
            .bind(like_pattern(search))
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::database("fetching employees"))
    }

    /// Cargos de vários funcionários numa única ida ao banco, agrupados por funcionário.
    pub async fn roles_for_employees(
        &self,
        employee_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<RoleSummary>>, AppError> {
        if employee_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, EmployeeRoleRow>(
            r#"
            SELECT er.employee_id, r.id, r.title
            FROM employee_roles er
            JOIN roles r ON er.role_id = r.id
            WHERE er.employee_id = ANY($1)
            ORDER BY er.employee_id, r.id
            "#,
        )
        .bind(employee_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::database("fetching employees"))?;

        let mut grouped: HashMap<i32, Vec<RoleSummary>> = HashMap::new();
        for row in rows {
            grouped.entry(row.employee_id).or_default().push(RoleSummary {
                id: row.id,
                title: row.title,
            });
        }
        Ok(grouped)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Employee>, AppError> {
        sqlx::query_as::<_, Employee>(
            r#"
            SELECT e.id, e.first_name, e.last_name, e.email, e.position, e.salary,
                   e.department_id, d.name AS department_name
            FROM employees e
            LEFT JOIN departments d ON e.department_id = d.id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::database("fetching employee"))
    }

    /// Cargos de um funcionário. Aceita pool ou transação.
    pub async fn roles_for<'e, E>(
        &self,
        executor: E,
        employee_id: i32,
    ) -> Result<Vec<RoleSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, RoleSummary>(
            r#"
            SELECT r.id, r.title
            FROM employee_roles er
            JOIN roles r ON er.role_id = r.id
            WHERE er.employee_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(employee_id)
        .fetch_all(executor)
        .await
        .map_err(AppError::database("fetching employee"))
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn create(&self, fields: &EmployeeFields) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO employees (first_name, last_name, email, position, salary, department_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .bind(&fields.position)
        .bind(fields.salary)
        .bind(fields.department_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_employee_write(e, "creating employee"))
    }

    pub async fn update(&self, id: i32, fields: &EmployeeFields) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET first_name = $1, last_name = $2, email = $3, position = $4,
                salary = $5, department_id = $6
            WHERE id = $7
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .bind(&fields.position)
        .bind(fields.salary)
        .bind(fields.department_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| classify_employee_write(e, "updating employee"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Employee"));
        }
        Ok(())
    }

    // Não limpa employee_roles aqui; o schema cuida disso (ON DELETE CASCADE)
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("deleting employee"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Employee"));
        }
        Ok(())
    }

    // =========================================================================
    //  ATRIBUIÇÃO DE CARGOS
    // =========================================================================

    pub async fn assign_role(&self, employee_id: i32, role_id: i32) -> Result<(), AppError> {
        sqlx::query("INSERT INTO employee_roles (employee_id, role_id) VALUES ($1, $2)")
            .bind(employee_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::Unique) => AppError::Conflict("Role already assigned".into()),
                Some(Violation::ForeignKey) => AppError::NotFound("Employee or role"),
                None => AppError::database("assigning role")(e),
            })?;

        Ok(())
    }

    pub async fn unassign_role(&self, employee_id: i32, role_id: i32) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM employee_roles WHERE employee_id = $1 AND role_id = $2")
                .bind(employee_id)
                .bind(role_id)
                .execute(&self.pool)
                .await
                .map_err(AppError::database("unassigning role"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Role assignment"));
        }
        Ok(())
    }

    /// Trava a linha do funcionário até o fim da transação.
    pub async fn lock_employee<'e, E>(&self, executor: E, employee_id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, i32>("SELECT id FROM employees WHERE id = $1 FOR UPDATE")
            .bind(employee_id)
            .fetch_optional(executor)
            .await
            .map_err(AppError::database("updating employee roles"))?
            .ok_or(AppError::NotFound("Employee"))?;

        Ok(())
    }

    // Inserção em massa usando UNNEST
    pub async fn insert_roles<'e, E>(
        &self,
        executor: E,
        employee_id: i32,
        role_ids: &[i32],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO employee_roles (employee_id, role_id)
            SELECT $1, unnest($2::int4[])
            "#,
        )
        .bind(employee_id)
        .bind(role_ids)
        .execute(executor)
        .await
        .map_err(|e| match violation(&e) {
            Some(Violation::ForeignKey) => {
                AppError::InvalidReference("Invalid role_id: Role does not exist".into())
            }
            Some(Violation::Unique) => AppError::Conflict("Role already assigned".into()),
            None => AppError::database("updating employee roles")(e),
        })?;

        Ok(())
    }

    pub async fn delete_roles<'e, E>(
        &self,
        executor: E,
        employee_id: i32,
        role_ids: &[i32],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM employee_roles WHERE employee_id = $1 AND role_id = ANY($2)")
            .bind(employee_id)
            .bind(role_ids)
            .execute(executor)
            .await
            .map_err(AppError::database("updating employee roles"))?;

        Ok(())
    }
}

fn classify_employee_write(e: sqlx::Error, context: &'static str) -> AppError {
    match violation(&e) {
        Some(Violation::Unique) => AppError::Conflict("Email already exists".into()),
        Some(Violation::ForeignKey) => AppError::InvalidReference(INVALID_DEPARTMENT.into()),
        None => AppError::database(context)(e),
    }
}
