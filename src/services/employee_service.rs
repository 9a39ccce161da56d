// src/services/employee_service.rs

use sqlx::PgPool;

use crate::common::error::AppError;
use crate::db::EmployeeRepository;
use crate::models::employee::{
    Employee, EmployeeFields, EmployeePage, Pagination, RoleChanges,
};

/// Junta funcionário + cargos e concentra o protocolo de atribuição do lado servidor.
#[derive(Clone)]
pub struct EmployeeService {
    repo: EmployeeRepository,
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(repo: EmployeeRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Três consultas independentes (página, cargos, contagem). Cada uma enxerga o
    /// seu próprio snapshot; não há transação cobrindo o lote.
    pub async fn list(&self, pagination: Pagination, search: &str) -> Result<EmployeePage, AppError> {
        let mut employees = self.repo.list_page(pagination, search).await?;

        let ids: Vec<i32> = employees.iter().map(|e| e.id).collect();
        let mut roles = self.repo.roles_for_employees(&ids).await?;
        for employee in &mut employees {
            employee.roles = roles.remove(&employee.id).unwrap_or_default();
        }

        let total = self.repo.count_matching(search).await?;

        tracing::debug!(count = employees.len(), total, "Fetched employees");
        Ok(EmployeePage { employees, total })
    }

    pub async fn get(&self, id: i32) -> Result<Employee, AppError> {
        let mut employee = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Employee"))?;

        employee.roles = self.repo.roles_for(&self.pool, id).await?;
        Ok(employee)
    }

    pub async fn create(&self, fields: &EmployeeFields) -> Result<i32, AppError> {
        self.repo.create(fields).await
    }

    pub async fn update(&self, id: i32, fields: &EmployeeFields) -> Result<(), AppError> {
        self.repo.update(id, fields).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.repo.delete(id).await
    }

    pub async fn assign_role(&self, employee_id: i32, role_id: i32) -> Result<(), AppError> {
        self.repo.assign_role(employee_id, role_id).await
    }

    pub async fn unassign_role(&self, employee_id: i32, role_id: i32) -> Result<(), AppError> {
        self.repo.unassign_role(employee_id, role_id).await
    }

    /// Substitui o conjunto de cargos do funcionário numa única transação.
    pub async fn replace_roles(
        &self,
        employee_id: i32,
        desired: &[i32],
    ) -> Result<RoleChanges, AppError> {
        // 1. Inicia Transação
        let mut tx = self.pool.begin().await?;

        // 2. Trava o funcionário (também garante que ele existe)
        self.repo.lock_employee(&mut *tx, employee_id).await?;

        // 3. Calcula a diferença contra o estado dentro da transação
        let current: Vec<i32> = self
            .repo
            .roles_for(&mut *tx, employee_id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        let changes = RoleChanges::between(&current, desired);

        // 4. Aplica
        if !changes.assigned.is_empty() {
            self.repo.insert_roles(&mut *tx, employee_id, &changes.assigned).await?;
        }
        if !changes.unassigned.is_empty() {
            self.repo.delete_roles(&mut *tx, employee_id, &changes.unassigned).await?;
        }

        // 5. Commit
        tx.commit().await?;

        tracing::info!(
            employee_id,
            assigned = ?changes.assigned,
            unassigned = ?changes.unassigned,
            "Role changes committed"
        );
        Ok(changes)
    }
}
