// src/models/employee.rs

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::common::error::AppError;

const REQUIRED_FIELDS_MISSING: &str = "Required fields missing";
pub const INVALID_DEPARTMENT: &str = "Invalid department_id: Department does not exist";

// Cargo resumido que acompanha o funcionário
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoleSummary {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Admin")]
    pub title: String,
}

// Linha da consulta em lote de cargos (um registro por par funcionário/cargo)
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRoleRow {
    pub employee_id: i32,
    pub id: i32,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "Developer")]
    pub position: String,
    #[schema(example = 50000)]
    pub salary: Decimal,
    pub department_id: Option<i32>,

    // Vem do LEFT JOIN com departments
    #[schema(example = "IT")]
    pub department_name: Option<String>,

    // Preenchido numa segunda consulta
    #[sqlx(skip)]
    #[serde(default)]
    pub roles: Vec<RoleSummary>,
}

impl Employee {
    pub fn role_ids(&self) -> Vec<i32> {
        self.roles.iter().map(|r| r.id).collect()
    }
}

// GET /api/employees
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmployeePage {
    pub employees: Vec<Employee>,
    pub total: i64,
}

fn validate_salary(salary: &Decimal) -> Result<(), ValidationError> {
    if salary.is_sign_negative() || salary.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("Salary must be a positive number".into());
        return Err(err);
    }
    Ok(())
}

// Corpo de POST e PUT /api/employees
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EmployeePayload {
    #[validate(
        required(message = "Required fields missing"),
        length(min = 1, message = "Required fields missing")
    )]
    #[schema(example = "Jane")]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Required fields missing"),
        length(min = 1, message = "Required fields missing")
    )]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,

    #[validate(
        required(message = "Required fields missing"),
        length(min = 1, message = "Required fields missing")
    )]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "Required fields missing"),
        length(min = 1, message = "Required fields missing")
    )]
    #[schema(example = "Manager")]
    pub position: Option<String>,

    #[validate(
        required(message = "Required fields missing"),
        custom(function = "validate_salary")
    )]
    #[schema(example = 60000)]
    pub salary: Option<Decimal>,

    #[schema(example = 1)]
    pub department_id: Option<i32>,
}

/// Campos validados do funcionário, prontos para INSERT/UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub salary: Decimal,
    pub department_id: Option<i32>,
}

impl TryFrom<EmployeePayload> for EmployeeFields {
    type Error = AppError;

    fn try_from(p: EmployeePayload) -> Result<Self, Self::Error> {
        fn present(value: Option<String>) -> Result<String, AppError> {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Validation(REQUIRED_FIELDS_MISSING.into()))
        }

        Ok(Self {
            first_name: present(p.first_name)?,
            last_name: present(p.last_name)?,
            email: present(p.email)?,
            position: present(p.position)?,
            salary: p
                .salary
                .ok_or_else(|| AppError::Validation(REQUIRED_FIELDS_MISSING.into()))?,
            department_id: match p.department_id {
                // 0 equivale a "sem departamento"
                None | Some(0) => None,
                // Nenhum departamento tem id negativo; os positivos ficam para a FK
                Some(id) if id < 0 => {
                    return Err(AppError::InvalidReference(INVALID_DEPARTMENT.into()));
                }
                Some(id) => Some(id),
            },
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedId {
    pub id: i32,
}

// Corpo de assign-role / unassign-role
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RoleAssignmentPayload {
    #[validate(
        required(message = "Employee ID and Role ID are required"),
        range(min = 1, message = "Employee ID and Role ID are required")
    )]
    #[schema(example = 1)]
    pub employee_id: Option<i32>,

    #[validate(
        required(message = "Employee ID and Role ID are required"),
        range(min = 1, message = "Employee ID and Role ID are required")
    )]
    #[schema(example = 3)]
    pub role_id: Option<i32>,
}

impl RoleAssignmentPayload {
    pub fn new(employee_id: i32, role_id: i32) -> Self {
        Self { employee_id: Some(employee_id), role_id: Some(role_id) }
    }

    pub fn pair(&self) -> Result<(i32, i32), AppError> {
        match (self.employee_id, self.role_id) {
            (Some(e), Some(r)) if e > 0 && r > 0 => Ok((e, r)),
            _ => Err(AppError::Validation("Employee ID and Role ID are required".into())),
        }
    }
}

// PUT /api/employees/{id}/roles: conjunto completo desejado
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SetRolesPayload {
    #[validate(required(message = "role_ids is required"))]
    pub role_ids: Option<Vec<i32>>,
}

// O que a troca transacional de cargos efetivamente fez
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleChanges {
    pub assigned: Vec<i32>,
    pub unassigned: Vec<i32>,
}

impl RoleChanges {
    /// Diferença entre o que o funcionário tem e o que se deseja:
    /// `assigned = desired \ previous`, `unassigned = previous \ desired`.
    /// Duplicatas são ignoradas e as listas saem em ordem crescente.
    pub fn between(previous: &[i32], desired: &[i32]) -> Self {
        let previous: BTreeSet<i32> = previous.iter().copied().collect();
        let desired: BTreeSet<i32> = desired.iter().copied().collect();

        Self {
            assigned: desired.difference(&previous).copied().collect(),
            unassigned: previous.difference(&desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty() && self.unassigned.is_empty()
    }
}

// Query string de GET /api/employees
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEmployeesQuery {
    /// Página, a partir de 1 (padrão 1)
    pub page: Option<i64>,
    /// Itens por página (padrão 10)
    pub limit: Option<i64>,
    /// Busca em nome, sobrenome, e-mail ou departamento
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, AppError> {
        let page = page.unwrap_or(Self::DEFAULT_PAGE);
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);

        if page < 1 {
            return Err(AppError::Validation("page must be greater than or equal to 1".into()));
        }
        if limit < 1 {
            return Err(AppError::Validation("limit must be greater than 0".into()));
        }
        if (page - 1).checked_mul(limit).is_none() {
            return Err(AppError::Validation("page is out of range".into()));
        }

        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Quantidade de páginas para `total` itens com `limit` por página.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
