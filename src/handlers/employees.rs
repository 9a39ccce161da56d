// src/handlers/employees.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{
        error::AppError,
        extract::{IdPath, ValidatedJson},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::MessageResponse,
        employee::{
            CreatedId, Employee, EmployeeFields, EmployeePage, EmployeePayload,
            ListEmployeesQuery, Pagination, RoleAssignmentPayload, RoleChanges, SetRolesPayload,
        },
    },
};

// =============================================================================
//  CRUD
// =============================================================================

// GET /api/employees?page&limit&search
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(ListEmployeesQuery),
    responses(
        (status = 200, description = "Página de funcionários com cargos e total", body = EmployeePage),
        (status = 400, description = "Paginação inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    query: Result<Query<ListEmployeesQuery>, QueryRejection>,
) -> Result<Json<EmployeePage>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let pagination = Pagination::new(query.page, query.limit)?;
    let search = query.search.unwrap_or_default();

    let page = app_state.employee_service.list(pagination, &search).await?;
    Ok(Json(page))
}

// GET /api/employees/{id}
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário com departamento e cargos", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(app_state.employee_service.get(id).await?))
}

// POST /api/employees
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Funcionário criado", body = CreatedId),
        (status = 400, description = "Campos ausentes, e-mail duplicado ou department_id inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<EmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    let fields = EmployeeFields::try_from(payload)?;
    let id = app_state.employee_service.create(&fields).await?;
    tracing::info!(employee_id = id, user_id, "Employee created");

    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

// PUT /api/employees/{id}
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "ID do funcionário")),
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Funcionário atualizado", body = MessageResponse),
        (status = 400, description = "Campos ausentes, e-mail duplicado ou department_id inválido"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<EmployeePayload>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = EmployeeFields::try_from(payload)?;
    app_state.employee_service.update(id, &fields).await?;
    tracing::info!(employee_id = id, user_id, "Employee updated");

    Ok(Json(MessageResponse::new("Employee updated")))
}

// DELETE /api/employees/{id}
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário removido", body = MessageResponse),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.employee_service.delete(id).await?;
    tracing::info!(employee_id = id, user_id, "Employee deleted");

    Ok(Json(MessageResponse::new("Employee deleted")))
}

// =============================================================================
//  ATRIBUIÇÃO DE CARGOS
// =============================================================================

// POST /api/employees/assign-role
#[utoipa::path(
    post,
    path = "/api/employees/assign-role",
    tag = "Employees",
    request_body = RoleAssignmentPayload,
    responses(
        (status = 201, description = "Cargo atribuído", body = MessageResponse),
        (status = 400, description = "IDs ausentes ou cargo já atribuído"),
        (status = 404, description = "Funcionário ou cargo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<RoleAssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (employee_id, role_id) = payload.pair()?;
    app_state.employee_service.assign_role(employee_id, role_id).await?;
    tracing::info!(employee_id, role_id, user_id, "Role assigned");

    Ok((StatusCode::CREATED, Json(MessageResponse::new("Role assigned"))))
}

// DELETE /api/employees/unassign-role
#[utoipa::path(
    delete,
    path = "/api/employees/unassign-role",
    tag = "Employees",
    request_body = RoleAssignmentPayload,
    responses(
        (status = 200, description = "Cargo removido do funcionário", body = MessageResponse),
        (status = 400, description = "IDs ausentes"),
        (status = 404, description = "Atribuição não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn unassign_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<RoleAssignmentPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    let (employee_id, role_id) = payload.pair()?;
    app_state.employee_service.unassign_role(employee_id, role_id).await?;
    tracing::info!(employee_id, role_id, user_id, "Role unassigned");

    Ok(Json(MessageResponse::new("Role unassigned")))
}

// PUT /api/employees/{id}/roles
#[utoipa::path(
    put,
    path = "/api/employees/{id}/roles",
    tag = "Employees",
    params(("id" = i32, Path, description = "ID do funcionário")),
    request_body = SetRolesPayload,
    responses(
        (status = 200, description = "Cargos substituídos numa transação", body = RoleChanges),
        (status = 400, description = "role_ids ausente ou cargo inexistente"),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_roles(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<SetRolesPayload>,
) -> Result<Json<RoleChanges>, AppError> {
    let desired = payload.role_ids.unwrap_or_default();
    let changes = app_state.employee_service.replace_roles(id, &desired).await?;
    tracing::info!(employee_id = id, user_id, "Employee roles replaced");

    Ok(Json(changes))
}
