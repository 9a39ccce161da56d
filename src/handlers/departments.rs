// src/handlers/departments.rs

use axum::{
    extract::State,
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
        department::{Department, DepartmentCreated, DepartmentFields, DepartmentPayload},
    },
};

// GET /api/departments
#[utoipa::path(
    get,
    path = "/api/departments",
    tag = "Departments",
    responses(
        (status = 200, description = "Lista de departamentos", body = Vec<Department>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_departments(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(app_state.department_repo.list().await?))
}

// POST /api/departments
#[utoipa::path(
    post,
    path = "/api/departments",
    tag = "Departments",
    request_body = DepartmentPayload,
    responses(
        (status = 201, description = "Departamento criado", body = DepartmentCreated),
        (status = 400, description = "Nome ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_department(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<DepartmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let fields = DepartmentFields::try_from(payload)?;
    let id = app_state.department_repo.create(&fields).await?;
    tracing::info!(department_id = id, user_id, "Department created");

    Ok((
        StatusCode::CREATED,
        Json(DepartmentCreated { message: "Department created".into(), id }),
    ))
}

// PUT /api/departments/{id}
#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "ID do departamento")),
    request_body = DepartmentPayload,
    responses(
        (status = 200, description = "Departamento atualizado", body = MessageResponse),
        (status = 400, description = "Nome ausente"),
        (status = 404, description = "Departamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_department(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<DepartmentPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = DepartmentFields::try_from(payload)?;
    app_state.department_repo.update(id, &fields).await?;
    tracing::info!(department_id = id, user_id, "Department updated");

    Ok(Json(MessageResponse::new("Department updated")))
}

// DELETE /api/departments/{id}
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "ID do departamento")),
    responses(
        (status = 200, description = "Departamento removido", body = MessageResponse),
        (status = 404, description = "Departamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_department(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.department_repo.delete(id).await?;
    tracing::info!(department_id = id, user_id, "Department deleted");

    Ok(Json(MessageResponse::new("Department deleted")))
}
