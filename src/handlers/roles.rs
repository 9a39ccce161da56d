// src/handlers/roles.rs

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
        employee::CreatedId,
        role::{RoleFields, RoleList, RolePayload},
    },
};

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Roles",
    responses(
        (status = 200, description = "Lista de cargos", body = RoleList)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_roles(State(app_state): State<AppState>) -> Result<Json<RoleList>, AppError> {
    let roles = app_state.role_repo.list().await?;
    Ok(Json(RoleList { roles }))
}

// POST /api/roles
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "Roles",
    request_body = RolePayload,
    responses(
        (status = 201, description = "Cargo criado", body = CreatedId),
        (status = 400, description = "Título ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<RolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let fields = RoleFields::try_from(payload)?;
    let id = app_state.role_repo.create(&fields).await?;
    tracing::info!(role_id = id, user_id, "Role created");

    Ok((StatusCode::CREATED, Json(CreatedId { id })))
}

// PUT /api/roles/{id}
#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = "Roles",
    params(("id" = i32, Path, description = "ID do cargo")),
    request_body = RolePayload,
    responses(
        (status = 200, description = "Cargo atualizado", body = MessageResponse),
        (status = 400, description = "Título ausente"),
        (status = 404, description = "Cargo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<RolePayload>,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = RoleFields::try_from(payload)?;
    app_state.role_repo.update(id, &fields).await?;
    tracing::info!(role_id = id, user_id, "Role updated");

    Ok(Json(MessageResponse::new("Role updated")))
}

// DELETE /api/roles/{id}
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "Roles",
    params(("id" = i32, Path, description = "ID do cargo")),
    responses(
        (status = 200, description = "Cargo removido", body = MessageResponse),
        (status = 404, description = "Cargo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    app_state.role_repo.delete(id).await?;
    tracing::info!(role_id = id, user_id, "Role deleted");

    Ok(Json(MessageResponse::new("Role deleted")))
}
