// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{error::AppError, extract::ValidatedJson},
    config::AppState,
    models::auth::{AuthResponse, CredentialsPayload, MessageResponse},
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = CredentialsPayload,
    responses(
        (status = 201, description = "Usuário criado", body = MessageResponse),
        (status = 400, description = "Campos ausentes ou e-mail já cadastrado"),
        (status = 500, description = "Erro de banco")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (email, password) = payload.into_parts()?;

    app_state.auth_service.register_user(&email, &password).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("User registered"))))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = CredentialsPayload,
    responses(
        (status = 200, description = "Token emitido", body = AuthResponse),
        (status = 400, description = "Campos ausentes"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let (email, password) = payload.into_parts()?;

    let token = app_state.auth_service.login_user(&email, &password).await?;

    Ok(Json(AuthResponse { token }))
}
