// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState};

/// Usuário autenticado (o `userId` do token), inserido nas extensions pelo guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub i32);

/// Extrai o token do cabeçalho `Authorization`.
/// Sem cabeçalho ou com token vazio: `MissingToken` (401).
fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AppError::MissingToken)?;

    // Cabeçalho presente mas ilegível conta como token inválido
    let value = header.to_str().map_err(|_| AppError::InvalidToken)?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    if token.is_empty() {
        return Err(AppError::MissingToken);
    }
    Ok(token)
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = bearer_token(&request)?;
        app_state.auth_service.validate_token(token)?
    };

    request.extensions_mut().insert(AuthenticatedUser(claims.user_id));
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AppError::MissingToken)
    }
}
