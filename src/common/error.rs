// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Campo obrigatório ausente ou corpo malformado (mensagem pronta para o cliente)
    #[error("{0}")]
    Validation(String),

    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    // Violação de unicidade (e-mail, par funcionário/cargo)
    #[error("{0}")]
    Conflict(String),

    // Chave estrangeira apontando para um registro inexistente
    #[error("{0}")]
    InvalidReference(String),

    // O nome do recurso: "Employee", "Department", "Role assignment"...
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    // Erro do banco não classificado. O contexto vira a mensagem para o cliente,
    // o `source` só aparece no log.
    #[error("Database error {context}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::ValidationError(_)
            | AppError::Conflict(_)
            | AppError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem exposta no campo `error` da resposta.
    pub fn client_message(&self) -> String {
        match self {
            // O validator agrupa por campo; devolvemos a primeira mensagem em ordem alfabética
            // de campo para a resposta ser determinística.
            AppError::ValidationError(errors) => {
                let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
                fields.sort_by(|a, b| a.0.cmp(&b.0));
                fields
                    .into_iter()
                    .flat_map(|(_, errs)| errs.iter())
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "Invalid request body".to_string())
            }
            AppError::Database { .. } => self.to_string(),
            e if e.status() == StatusCode::INTERNAL_SERVER_ERROR => {
                "Internal server error".to_string()
            }
            e => e.to_string(),
        }
    }

    /// Converte o erro do sqlx em `Database` com o contexto da operação.
    pub fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |source| AppError::Database { context, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Database { context, source } => {
                tracing::error!(error = ?source, "Database error {}", context);
            }
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(error = ?e, "Internal server error: {}", e);
            }
            _ => {}
        }

        let body = Json(json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}
