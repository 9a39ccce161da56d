// src/client/error.rs

use thiserror::Error;

/// Erros do cliente HTTP
#[derive(Debug, Error)]
pub enum ClientError {
    /// Resposta não-2xx. `message` é o campo `error` do corpo, quando existe.
    #[error("API error {status}: {}", .message.as_deref().unwrap_or("<no error message>"))]
    Api { status: u16, message: Option<String> },

    /// Falha de transporte (sem resposta) ou corpo ilegível
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Texto para mostrar ao usuário: o `error` do servidor literalmente, ou
    /// a mensagem genérica da operação quando não houve resposta utilizável.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { message: Some(message), .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
