use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::reports::SourceName;

// Falha de UMA fonte. Nunca vira erro global: o orquestrador troca pelo valor vazio.
#[derive(Debug, Error)]
pub enum SourceError {
    // Só 401; um 403 chega como `Status`
    #[error("Credencial rejeitada pelo servidor (HTTP {0})")]
    Unauthorized(u16),

    #[error("Servidor respondeu HTTP {0}")]
    Status(u16),

    #[error("Falha de transporte: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Resposta inválida: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SourceError::Unauthorized(_))
    }
}

// Falha no nível da sessão: o lote inteiro não pode ser tentado.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionFault {
    #[error("Nenhum token de sessão armazenado")]
    MissingToken,

    #[error("Token de sessão expirado")]
    TokenExpired,

    #[error("Token rejeitado pelo servidor (fonte {by})")]
    Rejected { by: SourceName },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Sessão expirada: {0}")]
    SessionExpired(#[from] SessionFault),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data inválida: {0}")]
    InvalidDate(String),

    #[error("{0}")]
    Run(#[from] RunError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidDate(raw) => (
                StatusCode::BAD_REQUEST,
                format!("A data '{}' não está no formato DD.MM.YYYY.", raw),
            ),
            AppError::Run(RunError::SessionExpired(fault)) => {
                tracing::warn!("Sessão expirada: {}", fault);
                (
                    StatusCode::UNAUTHORIZED,
                    "Sessão expirada. Faça login novamente.".to_string(),
                )
            }
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
