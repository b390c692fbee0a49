// src/handlers/session.rs

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SessionPayload {
    #[validate(length(min = 1, message = "O token é obrigatório."))]
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub logged_out: bool,
}

// POST /api/session
// O fluxo de login entrega o token novo; rearmamos o guard e recoletamos.
#[utoipa::path(
    post,
    path = "/api/session",
    tag = "Session",
    request_body = SessionPayload,
    responses(
        (status = 204, description = "Token registrado; coleta disparada"),
        (status = 400, description = "Token vazio")
    )
)]
pub async fn create_session(
    State(app_state): State<AppState>,
    Json(payload): Json<SessionPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.session_guard.resume(payload.token).await;

    let service = app_state.report_service.clone();
    tokio::spawn(async move {
        if let Err(e) = service.refetch().await {
            tracing::warn!("Coleta após login falhou: {}", e);
        }
    });

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/session
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Session",
    responses(
        (status = 200, description = "Estado da sessão", body = SessionStatus)
    )
)]
pub async fn get_session(State(app_state): State<AppState>) -> Json<SessionStatus> {
    Json(SessionStatus {
        logged_out: app_state.session_guard.is_logged_out(),
    })
}
