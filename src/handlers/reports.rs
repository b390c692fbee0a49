// src/handlers/reports.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        filter::{parse_report_date, Filter, LocationFilter, Period},
        snapshot::ReportSnapshot,
    },
    services::report_service::RunOutcome,
};

// ---
// Validação: a data chega como texto das telas
// ---
fn validate_report_date(value: &str) -> Result<(), ValidationError> {
    if parse_report_date(value).is_err() {
        let mut err = ValidationError::new("date_format");
        err.message = Some("A data deve estar no formato DD.MM.YYYY.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetDatePayload {
    #[validate(custom(function = "validate_report_date"))]
    #[schema(example = "19.10.2026")]
    pub date: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPeriodPayload {
    pub period: Period,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetLocationPayload {
    #[validate(length(min = 1, message = "O campo 'locationId' é obrigatório."))]
    #[schema(example = "all")]
    pub location_id: String,
}

// GET /api/reports
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    responses(
        (status = 200, description = "Último snapshot aceito, com status de carregamento", body = ReportSnapshot)
    )
)]
pub async fn get_snapshot(State(app_state): State<AppState>) -> Json<ReportSnapshot> {
    Json(app_state.read_model.snapshot())
}

// GET /api/reports/filter
#[utoipa::path(
    get,
    path = "/api/reports/filter",
    tag = "Reports",
    responses(
        (status = 200, description = "Filtro atual", body = Filter)
    )
)]
pub async fn get_filter(State(app_state): State<AppState>) -> Json<Filter> {
    Json(app_state.filter_state.current())
}

// PUT /api/reports/filter/date
#[utoipa::path(
    put,
    path = "/api/reports/filter/date",
    tag = "Reports",
    request_body = SetDatePayload,
    responses(
        (status = 202, description = "Filtro trocado; a coleta roda em segundo plano", body = Filter),
        (status = 400, description = "Data fora do formato DD.MM.YYYY")
    )
)]
pub async fn set_date(
    State(app_state): State<AppState>,
    Json(payload): Json<SetDatePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let date = parse_report_date(&payload.date)
        .map_err(|_| AppError::InvalidDate(payload.date.clone()))?;
    let filter = app_state.filter_state.set_date(date);

    Ok((StatusCode::ACCEPTED, Json(filter)))
}

// PUT /api/reports/filter/period
#[utoipa::path(
    put,
    path = "/api/reports/filter/period",
    tag = "Reports",
    request_body = SetPeriodPayload,
    responses(
        (status = 202, description = "Filtro trocado; a coleta roda em segundo plano", body = Filter)
    )
)]
pub async fn set_period(
    State(app_state): State<AppState>,
    Json(payload): Json<SetPeriodPayload>,
) -> impl IntoResponse {
    let filter = app_state.filter_state.set_period(payload.period);
    (StatusCode::ACCEPTED, Json(filter))
}

// PUT /api/reports/filter/location
#[utoipa::path(
    put,
    path = "/api/reports/filter/location",
    tag = "Reports",
    request_body = SetLocationPayload,
    responses(
        (status = 202, description = "Filtro trocado; a coleta roda em segundo plano", body = Filter),
        (status = 400, description = "Loja vazia")
    )
)]
pub async fn set_location(
    State(app_state): State<AppState>,
    Json(payload): Json<SetLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let filter = app_state
        .filter_state
        .set_location(LocationFilter::from(payload.location_id));

    Ok((StatusCode::ACCEPTED, Json(filter)))
}

// POST /api/reports/refetch
#[utoipa::path(
    post,
    path = "/api/reports/refetch",
    tag = "Reports",
    responses(
        (status = 200, description = "Coleta aceita e publicada", body = ReportSnapshot),
        (status = 202, description = "Coleta descartada por uma mais recente", body = ReportSnapshot),
        (status = 401, description = "Sessão expirada")
    )
)]
pub async fn refetch(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let status = match app_state.report_service.refetch().await? {
        RunOutcome::Accepted { .. } => StatusCode::OK,
        RunOutcome::Superseded { .. } => StatusCode::ACCEPTED,
    };

    Ok((status, Json(app_state.read_model.snapshot())))
}
