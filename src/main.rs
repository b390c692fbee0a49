//src/main.rs

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::broadcast::error::RecvError};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod clients;
mod common;
mod config;
mod docs;
mod handlers;
mod models;
mod services;

use crate::clients::BroadcastNavigator;
use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

// Um único event loop: as coletas concorrem cooperativamente na mesma thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let (navigator, mut navigation_events) = BroadcastNavigator::new(16);
    let app_state = AppState::new(&config, Arc::new(navigator))?;

    // A camada de telas assina os eventos de navegação; aqui só registramos
    tokio::spawn(async move {
        loop {
            match navigation_events.recv().await {
                Ok(event) => tracing::warn!("➡️ Navegação solicitada: {:?}", event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("{} eventos de navegação perdidos", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    app_state.report_service.watch_filters();
    if let Some(every) = config.refresh_interval {
        app_state.report_service.schedule_refresh(every);
    }

    // Coleta inicial com o filtro de hoje
    let initial = app_state.report_service.clone();
    tokio::spawn(async move {
        if let Err(e) = initial.refetch().await {
            tracing::warn!("Coleta inicial falhou: {}", e);
        }
    });

    let report_routes = Router::new()
        .route("/", get(handlers::reports::get_snapshot))
        .route("/filter", get(handlers::reports::get_filter))
        .route("/filter/date", put(handlers::reports::set_date))
        .route("/filter/period", put(handlers::reports::set_period))
        .route("/filter/location", put(handlers::reports::set_location))
        .route("/refetch", post(handlers::reports::refetch));

    let session_routes = Router::new()
        .route("/"
               ,post(handlers::session::create_session)
               .get(handlers::session::get_session)
        );

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/reports", report_routes)
        .nest("/api/session", session_routes)
        .with_state(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
