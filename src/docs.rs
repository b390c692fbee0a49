// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Reports ---
        handlers::reports::get_snapshot,
        handlers::reports::get_filter,
        handlers::reports::set_date,
        handlers::reports::set_period,
        handlers::reports::set_location,
        handlers::reports::refetch,

        // --- Session ---
        handlers::session::create_session,
        handlers::session::get_session,
    ),
    components(
        schemas(
            // --- Filtro ---
            models::filter::Filter,
            models::filter::Period,

            // --- Snapshot ---
            models::snapshot::ReportSnapshot,
            models::snapshot::LoadStatus,

            // --- Derivados ---
            models::derived::DerivedReports,
            models::derived::Breakdowns,
            models::derived::Breakdown,
            models::derived::BreakdownItem,
            models::derived::ChartPoint,
            models::derived::MetricLabel,
            models::derived::QuestLeaderboard,
            models::derived::LeaderboardEntry,

            // --- Payloads ---
            handlers::reports::SetDatePayload,
            handlers::reports::SetPeriodPayload,
            handlers::reports::SetLocationPayload,
            handlers::session::SessionPayload,
            handlers::session::SessionStatus,
        )
    ),
    tags(
        (name = "Reports", description = "Relatórios agregados e filtro atual"),
        (name = "Session", description = "Token da sessão do back-office")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
