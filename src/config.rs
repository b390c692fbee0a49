// src/config.rs

use anyhow::Context;
use std::{env, sync::Arc, time::Duration};

use crate::{
    clients::{CredentialStore, HttpReportClient, MemoryCredentialStore, Navigator, ReportSource},
    models::filter::{Filter, LocationFilter},
    services::{
        filter_state::FilterState, read_model::ReadModel, report_service::ReportService,
        session_guard::SessionGuard,
    },
};

#[derive(Debug, Clone)]
pub struct Config {
    pub reports_api_url: String,
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub default_location: LocationFilter,
    pub http_timeout: Duration,
    pub refresh_interval: Option<Duration>,
    pub session_leeway_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reports_api_url = lookup("REPORTS_API_URL")
            .filter(|url| !url.trim().is_empty())
            .context("REPORTS_API_URL deve ser definida")?;

        let secs = |key: &str| -> anyhow::Result<Option<u64>> {
            lookup(key)
                .map(|raw| raw.trim().parse::<u64>().with_context(|| format!("{} deve ser um número de segundos", key)))
                .transpose()
        };

        Ok(Self {
            reports_api_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            api_token: lookup("REPORTS_API_TOKEN"),
            default_location: lookup("REPORTS_LOCATION")
                .map(LocationFilter::from)
                .unwrap_or_default(),
            http_timeout: Duration::from_secs(secs("REPORTS_HTTP_TIMEOUT_SECS")?.unwrap_or(10)),
            refresh_interval: secs("REPORTS_REFRESH_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            session_leeway_secs: secs("REPORTS_SESSION_LEEWAY_SECS")?.unwrap_or(30),
        })
    }
}

/// Raiz de composição: monta o gráfico de dependências uma vez e é clonada nos handlers.
#[derive(Clone)]
pub struct AppState {
    pub filter_state: FilterState,
    pub read_model: ReadModel,
    pub session_guard: SessionGuard,
    pub report_service: ReportService,
}

impl AppState {
    pub fn new(config: &Config, navigator: Arc<dyn Navigator>) -> anyhow::Result<Self> {
        let client = HttpReportClient::new(&config.reports_api_url, config.http_timeout)
            .context("Falha ao criar o cliente HTTP de relatórios")?;
        let store = Arc::new(MemoryCredentialStore::new(config.api_token.clone()));

        tracing::info!("✅ Cliente de relatórios apontando para {}", config.reports_api_url);

        Ok(Self::assemble(
            Arc::new(client),
            store,
            navigator,
            Filter::today(config.default_location.clone()),
            config.session_leeway_secs,
        ))
    }

    pub fn assemble(
        source: Arc<dyn ReportSource>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        initial_filter: Filter,
        session_leeway_secs: u64,
    ) -> Self {
        let filter_state = FilterState::new(initial_filter);
        let read_model = ReadModel::new();
        let session_guard = SessionGuard::new(store, navigator, session_leeway_secs);
        let report_service = ReportService::new(
            source,
            session_guard.clone(),
            filter_state.clone(),
            read_model.clone(),
        );

        Self {
            filter_state,
            read_model,
            session_guard,
            report_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_url_is_set() {
        let config = Config::from_lookup(lookup(&[("REPORTS_API_URL", "http://api.local")])).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.default_location, LocationFilter::All);
        assert_eq!(config.http_timeout, Duration::from_secs(10));
        assert_eq!(config.refresh_interval, None);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn url_is_required() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn bad_numbers_are_reported() {
        let result = Config::from_lookup(lookup(&[
            ("REPORTS_API_URL", "http://api.local"),
            ("REPORTS_REFRESH_SECS", "cinco"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn reads_location_and_refresh() {
        let config = Config::from_lookup(lookup(&[
            ("REPORTS_API_URL", "http://api.local"),
            ("REPORTS_LOCATION", "loja-7"),
            ("REPORTS_REFRESH_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.default_location, LocationFilter::Id("loja-7".into()));
        assert_eq!(config.refresh_interval, Some(Duration::from_secs(60)));
    }
}
