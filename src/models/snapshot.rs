// src/models/snapshot.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::models::{derived::DerivedReports, filter::Filter, reports::AggregateReadModel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

/// O que as telas enxergam. O snapshot anterior continua visível
/// enquanto uma nova coleta carrega ou depois de um erro de sessão.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    /// Época da coleta que produziu `data` (0 = nada aceito ainda).
    pub epoch: u64,
    pub filter: Option<Filter>,
    #[schema(value_type = Option<Object>)]
    pub data: Option<Arc<AggregateReadModel>>,
    #[schema(value_type = Option<DerivedReports>)]
    pub derived: Option<Arc<DerivedReports>>,
    pub status: LoadStatus,
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReportSnapshot {
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}
