// src/services/read_model.rs

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

use crate::models::{
    derived::DerivedReports,
    filter::Filter,
    reports::AggregateReadModel,
    snapshot::{LoadStatus, ReportSnapshot},
};

/// Último snapshot aceito. Só muda por substituição; quem lê recebe clones baratos (Arc).
#[derive(Clone)]
pub struct ReadModel {
    tx: Arc<watch::Sender<ReportSnapshot>>,
}

impl Default for ReadModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadModel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ReportSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> ReportSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ReportSnapshot> {
        self.tx.subscribe()
    }

    /// Idle/Error -> Loading. Os dados anteriores continuam visíveis.
    pub(crate) fn begin_loading(&self) {
        self.tx.send_if_modified(|snapshot| {
            if snapshot.status == LoadStatus::Loading {
                return false;
            }
            snapshot.status = LoadStatus::Loading;
            true
        });
    }

    /// Publica o resultado da época `epoch`. Recusa épocas mais antigas que a já publicada.
    pub(crate) fn publish(
        &self,
        epoch: u64,
        filter: Filter,
        data: Arc<AggregateReadModel>,
        derived: Arc<DerivedReports>,
    ) -> bool {
        self.tx.send_if_modified(|snapshot| {
            if epoch <= snapshot.epoch {
                return false;
            }
            *snapshot = ReportSnapshot {
                epoch,
                filter: Some(filter),
                data: Some(data),
                derived: Some(derived),
                status: LoadStatus::Idle,
                error: None,
                updated_at: Some(Utc::now()),
            };
            true
        })
    }

    /// Marca erro sem tocar em `data`/`derived`.
    pub(crate) fn fail(&self, message: String) {
        self.tx.send_modify(|snapshot| {
            snapshot.status = LoadStatus::Error;
            snapshot.error = Some(message);
        });
    }
}
