// src/services/report_service.rs

use std::future::Future;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::{
    clients::{ReportQuery, ReportSource},
    common::error::{RunError, SessionFault, SourceError},
    models::{
        filter::Filter,
        reports::{AggregateReadModel, SourceName, SourceResult},
    },
    services::{
        derived_metrics,
        filter_state::FilterState,
        read_model::ReadModel,
        session_guard::SessionGuard,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Publicado no ReadModel.
    Accepted { epoch: u64, fallbacks: Vec<SourceName> },
    /// Uma coleta mais nova começou antes desta terminar; resultado descartado.
    Superseded { epoch: u64, latest: u64 },
}

// Resultado de uma fonte + se ela rejeitou a credencial
type Settled<T> = (SourceResult<T>, Option<SourceName>);

async fn settle<T, F>(source: SourceName, fetch: F) -> Settled<T>
where
    T: Default,
    F: Future<Output = Result<T, SourceError>>,
{
    match fetch.await {
        Ok(value) => (SourceResult::Ok(value), None),
        Err(err) => {
            tracing::warn!("⚠️ Fonte '{}' falhou, usando valor vazio: {}", source, err);
            let rejected = err.is_unauthorized().then_some(source);
            (SourceResult::Fallback(T::default()), rejected)
        }
    }
}

struct Batch {
    aggregate: AggregateReadModel,
    rejected_by: Option<SourceName>,
}

/// Orquestra a coleta: uma busca por fonte, todas ao mesmo tempo, tolerando falhas isoladas.
#[derive(Clone)]
pub struct ReportService {
    source: Arc<dyn ReportSource>,
    session: SessionGuard,
    filters: FilterState,
    read_model: ReadModel,
    epoch: Arc<AtomicU64>,
}

impl ReportService {
    pub fn new(
        source: Arc<dyn ReportSource>,
        session: SessionGuard,
        filters: FilterState,
        read_model: ReadModel,
    ) -> Self {
        Self {
            source,
            session,
            filters,
            read_model,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn latest_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Uma coleta completa para `filter`. Só a época mais recente publica.
    pub async fn run(&self, filter: Filter) -> Result<RunOutcome, RunError> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.read_model.begin_loading();
        tracing::debug!("Coleta #{} iniciada para {:?}", epoch, filter);

        let token = match self.session.authorize().await {
            Ok(token) => token,
            Err(fault) => return Err(self.session_expired(epoch, fault).await),
        };

        let query = ReportQuery { filter, token };
        let batch = self.fetch_all(&query).await;

        let latest = self.latest_epoch();
        if latest != epoch {
            tracing::debug!("Coleta #{} descartada (mais recente: #{})", epoch, latest);
            return Ok(RunOutcome::Superseded { epoch, latest });
        }

        if let Some(by) = batch.rejected_by {
            return Err(self.session_expired(epoch, SessionFault::Rejected { by }).await);
        }

        let aggregate = Arc::new(batch.aggregate);
        let derived = Arc::new(derived_metrics::derive(&aggregate));
        let fallbacks = aggregate.fallback_sources();

        if !self.read_model.publish(epoch, query.filter, aggregate, derived) {
            return Ok(RunOutcome::Superseded { epoch, latest: self.latest_epoch() });
        }

        if fallbacks.is_empty() {
            tracing::info!("✅ Coleta #{} publicada", epoch);
        } else {
            tracing::info!("✅ Coleta #{} publicada ({} fontes vazias: {:?})", epoch, fallbacks.len(), fallbacks);
        }
        Ok(RunOutcome::Accepted { epoch, fallbacks })
    }

    /// Refaz a coleta com o filtro atual, sem esperar mudança de filtro.
    pub async fn refetch(&self) -> Result<RunOutcome, RunError> {
        self.run(self.filters.current()).await
    }

    // Fan-out/fan-in na mesma task: nenhuma fonte bloqueia ou aborta as outras
    async fn fetch_all(&self, query: &ReportQuery) -> Batch {
        let source = self.source.as_ref();

        let (
            metrics,
            orders,
            employees,
            moneyflow,
            profit_loss,
            analytics,
            goods,
            general_orders,
            sales_dynamics,
            organizations,
        ) = tokio::join!(
            settle(SourceName::Metrics, source.metrics(query)),
            settle(SourceName::Orders, source.orders(query)),
            settle(SourceName::Employees, source.employees(query)),
            settle(SourceName::Moneyflow, source.moneyflow(query)),
            settle(SourceName::ProfitLoss, source.profit_loss(query)),
            settle(SourceName::Analytics, source.analytics(query)),
            settle(SourceName::Goods, source.goods(query)),
            settle(SourceName::GeneralOrders, source.general_orders(query)),
            settle(SourceName::SalesDynamics, source.sales_dynamics(query)),
            settle(SourceName::Organizations, source.organizations(query)),
        );

        let rejected_by = [
            metrics.1,
            orders.1,
            employees.1,
            moneyflow.1,
            profit_loss.1,
            analytics.1,
            goods.1,
            general_orders.1,
            sales_dynamics.1,
            organizations.1,
        ]
        .into_iter()
        .flatten()
        .next();

        Batch {
            aggregate: AggregateReadModel {
                metrics: metrics.0,
                orders: orders.0,
                employees: employees.0,
                moneyflow: moneyflow.0,
                profit_loss: profit_loss.0,
                analytics: analytics.0,
                goods: goods.0,
                general_orders: general_orders.0,
                sales_dynamics: sales_dynamics.0,
                organizations: organizations.0,
            },
            rejected_by,
        }
    }

    async fn session_expired(&self, epoch: u64, fault: SessionFault) -> RunError {
        tracing::error!("🔥 Coleta #{} abortada: {}", epoch, fault);
        self.read_model.fail(fault.to_string());
        self.session.expire(&fault).await;
        RunError::SessionExpired(fault)
    }

    /// Dispara uma coleta para cada mudança de filtro. Coletas podem se sobrepor;
    /// a época garante que só a última publica.
    pub fn watch_filters(&self) -> JoinHandle<()> {
        let service = self.clone();
        let mut changes = self.filters.subscribe();

        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let filter = changes.borrow_and_update().clone();
                let run = service.clone();
                tokio::spawn(async move {
                    if let Err(e) = run.run(filter).await {
                        tracing::warn!("Coleta após mudança de filtro falhou: {}", e);
                    }
                });
            }
        })
    }

    /// Recoleta periódica com o filtro atual.
    pub fn schedule_refresh(&self, every: Duration) -> JoinHandle<()> {
        let service = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // O primeiro tick é imediato; a coleta inicial já é feita no boot
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = service.refetch().await {
                    tracing::warn!("Recoleta periódica falhou: {}", e);
                }
            }
        })
    }
}
