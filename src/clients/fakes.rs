// src/clients/fakes.rs
// Colaboradores falsos usados só nos testes.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};
use uuid::Uuid;

use crate::{
    clients::{
        credential_store::{CredentialStore, MemoryCredentialStore},
        navigator::Navigator,
        report_client::{ReportQuery, ReportSource},
    },
    common::error::SourceError,
    models::reports::*,
};

#[derive(Default)]
pub struct FakeReportSource {
    failing: HashSet<SourceName>,
    rejecting: HashSet<SourceName>,
    forbidding: HashSet<SourceName>,
    undecodable: HashSet<SourceName>,
    delays: HashMap<NaiveDate, Duration>,
    calls: AtomicUsize,
}

impl FakeReportSource {
    pub fn failing(mut self, source: SourceName) -> Self {
        self.failing.insert(source);
        self
    }

    pub fn rejecting(mut self, source: SourceName) -> Self {
        self.rejecting.insert(source);
        self
    }

    /// Responde 403 (sem acesso ao relatório), como o cliente HTTP mapeia.
    pub fn forbidding(mut self, source: SourceName) -> Self {
        self.forbidding.insert(source);
        self
    }

    pub fn undecodable(mut self, source: SourceName) -> Self {
        self.undecodable.insert(source);
        self
    }

    /// Atrasa todas as fontes quando o filtro tem esta data.
    pub fn delayed(mut self, date: NaiveDate, delay: Duration) -> Self {
        self.delays.insert(date, delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn respond<T>(&self, source: SourceName, query: &ReportQuery, value: T) -> Result<T, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&query.filter.date) {
            tokio::time::sleep(*delay).await;
        }
        if self.rejecting.contains(&source) {
            return Err(SourceError::Unauthorized(401));
        }
        if self.forbidding.contains(&source) {
            return Err(SourceError::Status(403));
        }
        if self.undecodable.contains(&source) {
            let err = serde_json::from_str::<MetricsReport>("<html>").unwrap_err();
            return Err(SourceError::Decode(err));
        }
        if self.failing.contains(&source) {
            return Err(SourceError::Status(503));
        }
        Ok(value)
    }
}

pub fn sample_metrics(query: &ReportQuery) -> MetricsReport {
    use chrono::Datelike;

    MetricsReport {
        revenue: Decimal::from(125_000),
        orders_count: 84,
        average_check: Decimal::new(148_810, 2),
        // Permite saber de qual coleta veio o dado
        guests: u64::from(query.filter.date.day()),
    }
}

pub fn sample_goods() -> GoodsReport {
    let item = |name: &str, category: &str, revenue: i64| GoodsItem {
        id: Uuid::new_v4(),
        name: name.into(),
        category: category.into(),
        quantity: Decimal::from(10),
        revenue: Decimal::from(revenue),
    };

    GoodsReport {
        items: vec![
            item("Pizza Margherita", "Cozinha", 40_000),
            item("Refrigerante", "Bebidas", 15_000),
            item("Petit Gâteau", "Sobremesas", 25_000),
            item("Lasanha", "Cozinha", 20_000),
            item("Cerveja", "Bebidas", 20_000),
        ],
    }
}

pub fn sample_moneyflow() -> MoneyflowReport {
    MoneyflowReport {
        income: Decimal::from(120_000),
        expense: Decimal::from(45_000),
        payment_types: vec![
            PaymentTypeAmount { payment_type: "Cartão".into(), amount: Decimal::from(90_000) },
            PaymentTypeAmount { payment_type: "Dinheiro".into(), amount: Decimal::from(30_000) },
        ],
    }
}

pub fn sample_profit_loss() -> ProfitLossReport {
    ProfitLossReport {
        revenue: Decimal::from(120_000),
        cost_of_goods: Decimal::from(40_000),
        gross_profit: Decimal::from(80_000),
        expenses: vec![
            ExpenseLine { name: "Aluguel".into(), amount: Decimal::from(20_000) },
            ExpenseLine { name: "Salários".into(), amount: Decimal::from(25_000) },
        ],
        net_profit: Decimal::from(35_000),
    }
}

pub fn participant(id: u128, name: &str, progress: u32, completed: bool) -> QuestParticipant {
    QuestParticipant {
        subject_id: Uuid::from_u128(id),
        name: name.into(),
        progress,
        completed,
    }
}

pub fn sample_analytics() -> AnalyticsReport {
    AnalyticsReport {
        quests: vec![QuestReport {
            quest_id: Uuid::from_u128(100),
            title: "Vender 10 sobremesas".into(),
            reward_points: 100,
            target: 10,
            participants: vec![
                participant(1, "Ana", 5, false),
                participant(2, "Bruno", 10, true),
                participant(3, "Carla", 5, false),
                participant(4, "Diego", 2, false),
                participant(5, "Elisa", 8, false),
            ],
        }],
    }
}

pub fn sample_sales_dynamics() -> SalesDynamicsReport {
    SalesDynamicsReport {
        points: vec![
            SalesPoint { date: "01.03.2024".into(), revenue: Decimal::from(950), orders: 3 },
            SalesPoint { date: "02.03.2024".into(), revenue: Decimal::from(18_400), orders: 41 },
            SalesPoint { date: "03.03.2024".into(), revenue: Decimal::from(2_300_000), orders: 900 },
        ],
    }
}

#[async_trait]
impl ReportSource for FakeReportSource {
    async fn metrics(&self, query: &ReportQuery) -> Result<MetricsReport, SourceError> {
        self.respond(SourceName::Metrics, query, sample_metrics(query)).await
    }

    async fn orders(&self, query: &ReportQuery) -> Result<OrdersReport, SourceError> {
        let orders = vec![OrderSummary {
            id: Uuid::from_u128(7),
            number: "A-7".into(),
            status: "closed".into(),
            payment_type: "Cartão".into(),
            total: Decimal::from(320),
            opened_at: None,
        }];
        self.respond(SourceName::Orders, query, OrdersReport { orders }).await
    }

    async fn employees(&self, query: &ReportQuery) -> Result<EmployeesReport, SourceError> {
        let employees = vec![EmployeeSummary {
            id: Uuid::from_u128(1),
            name: "Ana".into(),
            position: "Garçonete".into(),
            shifts: 5,
            hours_worked: Decimal::from(40),
            revenue: Decimal::from(18_000),
        }];
        self.respond(SourceName::Employees, query, EmployeesReport { employees }).await
    }

    async fn moneyflow(&self, query: &ReportQuery) -> Result<MoneyflowReport, SourceError> {
        self.respond(SourceName::Moneyflow, query, sample_moneyflow()).await
    }

    async fn profit_loss(&self, query: &ReportQuery) -> Result<ProfitLossReport, SourceError> {
        self.respond(SourceName::ProfitLoss, query, sample_profit_loss()).await
    }

    async fn analytics(&self, query: &ReportQuery) -> Result<AnalyticsReport, SourceError> {
        self.respond(SourceName::Analytics, query, sample_analytics()).await
    }

    async fn goods(&self, query: &ReportQuery) -> Result<GoodsReport, SourceError> {
        self.respond(SourceName::Goods, query, sample_goods()).await
    }

    async fn general_orders(&self, query: &ReportQuery) -> Result<GeneralOrdersReport, SourceError> {
        let report = GeneralOrdersReport {
            total_count: 84,
            by_type: vec![
                OrderTypeTotal { order_type: "Salão".into(), count: 60, amount: Decimal::from(90_000) },
                OrderTypeTotal { order_type: "Delivery".into(), count: 24, amount: Decimal::from(35_000) },
            ],
        };
        self.respond(SourceName::GeneralOrders, query, report).await
    }

    async fn sales_dynamics(&self, query: &ReportQuery) -> Result<SalesDynamicsReport, SourceError> {
        self.respond(SourceName::SalesDynamics, query, sample_sales_dynamics()).await
    }

    async fn organizations(&self, query: &ReportQuery) -> Result<OrganizationsReport, SourceError> {
        let organizations = vec![Organization {
            id: Uuid::from_u128(42),
            name: "Matriz".into(),
            address: Some("Rua Augusta, 100".into()),
        }];
        self.respond(SourceName::Organizations, query, OrganizationsReport { organizations }).await
    }
}

/// Conta quantas vezes o token foi removido.
#[derive(Default)]
pub struct RecordingCredentialStore {
    inner: MemoryCredentialStore,
    removals: AtomicUsize,
}

impl RecordingCredentialStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            inner: MemoryCredentialStore::new(Some(token.to_string())),
            removals: AtomicUsize::new(0),
        }
    }

    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for RecordingCredentialStore {
    async fn get_token(&self) -> Option<String> {
        self.inner.get_token().await
    }

    async fn set_token(&self, token: String) {
        self.inner.set_token(token).await
    }

    async fn remove_token(&self) {
        self.removals.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_token().await
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}
