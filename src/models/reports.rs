// src/models/reports.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// --- Fontes de dados ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceName {
    Metrics,
    Orders,
    Employees,
    Moneyflow,
    ProfitLoss,
    Analytics,
    Goods,
    GeneralOrders,
    SalesDynamics,
    Organizations,
}

impl SourceName {
    pub const ALL: [SourceName; 10] = [
        SourceName::Metrics,
        SourceName::Orders,
        SourceName::Employees,
        SourceName::Moneyflow,
        SourceName::ProfitLoss,
        SourceName::Analytics,
        SourceName::Goods,
        SourceName::GeneralOrders,
        SourceName::SalesDynamics,
        SourceName::Organizations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Metrics => "metrics",
            SourceName::Orders => "orders",
            SourceName::Employees => "employees",
            SourceName::Moneyflow => "moneyflow",
            SourceName::ProfitLoss => "profit-loss",
            SourceName::Analytics => "analytics",
            SourceName::Goods => "goods",
            SourceName::GeneralOrders => "general-orders",
            SourceName::SalesDynamics => "sales-dynamics",
            SourceName::Organizations => "organizations",
        }
    }

    /// A lista de organizações não depende do filtro.
    pub fn uses_filter(&self) -> bool {
        !matches!(self, SourceName::Organizations)
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado de uma fonte: o valor real ou o valor vazio que o substituiu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum SourceResult<T> {
    Ok(T),
    Fallback(T),
}

impl<T> SourceResult<T> {
    pub fn value(&self) -> &T {
        match self {
            SourceResult::Ok(value) | SourceResult::Fallback(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SourceResult::Fallback(_))
    }
}

impl<T: Default> Default for SourceResult<T> {
    fn default() -> Self {
        SourceResult::Fallback(T::default())
    }
}

// --- Payloads do backend ---
// Todos com `default`: campo ausente vira lista vazia / zero, nunca null.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsReport {
    pub revenue: Decimal,
    pub orders_count: u64,
    pub average_check: Decimal,
    pub guests: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderSummary {
    pub id: Uuid,
    pub number: String,
    pub status: String,
    pub payment_type: String,
    pub total: Decimal,
    pub opened_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrdersReport {
    pub orders: Vec<OrderSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub shifts: u32,
    pub hours_worked: Decimal,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeesReport {
    pub employees: Vec<EmployeeSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentTypeAmount {
    pub payment_type: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoneyflowReport {
    pub income: Decimal,
    pub expense: Decimal,
    pub payment_types: Vec<PaymentTypeAmount>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseLine {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfitLossReport {
    pub revenue: Decimal,
    pub cost_of_goods: Decimal,
    pub gross_profit: Decimal,
    pub expenses: Vec<ExpenseLine>,
    pub net_profit: Decimal,
}

// Gamificação: quests dos funcionários
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestParticipant {
    pub subject_id: Uuid,
    pub name: String,
    pub progress: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestReport {
    pub quest_id: Uuid,
    pub title: String,
    pub reward_points: u32,
    pub target: u32,
    pub participants: Vec<QuestParticipant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsReport {
    pub quests: Vec<QuestReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoodsItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoodsReport {
    pub items: Vec<GoodsItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderTypeTotal {
    pub order_type: String,
    pub count: u64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralOrdersReport {
    pub total_count: u64,
    pub by_type: Vec<OrderTypeTotal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesPoint {
    pub date: String,
    pub revenue: Decimal,
    pub orders: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesDynamicsReport {
    pub points: Vec<SalesPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationsReport {
    pub organizations: Vec<Organization>,
}

// --- Agregado ---

/// Resultado completo de uma coleta. Criado inteiro a cada execução e nunca alterado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AggregateReadModel {
    pub metrics: SourceResult<MetricsReport>,
    pub orders: SourceResult<OrdersReport>,
    pub employees: SourceResult<EmployeesReport>,
    pub moneyflow: SourceResult<MoneyflowReport>,
    pub profit_loss: SourceResult<ProfitLossReport>,
    pub analytics: SourceResult<AnalyticsReport>,
    pub goods: SourceResult<GoodsReport>,
    pub general_orders: SourceResult<GeneralOrdersReport>,
    pub sales_dynamics: SourceResult<SalesDynamicsReport>,
    pub organizations: SourceResult<OrganizationsReport>,
}

impl AggregateReadModel {
    pub fn is_fallback(&self, source: SourceName) -> bool {
        match source {
            SourceName::Metrics => self.metrics.is_fallback(),
            SourceName::Orders => self.orders.is_fallback(),
            SourceName::Employees => self.employees.is_fallback(),
            SourceName::Moneyflow => self.moneyflow.is_fallback(),
            SourceName::ProfitLoss => self.profit_loss.is_fallback(),
            SourceName::Analytics => self.analytics.is_fallback(),
            SourceName::Goods => self.goods.is_fallback(),
            SourceName::GeneralOrders => self.general_orders.is_fallback(),
            SourceName::SalesDynamics => self.sales_dynamics.is_fallback(),
            SourceName::Organizations => self.organizations.is_fallback(),
        }
    }

    pub fn fallback_sources(&self) -> Vec<SourceName> {
        SourceName::ALL
            .into_iter()
            .filter(|source| self.is_fallback(*source))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn source_result_is_tagged_by_status() {
        let ok: SourceResult<MetricsReport> = SourceResult::Ok(MetricsReport {
            guests: 12,
            ..Default::default()
        });
        let value = serde_json::to_value(&ok).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["value"]["guests"], 12);

        let fallback: SourceResult<OrdersReport> = SourceResult::default();
        assert_eq!(
            serde_json::to_value(&fallback).unwrap(),
            json!({ "status": "fallback", "value": { "orders": [] } })
        );
    }

    #[test]
    fn aggregate_uses_kebab_case_source_keys() {
        let value = serde_json::to_value(AggregateReadModel::default()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();

        for source in SourceName::ALL {
            assert!(keys.contains(&source.as_str()), "faltando {source}");
        }
    }

    #[test]
    fn missing_payload_fields_become_empty_values() {
        let report: MoneyflowReport = serde_json::from_value(json!({ "income": 10.5 })).unwrap();

        assert!(report.payment_types.is_empty());
        assert_eq!(report.expense, Decimal::ZERO);
    }
}
