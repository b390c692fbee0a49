// src/models/derived.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// 1. Gráficos de pizza (categorias, formas de pagamento, despesas)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownItem {
    #[schema(example = "Bebidas")]
    pub label: String,
    pub amount: f64,
    #[schema(example = 42)]
    pub percentage_of_total: u32,
    #[schema(example = "#4F46E5")]
    pub color_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub total: f64,
    pub items: Vec<BreakdownItem>,
}

impl Breakdown {
    pub fn percentage_sum(&self) -> u32 {
        self.items.iter().map(|item| item.percentage_of_total).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Breakdowns {
    pub categories: Breakdown,
    pub payment_types: Breakdown,
    pub expenses: Breakdown,
    pub order_types: Breakdown,
}

// 2. Séries temporais com rótulo compacto (1K, 2M, 1.5B)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[schema(example = "12K")]
    pub value_label: String,
}

// 3. Cards do topo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricLabel {
    #[schema(example = "revenue")]
    pub key: String,
    pub value: f64,
    pub value_label: String,
}

// 4. Ranking das quests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub subject_id: Uuid,
    pub name: String,
    pub points: u32,
    pub rank: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestLeaderboard {
    pub quest_id: Uuid,
    pub title: String,
    pub entries: Vec<LeaderboardEntry>,
}

/// Tudo o que as telas desenham a partir de um agregado aceito.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DerivedReports {
    pub breakdowns: Breakdowns,
    pub sales_chart: Vec<ChartPoint>,
    pub headline: Vec<MetricLabel>,
    pub leaderboards: Vec<QuestLeaderboard>,
}
