// src/services/derived_metrics.rs
// Funções puras: nada de I/O, nunca entram em pânico com entrada numérica ruim.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{
    derived::{
        Breakdown, BreakdownItem, Breakdowns, ChartPoint, DerivedReports, LeaderboardEntry,
        MetricLabel, QuestLeaderboard,
    },
    reports::{AggregateReadModel, QuestParticipant, QuestReport},
};

/// Paleta fixa dos gráficos; a cor depende só da posição do item.
pub const PALETTE: [&str; 10] = [
    "#4F46E5", "#10B981", "#F59E0B", "#EF4444", "#3B82F6",
    "#8B5CF6", "#EC4899", "#14B8A6", "#F97316", "#64748B",
];

pub fn color_token(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

// Negativo, NaN e infinito contam como zero
fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 { amount } else { 0.0 }
}

// Soma que satura em f64::MAX em vez de virar infinito
fn saturating_add(a: f64, b: f64) -> f64 {
    (a + b).min(f64::MAX)
}

fn decimal_to_f64(value: &Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Agrupa por chave (ordem da primeira ocorrência) e calcula o percentual de cada grupo.
pub fn breakdown<I, K>(entries: I) -> Breakdown
where
    I: IntoIterator<Item = (K, f64)>,
    K: Into<String>,
{
    let mut groups: Vec<(String, f64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (key, amount) in entries {
        let key = key.into();
        let amount = sanitize(amount);
        match positions.get(&key) {
            Some(&index) => groups[index].1 = saturating_add(groups[index].1, amount),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, amount));
            }
        }
    }

    let amounts: Vec<f64> = groups.iter().map(|(_, amount)| *amount).collect();
    let total = amounts.iter().copied().fold(0.0, saturating_add);
    let percentages = allocate_percentages(&amounts);

    let items = groups
        .into_iter()
        .zip(percentages)
        .enumerate()
        .map(|(index, ((label, amount), percentage))| BreakdownItem {
            label,
            amount,
            percentage_of_total: percentage,
            color_token: color_token(index).to_string(),
        })
        .collect();

    Breakdown { total, items }
}

/// `round(amount / total * 100)` por item. Se o arredondamento escapar de
/// [99, 101], redistribui pelo maior resto para somar exatamente 100.
pub fn allocate_percentages(amounts: &[f64]) -> Vec<u32> {
    // Normaliza pelo maior valor para a soma nunca estourar para infinito
    let max = amounts.iter().copied().map(sanitize).fold(0.0, f64::max);
    if max <= 0.0 {
        return vec![0; amounts.len()];
    }
    let normalized: Vec<f64> = amounts.iter().map(|a| sanitize(*a) / max).collect();
    let total: f64 = normalized.iter().sum();

    let exact: Vec<f64> = normalized.iter().map(|a| a / total * 100.0).collect();
    let rounded: Vec<u32> = exact.iter().map(|p| p.round() as u32).collect();
    let sum: u32 = rounded.iter().sum();
    if (99..=101).contains(&sum) {
        return rounded;
    }

    let mut shares: Vec<u32> = exact.iter().map(|p| p.floor() as u32).collect();
    let remaining = 100u32.saturating_sub(shares.iter().sum());

    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| {
        let rest_a = exact[a] - exact[a].floor();
        let rest_b = exact[b] - exact[b].floor();
        rest_b.total_cmp(&rest_a).then(a.cmp(&b))
    });
    for &index in order.iter().take(remaining as usize) {
        shares[index] += 1;
    }
    shares
}

/// Rótulo compacto para eixos e cards: 1K, 12M, 1.5B.
pub fn compact_label(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }

    // round() desempata para longe do zero; o `{:.N}` sozinho desempata para o par
    if value >= 1e9 {
        format!("{:.1}B", (value / 1e8).round() / 10.0)
    } else if value >= 1e6 {
        format!("{:.0}M", (value / 1e6).round())
    } else if value >= 1e3 {
        format!("{:.0}K", (value / 1e3).round())
    } else {
        value.to_string()
    }
}

/// Pontos de um participante: recompensa cheia se concluiu, senão proporcional ao progresso.
pub fn quest_points(reward: u32, target: u32, participant: &QuestParticipant) -> u32 {
    if participant.completed {
        return reward;
    }
    if target == 0 {
        return 0;
    }
    let progress = participant.progress.min(target);
    // progress <= target, então o resultado cabe em u32
    (u64::from(reward) * u64::from(progress) / u64::from(target)) as u32
}

/// Ordena por pontos (desc) mantendo a ordem original nos empates; rank = posição + 1.
pub fn leaderboard(reward: u32, target: u32, participants: &[QuestParticipant]) -> Vec<LeaderboardEntry> {
    let mut scored: Vec<(u32, &QuestParticipant)> = participants
        .iter()
        .map(|participant| (quest_points(reward, target, participant), participant))
        .collect();

    // sort_by é estável
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (points, participant))| LeaderboardEntry {
            subject_id: participant.subject_id,
            name: participant.name.clone(),
            points,
            rank: index as u32 + 1,
            completed: participant.completed,
        })
        .collect()
}

pub fn quest_leaderboard(quest: &QuestReport) -> QuestLeaderboard {
    QuestLeaderboard {
        quest_id: quest.quest_id,
        title: quest.title.clone(),
        entries: leaderboard(quest.reward_points, quest.target, &quest.participants),
    }
}

fn metric(key: &str, value: f64) -> MetricLabel {
    MetricLabel {
        key: key.to_string(),
        value,
        value_label: compact_label(value),
    }
}

/// Monta todas as estruturas derivadas de um agregado aceito.
/// Fontes em fallback entram com o valor vazio, então nada aqui precisa de guarda.
pub fn derive(aggregate: &AggregateReadModel) -> DerivedReports {
    let goods = aggregate.goods.value();
    let moneyflow = aggregate.moneyflow.value();
    let profit_loss = aggregate.profit_loss.value();
    let general_orders = aggregate.general_orders.value();
    let metrics = aggregate.metrics.value();

    let breakdowns = Breakdowns {
        categories: breakdown(
            goods.items.iter().map(|item| (item.category.clone(), decimal_to_f64(&item.revenue))),
        ),
        payment_types: breakdown(
            moneyflow
                .payment_types
                .iter()
                .map(|entry| (entry.payment_type.clone(), decimal_to_f64(&entry.amount))),
        ),
        expenses: breakdown(
            profit_loss
                .expenses
                .iter()
                .map(|line| (line.name.clone(), decimal_to_f64(&line.amount))),
        ),
        order_types: breakdown(
            general_orders
                .by_type
                .iter()
                .map(|entry| (entry.order_type.clone(), decimal_to_f64(&entry.amount))),
        ),
    };

    let sales_chart = aggregate
        .sales_dynamics
        .value()
        .points
        .iter()
        .map(|point| {
            let value = decimal_to_f64(&point.revenue);
            ChartPoint {
                label: point.date.clone(),
                value,
                value_label: compact_label(value),
            }
        })
        .collect();

    let headline = vec![
        metric("revenue", decimal_to_f64(&metrics.revenue)),
        metric("ordersCount", metrics.orders_count as f64),
        metric("averageCheck", decimal_to_f64(&metrics.average_check)),
        metric("guests", metrics.guests as f64),
        metric("netProfit", decimal_to_f64(&profit_loss.net_profit)),
    ];

    let leaderboards = aggregate
        .analytics
        .value()
        .quests
        .iter()
        .map(quest_leaderboard)
        .collect();

    DerivedReports {
        breakdowns,
        sales_chart,
        headline,
        leaderboards,
    }
}
