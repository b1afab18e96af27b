use chrono::NaiveDate;

use crate::config::AnalysisConfig;
use crate::coordination::{detect_coordinated_activity, CoordinatedActivity};
use crate::graph::{compute_network_metrics, detect_clusters, InsiderCluster, NetworkMetrics};
use crate::profile::{build_profiles, count_connections, rank_profiles};
use crate::transaction::{Transaction, TransactionType};

use super::types::InsiderNetworkReport;

/// Run every analysis stage over `transactions` and assemble the report.
/// Empty input yields a zero-valued report rather than an error.
pub fn generate_report(
    transactions: &[Transaction],
    tickers: &[String],
    analysis_date: NaiveDate,
    config: &AnalysisConfig,
) -> InsiderNetworkReport {
    if transactions.is_empty() {
        return empty_report(tickers, analysis_date);
    }

    let profiles = build_profiles(transactions);
    let activities = detect_coordinated_activity(transactions, config);
    let metrics = compute_network_metrics(&profiles);
    let clusters = detect_clusters(&profiles);

    let total_buy_value = total_value(transactions, TransactionType::Buy);
    let total_sell_value = total_value(transactions, TransactionType::Sell);
    let ratio = buy_sell_ratio(total_buy_value, total_sell_value);
    let total_connections = count_connections(&profiles);

    let red_flags = red_flags(&activities, &clusters, total_sell_value, ratio, config);
    let summary = summary(
        transactions.len(),
        profiles.len(),
        total_connections,
        tickers,
        ratio,
        &activities,
        &metrics,
        &clusters,
    );

    tracing::debug!(
        insiders = profiles.len(),
        edges = total_connections,
        activities = activities.len(),
        clusters = clusters.len(),
        red_flags = red_flags.len(),
        "Assembled insider network report"
    );

    InsiderNetworkReport {
        analysis_date,
        tickers: tickers.to_vec(),
        total_transactions: transactions.len(),
        total_insiders: profiles.len(),
        total_connections,
        coordinated_activity_count: activities.len(),
        cluster_count: clusters.len(),
        total_buy_value,
        total_sell_value,
        buy_sell_ratio: ratio,
        profiles: rank_profiles(&profiles),
        coordinated_activities: activities,
        network_metrics: metrics,
        clusters,
        summary,
        red_flags,
    }
}

fn empty_report(tickers: &[String], analysis_date: NaiveDate) -> InsiderNetworkReport {
    InsiderNetworkReport {
        analysis_date,
        tickers: tickers.to_vec(),
        total_transactions: 0,
        total_insiders: 0,
        total_connections: 0,
        coordinated_activity_count: 0,
        cluster_count: 0,
        total_buy_value: 0.0,
        total_sell_value: 0.0,
        buy_sell_ratio: 0.0,
        profiles: Vec::new(),
        coordinated_activities: Vec::new(),
        network_metrics: Vec::new(),
        clusters: Vec::new(),
        summary: format!(
            "No insider transaction data available for {}.",
            ticker_list(tickers)
        ),
        red_flags: Vec::new(),
    }
}

fn total_value(transactions: &[Transaction], kind: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|t| t.transaction_type == kind)
        .map(|t| t.value)
        .sum()
}

/// Σbuy / Σsell, or 0 when nothing was sold.
pub fn buy_sell_ratio(total_buy: f64, total_sell: f64) -> f64 {
    if total_sell > 0.0 {
        total_buy / total_sell
    } else {
        0.0
    }
}

/// Human-readable warnings for the report.
///
/// Heavy selling is only flagged when something was actually sold: with no
/// sales the ratio is 0 by definition, which would otherwise mark grant-only
/// or empty datasets as heavy selling.
pub fn red_flags(
    activities: &[CoordinatedActivity],
    clusters: &[InsiderCluster],
    total_sell_value: f64,
    ratio: f64,
    config: &AnalysisConfig,
) -> Vec<String> {
    let mut flags = Vec::new();

    if !activities.is_empty() {
        flags.push(format!(
            "{} coordinated trading pattern(s) detected",
            activities.len()
        ));
    }

    if total_sell_value > 0.0 && ratio < config.heavy_selling_ratio {
        flags.push(format!("Heavy insider selling: buy/sell ratio {:.2}", ratio));
    } else if ratio > config.heavy_buying_ratio {
        flags.push(format!("Heavy insider buying: buy/sell ratio {:.2}", ratio));
    }

    let large = clusters
        .iter()
        .filter(|c| c.size >= config.large_cluster_size)
        .count();
    if large > 0 {
        flags.push(format!(
            "{} large insider network(s) with {}+ members",
            large, config.large_cluster_size
        ));
    }

    flags
}

#[allow(clippy::too_many_arguments)]
fn summary(
    total_transactions: usize,
    total_insiders: usize,
    total_connections: usize,
    tickers: &[String],
    ratio: f64,
    activities: &[CoordinatedActivity],
    metrics: &[NetworkMetrics],
    clusters: &[InsiderCluster],
) -> String {
    let mut text = format!(
        "Analyzed {} transactions by {} insiders across {}. \
         Found {} relationships, {} clusters and {} coordinated trading patterns. \
         Buy/sell ratio: {:.2}.",
        total_transactions,
        total_insiders,
        ticker_list(tickers),
        total_connections,
        clusters.len(),
        activities.len(),
        ratio
    );

    if let Some(top) = metrics.first().filter(|m| m.influence_score > 0.0) {
        text.push_str(&format!(
            " Most influential insider: {} (score {:.1}).",
            top.name, top.influence_score
        ));
    }

    if let Some(largest) = clusters.first() {
        text.push_str(&format!(
            " Largest cluster: {} insiders ({}).",
            largest.size,
            largest.classification.as_str()
        ));
    }

    if let Some(strongest) = activities.first() {
        text.push_str(&format!(
            " Strongest coordination: {} by {} insiders between {} and {} (confidence {:.1}).",
            strongest.transaction_type.as_str(),
            strongest.insiders.len(),
            strongest.start_date,
            strongest.end_date,
            strongest.confidence
        ));
    }

    text
}

fn ticker_list(tickers: &[String]) -> String {
    if tickers.is_empty() {
        "all tickers".to_string()
    } else {
        tickers.join(", ")
    }
}
