use chrono::NaiveDate;
use serde::Serialize;

use crate::coordination::CoordinatedActivity;
use crate::graph::{InsiderCluster, NetworkMetrics};
use crate::profile::InsiderProfile;

/// Result of one insider network analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsiderNetworkReport {
    pub analysis_date: NaiveDate,
    pub tickers: Vec<String>,
    pub total_transactions: usize,
    pub total_insiders: usize,
    pub total_connections: usize,
    pub coordinated_activity_count: usize,
    pub cluster_count: usize,
    pub total_buy_value: f64,
    pub total_sell_value: f64,
    pub buy_sell_ratio: f64,
    pub profiles: Vec<InsiderProfile>,
    pub coordinated_activities: Vec<CoordinatedActivity>,
    pub network_metrics: Vec<NetworkMetrics>,
    pub clusters: Vec<InsiderCluster>,
    pub summary: String,
    pub red_flags: Vec<String>,
}
