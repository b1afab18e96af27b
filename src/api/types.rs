use serde::{Deserialize, Serialize};

use crate::coordination::CoordinatedActivity;
use crate::graph::{InsiderCluster, NetworkMetrics};
use crate::profile::InsiderProfile;
use crate::transaction::Transaction;

// ============================================================
// Request bodies
// ============================================================

#[derive(Debug, Deserialize)]
pub struct TransactionsRequest {
    pub transactions: Vec<Transaction>,
}

impl TransactionsRequest {
    pub fn normalized(self) -> Vec<Transaction> {
        self.transactions
            .into_iter()
            .map(Transaction::normalized)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub tickers: Vec<String>,
    pub transactions: Vec<Transaction>,
    /// `YYYY-MM-DD`; defaults to today (UTC).
    pub as_of: Option<String>,
}

// ============================================================
// Response types
// ============================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ProfilesResponse {
    pub count: usize,
    pub profiles: Vec<InsiderProfile>,
}

#[derive(Debug, Serialize)]
pub struct CoordinationResponse {
    pub count: usize,
    pub activities: Vec<CoordinatedActivity>,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub count: usize,
    pub metrics: Vec<NetworkMetrics>,
}

#[derive(Debug, Serialize)]
pub struct ClustersResponse {
    pub count: usize,
    pub clusters: Vec<InsiderCluster>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
