use chrono::NaiveDate;
use serde::Serialize;

use crate::transaction::TransactionType;

/// Direction shared by the transactions of a coordinated window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityKind {
    Buy,
    Sell,
    Grant,
    Exercise,
    Mixed,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Grant => "GRANT",
            Self::Exercise => "EXERCISE",
            Self::Mixed => "MIXED",
        }
    }
}

impl From<TransactionType> for ActivityKind {
    fn from(t: TransactionType) -> Self {
        match t {
            TransactionType::Buy => Self::Buy,
            TransactionType::Sell => Self::Sell,
            TransactionType::Grant => Self::Grant,
            TransactionType::Exercise => Self::Exercise,
        }
    }
}

/// A window of synchronized insider transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinatedActivity {
    pub insiders: Vec<String>,
    pub companies: Vec<String>,
    pub transaction_type: ActivityKind,
    pub window_days: i64,
    pub transaction_count: usize,
    pub total_value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 0–100
    pub confidence: f64,
}
