use chrono::NaiveDate;

use crate::config::AnalysisConfig;
use crate::report::{generate_report, InsiderNetworkReport};
use crate::transaction::Transaction;

/// Activities at or above this confidence are logged as warnings.
const HIGH_CONFIDENCE: f64 = 50.0;

/// Runs insider network analysis with a fixed configuration. Holds no state
/// between runs, so one analyzer can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct NetworkAnalyzer {
    config: AnalysisConfig,
}

impl NetworkAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a consolidated transaction list and return the full report.
    pub fn analyze(
        &self,
        transactions: &[Transaction],
        tickers: &[String],
        as_of: NaiveDate,
    ) -> InsiderNetworkReport {
        let report = generate_report(transactions, tickers, as_of, &self.config);

        for activity in &report.coordinated_activities {
            if activity.confidence >= HIGH_CONFIDENCE {
                tracing::warn!(
                    transaction_type = activity.transaction_type.as_str(),
                    confidence = activity.confidence,
                    insiders = ?activity.insiders,
                    start = %activity.start_date,
                    "COORDINATED ACTIVITY DETECTED"
                );
            }
        }

        tracing::info!(
            transactions = report.total_transactions,
            insiders = report.total_insiders,
            connections = report.total_connections,
            activities = report.coordinated_activity_count,
            clusters = report.cluster_count,
            red_flags = report.red_flags.len(),
            "Insider network analysis complete"
        );

        report
    }
}
