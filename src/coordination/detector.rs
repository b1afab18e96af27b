use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};

use crate::config::AnalysisConfig;
use crate::transaction::{Transaction, TransactionType};

use super::types::{ActivityKind, CoordinatedActivity};

const INSIDER_SATURATION: f64 = 10.0;
const VALUE_SATURATION: f64 = 10_000_000.0;
const TRADE_SATURATION: f64 = 10.0;

/// Scan every `[d, d + window_days]` window, where `d` is a date with at least
/// one transaction, and flag same-type groups that clear the count and value
/// thresholds.
///
/// Overlapping windows are reported independently, so one burst of trading can
/// surface several times with different start dates. Transactions without a
/// date are ignored here.
pub fn detect_coordinated_activity(
    transactions: &[Transaction],
    config: &AnalysisConfig,
) -> Vec<CoordinatedActivity> {
    let mut dated: Vec<(NaiveDate, &Transaction)> = transactions
        .iter()
        .filter_map(|t| t.date.map(|d| (d, t)))
        .collect();
    if dated.is_empty() {
        return Vec::new();
    }
    dated.sort_by_key(|(d, _)| *d);

    let start_dates: BTreeSet<NaiveDate> = dated.iter().map(|(d, _)| *d).collect();
    let mut activities = Vec::new();

    for start in start_dates {
        let end = Duration::try_days(config.window_days)
            .and_then(|w| start.checked_add_signed(w))
            .unwrap_or(NaiveDate::MAX);
        let lo = dated.partition_point(|(d, _)| *d < start);
        let hi = dated.partition_point(|(d, _)| *d <= end);
        let window: Vec<&Transaction> = dated[lo..hi].iter().map(|(_, t)| *t).collect();

        if window.len() < config.min_coordinated_trades {
            continue;
        }

        let mut by_type: BTreeMap<TransactionType, Vec<&Transaction>> = BTreeMap::new();
        for &txn in &window {
            by_type.entry(txn.transaction_type).or_default().push(txn);
        }

        let mut emitted = false;
        for (kind, group) in &by_type {
            if group.len() < config.min_coordinated_trades {
                continue;
            }
            if let Some(activity) = summarize(group, (*kind).into(), start, end, config) {
                activities.push(activity);
                emitted = true;
            }
        }

        if config.detect_mixed_windows && !emitted && by_type.len() > 1 {
            if let Some(activity) = summarize(&window, ActivityKind::Mixed, start, end, config) {
                activities.push(activity);
            }
        }
    }

    activities.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.start_date.cmp(&b.start_date))
    });

    tracing::debug!(
        activities = activities.len(),
        window_days = config.window_days,
        "Coordinated activity scan complete"
    );

    activities
}

/// Build an activity from a group, or `None` when it falls under the value floor.
fn summarize(
    group: &[&Transaction],
    kind: ActivityKind,
    start: NaiveDate,
    end: NaiveDate,
    config: &AnalysisConfig,
) -> Option<CoordinatedActivity> {
    let total_value: f64 = group.iter().map(|t| t.value).sum();
    if total_value < config.min_coordination_value {
        return None;
    }

    let insiders: BTreeSet<&str> = group.iter().map(|t| t.insider_key()).collect();
    let companies: BTreeSet<String> = group.iter().map(|t| t.company_key()).collect();

    Some(CoordinatedActivity {
        insiders: insiders.iter().map(|s| s.to_string()).collect(),
        companies: companies.into_iter().collect(),
        transaction_type: kind,
        window_days: config.window_days,
        transaction_count: group.len(),
        total_value,
        start_date: start,
        end_date: end,
        confidence: confidence(insiders.len(), total_value, group.len()),
    })
}

/// Insider breadth, value and trade count weighted 40/40/20, capped at 100 and
/// rounded to one decimal.
pub fn confidence(distinct_insiders: usize, total_value: f64, txn_count: usize) -> f64 {
    let insider_term = 40.0 * (distinct_insiders as f64 / INSIDER_SATURATION);
    let value_term = 40.0 * (total_value / VALUE_SATURATION).min(1.0);
    let count_term = 20.0 * (txn_count as f64 / TRADE_SATURATION).min(1.0);
    let score = (insider_term + value_term + count_term).min(100.0);
    (score * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::builder::tests::make_txn;

    fn sell(insider: &str, date: &str, value: f64) -> Transaction {
        make_txn(insider, "Company X", "Officer", date, TransactionType::Sell, value)
    }

    #[test]
    fn test_three_sellers_one_activity() {
        let txns = vec![
            sell("A", "2024-03-01", 500_000.0),
            sell("B", "2024-03-02", 500_000.0),
            sell("C", "2024-03-03", 500_000.0),
        ];
        let activities = detect_coordinated_activity(&txns, &AnalysisConfig::default());

        assert_eq!(activities.len(), 1);
        let a = &activities[0];
        assert_eq!(a.transaction_type, ActivityKind::Sell);
        assert_eq!(a.transaction_count, 3);
        assert_eq!(a.total_value, 1_500_000.0);
        assert_eq!(a.insiders, vec!["A", "B", "C"]);
        assert_eq!(a.companies, vec!["COMPANY X"]);
        assert_eq!(a.confidence, 24.0);
        assert_eq!(a.start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(a.end_date, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }

    #[test]
    fn test_threshold_boundary_included() {
        let txns = vec![
            sell("A", "2024-03-01", 500_000.0),
            sell("B", "2024-03-01", 250_000.0),
            sell("C", "2024-03-01", 250_000.0),
        ];
        let activities = detect_coordinated_activity(&txns, &AnalysisConfig::default());
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].total_value, 1_000_000.0);
    }

    #[test]
    fn test_one_cent_short_excluded() {
        let txns = vec![
            sell("A", "2024-03-01", 500_000.0),
            sell("B", "2024-03-01", 250_000.0),
            sell("C", "2024-03-01", 249_999.99),
        ];
        assert!(detect_coordinated_activity(&txns, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_one_trade_short_excluded() {
        let txns = vec![
            sell("A", "2024-03-01", 5_000_000.0),
            sell("B", "2024-03-01", 5_000_000.0),
        ];
        assert!(detect_coordinated_activity(&txns, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_window_edge_is_inclusive() {
        let txns = vec![
            sell("A", "2024-03-01", 400_000.0),
            sell("B", "2024-03-03", 400_000.0),
            sell("C", "2024-03-06", 400_000.0),
            sell("D", "2024-03-07", 400_000.0),
        ];
        let activities = detect_coordinated_activity(&txns, &AnalysisConfig::default());
        // 03-01 window holds A, B, C; 03-03 window holds B, C, D.
        assert_eq!(activities.len(), 2);
        assert!(activities.iter().all(|a| a.transaction_count == 3));
    }

    #[test]
    fn test_mixed_types_split() {
        let txns = vec![
            sell("A", "2024-03-01", 900_000.0),
            sell("B", "2024-03-01", 900_000.0),
            make_txn("C", "Company X", "CEO", "2024-03-02", TransactionType::Buy, 900_000.0),
        ];
        assert!(detect_coordinated_activity(&txns, &AnalysisConfig::default()).is_empty());

        let config = AnalysisConfig {
            detect_mixed_windows: true,
            ..AnalysisConfig::default()
        };
        let activities = detect_coordinated_activity(&txns, &config);
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].transaction_type, ActivityKind::Mixed);
        assert_eq!(activities[0].transaction_count, 3);
    }

    #[test]
    fn test_undated_transactions_ignored() {
        let mut txns = vec![
            sell("A", "2024-03-01", 500_000.0),
            sell("B", "2024-03-01", 500_000.0),
            sell("C", "2024-03-01", 500_000.0),
        ];
        txns[2].date = None;
        assert!(detect_coordinated_activity(&txns, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_sorted_by_confidence() {
        let mut txns: Vec<Transaction> = (0..10)
            .map(|i| sell(&format!("Big{}", i), "2024-06-01", 2_000_000.0))
            .collect();
        txns.extend(vec![
            sell("A", "2024-01-01", 400_000.0),
            sell("B", "2024-01-01", 400_000.0),
            sell("C", "2024-01-01", 400_000.0),
        ]);
        let activities = detect_coordinated_activity(&txns, &AnalysisConfig::default());
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].confidence, 100.0);
        assert!(activities[0].confidence >= activities[1].confidence);
    }

    #[test]
    fn test_oversized_window_clamps_to_max_date() {
        let txns = vec![
            sell("A", "2024-03-01", 500_000.0),
            sell("B", "2024-03-02", 500_000.0),
            sell("C", "2030-03-03", 500_000.0),
        ];
        let config = AnalysisConfig {
            window_days: 200_000_000,
            ..AnalysisConfig::default()
        };
        let activities = detect_coordinated_activity(&txns, &config);
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].transaction_count, 3);
        assert_eq!(activities[0].end_date, NaiveDate::MAX);
    }

    #[test]
    fn test_empty_input() {
        assert!(detect_coordinated_activity(&[], &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_confidence_formula() {
        assert_eq!(confidence(3, 1_500_000.0, 3), 24.0);
        assert_eq!(confidence(10, 50_000_000.0, 40), 100.0);
        assert_eq!(confidence(0, 0.0, 0), 0.0);
    }
}
