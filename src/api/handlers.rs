use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::coordination::detect_coordinated_activity;
use crate::graph::{compute_network_metrics, detect_clusters};
use crate::profile::{build_profiles, rank_profiles};
use crate::report::InsiderNetworkReport;
use crate::transaction::types::parse_date;

use super::types::*;
use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn api_error(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: msg.into(),
        }),
    )
}

fn parse_as_of(raw: Option<&str>) -> Result<NaiveDate, (StatusCode, Json<ErrorResponse>)> {
    match raw {
        None => Ok(Utc::now().date_naive()),
        Some(s) => parse_date(s).ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid as_of date '{}', expected YYYY-MM-DD", s),
            )
        }),
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================
// Analysis
// ============================================================

pub async fn report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportRequest>,
) -> ApiResult<InsiderNetworkReport> {
    let as_of = parse_as_of(req.as_of.as_deref())?;
    let tickers: Vec<String> = req.tickers.iter().map(|t| t.trim().to_uppercase()).collect();
    let transactions = TransactionsRequest {
        transactions: req.transactions,
    }
    .normalized();
    Ok(Json(state.analyzer.analyze(&transactions, &tickers, as_of)))
}

pub async fn profiles(Json(req): Json<TransactionsRequest>) -> ApiResult<ProfilesResponse> {
    let profiles = rank_profiles(&build_profiles(&req.normalized()));
    Ok(Json(ProfilesResponse {
        count: profiles.len(),
        profiles,
    }))
}

pub async fn coordination(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransactionsRequest>,
) -> ApiResult<CoordinationResponse> {
    let activities = detect_coordinated_activity(&req.normalized(), state.analyzer.config());
    Ok(Json(CoordinationResponse {
        count: activities.len(),
        activities,
    }))
}

pub async fn metrics(Json(req): Json<TransactionsRequest>) -> ApiResult<MetricsResponse> {
    let metrics = compute_network_metrics(&build_profiles(&req.normalized()));
    Ok(Json(MetricsResponse {
        count: metrics.len(),
        metrics,
    }))
}

pub async fn clusters(Json(req): Json<TransactionsRequest>) -> ApiResult<ClustersResponse> {
    let clusters = detect_clusters(&build_profiles(&req.normalized()));
    Ok(Json(ClustersResponse {
        count: clusters.len(),
        clusters,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::NetworkAnalyzer;
    use crate::profile::builder::tests::make_txn;
    use crate::transaction::{Transaction, TransactionType};

    fn state() -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            analyzer: NetworkAnalyzer::default(),
        }))
    }

    fn sample() -> Vec<Transaction> {
        vec![
            make_txn("A", "Acme", "CEO", "2024-05-01", TransactionType::Sell, 500_000.0),
            make_txn("B", "Acme", "CFO", "2024-05-01", TransactionType::Sell, 500_000.0),
            make_txn("C", "Acme", "COO", "2024-05-02", TransactionType::Sell, 500_000.0),
        ]
    }

    #[tokio::test]
    async fn test_report_handler() {
        let req = ReportRequest {
            tickers: vec![" acme ".to_string()],
            transactions: sample(),
            as_of: Some("2024-06-01".to_string()),
        };
        let Json(report) = report(state(), Json(req)).await.unwrap();
        assert_eq!(report.tickers, vec!["ACME"]);
        assert_eq!(report.analysis_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(report.coordinated_activity_count, 1);
    }

    #[tokio::test]
    async fn test_report_rejects_bad_date() {
        let req = ReportRequest {
            tickers: vec![],
            transactions: vec![],
            as_of: Some("yesterday".to_string()),
        };
        let (status, Json(body)) = report(state(), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("yesterday"));
    }

    #[tokio::test]
    async fn test_stage_handlers() {
        let Json(p) = profiles(Json(TransactionsRequest { transactions: sample() }))
            .await
            .unwrap();
        assert_eq!(p.count, 3);

        let Json(c) = coordination(state(), Json(TransactionsRequest { transactions: sample() }))
            .await
            .unwrap();
        assert_eq!(c.count, 1);

        let Json(m) = metrics(Json(TransactionsRequest { transactions: sample() }))
            .await
            .unwrap();
        assert_eq!(m.count, 3);

        let Json(cl) = clusters(Json(TransactionsRequest { transactions: sample() }))
            .await
            .unwrap();
        assert_eq!(cl.count, 1);
        assert_eq!(cl.clusters[0].size, 3);
    }

    #[tokio::test]
    async fn test_health() {
        let Json(h) = health().await;
        assert_eq!(h.status, "ok");
    }
}
