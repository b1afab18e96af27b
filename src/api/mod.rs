pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::NetworkAnalyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: NetworkAnalyzer,
}

pub fn router(analyzer: NetworkAnalyzer) -> Router {
    let state = Arc::new(AppState { analyzer });

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/report", post(handlers::report))
        .route("/api/v1/profiles", post(handlers::profiles))
        .route("/api/v1/coordination", post(handlers::coordination))
        .route("/api/v1/metrics", post(handlers::metrics))
        .route("/api/v1/clusters", post(handlers::clusters))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(analyzer: NetworkAnalyzer, host: &str, port: u16) -> eyre::Result<()> {
    let app = router(analyzer);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
