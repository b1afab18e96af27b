pub mod adjacency;
pub mod cluster;
pub mod metrics;

pub use cluster::{detect_clusters, ClusterKind, InsiderCluster};
pub use metrics::{compute_network_metrics, NetworkMetrics};
