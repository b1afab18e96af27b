//! Insider relationship graph analysis: profiles insiders from their
//! transactions, links insiders that share a company, and scores the graph
//! for coordinated trading, centrality and clusters.

pub mod api;
pub mod config;
pub mod coordination;
pub mod graph;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod transaction;

pub use coordination::detect_coordinated_activity;
pub use graph::{compute_network_metrics, detect_clusters};
pub use profile::build_profiles;
pub use report::{generate_report, InsiderNetworkReport};
pub use transaction::{Transaction, TransactionType};
