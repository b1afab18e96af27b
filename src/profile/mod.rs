pub mod builder;

pub use builder::{build_profiles, count_connections, rank_profiles, InsiderProfile};
