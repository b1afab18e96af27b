pub mod detector;
pub mod types;

pub use detector::detect_coordinated_activity;
pub use types::{ActivityKind, CoordinatedActivity};
