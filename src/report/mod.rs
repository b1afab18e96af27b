pub mod assembler;
pub mod types;

pub use assembler::generate_report;
pub use types::InsiderNetworkReport;
