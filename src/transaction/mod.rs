pub mod loader;
pub mod types;

pub use types::{Transaction, TransactionType};
