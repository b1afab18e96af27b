use std::io::Read;
use std::path::Path;

use super::types::Transaction;

/// Load a transaction list from disk. `.csv` files are parsed as CSV with a
/// header row; anything else is treated as a JSON array.
pub fn load_transactions(path: &str) -> eyre::Result<Vec<Transaction>> {
    let is_csv = Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("Failed to open transactions file '{}': {}", path, e))?;

    let transactions = if is_csv {
        parse_csv(file).map_err(|e| eyre::eyre!("Failed to parse CSV '{}': {}", path, e))?
    } else {
        parse_json(file).map_err(|e| eyre::eyre!("Failed to parse JSON '{}': {}", path, e))?
    };

    tracing::info!(count = transactions.len(), path, "Loaded transactions");
    Ok(transactions)
}

/// Parse CSV rows into transactions. Rows that do not deserialize are skipped.
pub fn parse_csv<R: Read>(reader: R) -> eyre::Result<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut transactions = Vec::new();
    for (row, result) in reader.deserialize::<Transaction>().enumerate() {
        match result {
            Ok(txn) => transactions.push(txn.normalized()),
            Err(e) => {
                // header is line 1
                tracing::warn!(row = row + 2, error = %e, "Skipping malformed transaction row");
            }
        }
    }
    Ok(transactions)
}

pub fn parse_json<R: Read>(reader: R) -> eyre::Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_reader(reader)?;
    Ok(transactions.into_iter().map(Transaction::normalized).collect())
}
