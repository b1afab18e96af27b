use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::transaction::{Transaction, TransactionType};

/// Everything known about one insider within a single analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsiderProfile {
    pub name: String,
    pub companies: BTreeSet<String>,
    /// Titles in the order they were first seen.
    pub titles: Vec<String>,
    pub transactions: Vec<Transaction>,
    pub total_buy_value: f64,
    pub total_sell_value: f64,
    pub net_position: f64,
    pub first_transaction: Option<NaiveDate>,
    pub last_transaction: Option<NaiveDate>,
    pub connected_insiders: BTreeSet<String>,
}

impl InsiderProfile {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            companies: BTreeSet::new(),
            titles: Vec::new(),
            transactions: Vec::new(),
            total_buy_value: 0.0,
            total_sell_value: 0.0,
            net_position: 0.0,
            first_transaction: None,
            last_transaction: None,
            connected_insiders: BTreeSet::new(),
        }
    }

    fn record(&mut self, txn: &Transaction) {
        self.companies.insert(txn.company_key());

        let title = txn.insider_title.trim();
        if !title.is_empty() && !self.titles.iter().any(|t| t == title) {
            self.titles.push(title.to_string());
        }

        match txn.transaction_type {
            TransactionType::Buy => self.total_buy_value += txn.value,
            TransactionType::Sell => self.total_sell_value += txn.value,
            TransactionType::Grant | TransactionType::Exercise => {}
        }

        if let Some(date) = txn.date {
            self.first_transaction = Some(self.first_transaction.map_or(date, |d| d.min(date)));
            self.last_transaction = Some(self.last_transaction.map_or(date, |d| d.max(date)));
        }

        self.transactions.push(txn.clone());
    }

    /// Buy plus sell value; grants and exercises carry no market direction.
    pub fn gross_value(&self) -> f64 {
        self.total_buy_value + self.total_sell_value
    }

    pub fn primary_title(&self) -> Option<&str> {
        self.titles.first().map(String::as_str)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn shares_company_with(&self, other: &InsiderProfile) -> bool {
        !self.companies.is_disjoint(&other.companies)
    }
}

/// Fold transactions into one profile per insider and link every pair of
/// insiders whose company sets intersect.
pub fn build_profiles(transactions: &[Transaction]) -> BTreeMap<String, InsiderProfile> {
    let mut profiles: BTreeMap<String, InsiderProfile> = BTreeMap::new();

    for txn in transactions {
        let name = txn.insider_key();
        profiles
            .entry(name.to_string())
            .or_insert_with(|| InsiderProfile::new(name))
            .record(txn);
    }

    for profile in profiles.values_mut() {
        profile.net_position = profile.total_buy_value - profile.total_sell_value;
    }

    // Each unordered pair is checked once and linked in both directions.
    let names: Vec<String> = profiles.keys().cloned().collect();
    let mut links: Vec<(usize, usize)> = Vec::new();
    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            if profiles[&names[i]].shares_company_with(&profiles[&names[j]]) {
                links.push((i, j));
            }
        }
    }
    for (i, j) in &links {
        if let Some(p) = profiles.get_mut(&names[*i]) {
            p.connected_insiders.insert(names[*j].clone());
        }
        if let Some(p) = profiles.get_mut(&names[*j]) {
            p.connected_insiders.insert(names[*i].clone());
        }
    }

    tracing::debug!(
        insiders = profiles.len(),
        edges = links.len(),
        "Built insider profiles"
    );

    profiles
}

/// Number of undirected edges in the relationship graph.
pub fn count_connections(profiles: &BTreeMap<String, InsiderProfile>) -> usize {
    profiles
        .values()
        .map(|p| p.connected_insiders.len())
        .sum::<usize>()
        / 2
}

/// Profiles ordered by gross traded value, largest first.
pub fn rank_profiles(profiles: &BTreeMap<String, InsiderProfile>) -> Vec<InsiderProfile> {
    let mut ranked: Vec<InsiderProfile> = profiles.values().cloned().collect();
    ranked.sort_by(|a, b| {
        b.gross_value()
            .partial_cmp(&a.gross_value())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}
