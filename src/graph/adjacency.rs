use std::collections::{BTreeMap, HashMap};

use crate::profile::InsiderProfile;

/// Dense adjacency matrix over the insider relationship graph. Node `i` is the
/// `i`-th profile in name order.
#[derive(Debug, Clone)]
pub struct Adjacency {
    names: Vec<String>,
    matrix: Vec<Vec<bool>>,
}

impl Adjacency {
    /// Build the matrix from each profile's `connected_insiders`.
    ///
    /// Panics if the connection sets are not symmetric or name an insider
    /// without a profile; both mean the profile builder is broken.
    pub fn from_profiles(profiles: &BTreeMap<String, InsiderProfile>) -> Self {
        let names: Vec<String> = profiles.keys().cloned().collect();
        let index: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let n = names.len();
        let mut matrix = vec![vec![false; n]; n];
        for (i, profile) in profiles.values().enumerate() {
            for other in &profile.connected_insiders {
                let j = *index
                    .get(other.as_str())
                    .unwrap_or_else(|| panic!("{} is connected to unknown insider {}", profile.name, other));
                assert_ne!(i, j, "{} is connected to itself", profile.name);
                matrix[i][j] = true;
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                assert_eq!(
                    matrix[i][j], matrix[j][i],
                    "asymmetric connection between {} and {}",
                    names[i], names[j]
                );
            }
        }

        Self { names, matrix }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, i: usize) -> &str {
        &self.names[i]
    }

    pub fn is_adjacent(&self, i: usize, j: usize) -> bool {
        self.matrix[i][j]
    }

    pub fn neighbors(&self, i: usize) -> Vec<usize> {
        self.matrix[i]
            .iter()
            .enumerate()
            .filter_map(|(j, &linked)| linked.then_some(j))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.matrix
            .iter()
            .map(|row| row.iter().filter(|&&linked| linked).count())
            .sum::<usize>()
            / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::build_profiles;
    use crate::profile::builder::tests::make_txn;
    use crate::transaction::TransactionType;

    #[test]
    fn test_matrix_from_profiles() {
        let txns = vec![
            make_txn("A", "Acme", "CEO", "2024-01-01", TransactionType::Buy, 1.0),
            make_txn("B", "Acme", "CFO", "2024-01-01", TransactionType::Buy, 1.0),
            make_txn("C", "Beta", "CEO", "2024-01-01", TransactionType::Buy, 1.0),
        ];
        let adj = Adjacency::from_profiles(&build_profiles(&txns));
        assert_eq!(adj.len(), 3);
        assert_eq!(adj.name(0), "A");
        assert!(adj.is_adjacent(0, 1));
        assert!(adj.is_adjacent(1, 0));
        assert!(!adj.is_adjacent(0, 2));
        assert_eq!(adj.neighbors(2), Vec::<usize>::new());
        assert_eq!(adj.edge_count(), 1);
    }

    #[test]
    #[should_panic(expected = "asymmetric")]
    fn test_asymmetric_connections_panic() {
        let txns = vec![
            make_txn("A", "Acme", "CEO", "2024-01-01", TransactionType::Buy, 1.0),
            make_txn("B", "Beta", "CFO", "2024-01-01", TransactionType::Buy, 1.0),
        ];
        let mut profiles = build_profiles(&txns);
        if let Some(a) = profiles.get_mut("A") {
            a.connected_insiders.insert("B".to_string());
        }
        Adjacency::from_profiles(&profiles);
    }
}
