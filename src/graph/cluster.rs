use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::profile::InsiderProfile;

use super::adjacency::Adjacency;

/// Union-Find data structure for insider clustering.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]); // path compression
        }
        self.parent[x]
    }

    fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return;
        }
        // Union by rank
        if self.rank[rx] < self.rank[ry] {
            self.parent[rx] = ry;
        } else if self.rank[rx] > self.rank[ry] {
            self.parent[ry] = rx;
        } else {
            self.parent[ry] = rx;
            self.rank[rx] += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterKind {
    /// Every member files at the same company.
    ExecutiveGroup,
    /// Every member's primary title mentions the board.
    BoardNetwork,
    CrossCompany,
}

impl ClusterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExecutiveGroup => "EXECUTIVE_GROUP",
            Self::BoardNetwork => "BOARD_NETWORK",
            Self::CrossCompany => "CROSS_COMPANY",
        }
    }
}

/// A connected component of two or more insiders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsiderCluster {
    pub cluster_id: usize,
    pub members: Vec<String>,
    pub size: usize,
    pub companies: Vec<String>,
    pub total_transaction_value: f64,
    /// Mean gap in days between consecutive member transactions.
    pub avg_transaction_sync: f64,
    pub classification: ClusterKind,
}

/// Partition insiders into connected components. Singletons are dropped;
/// clusters come back largest first with ids assigned in that order.
///
/// Panics on the same broken connection sets as [`Adjacency::from_profiles`].
pub fn detect_clusters(profiles: &BTreeMap<String, InsiderProfile>) -> Vec<InsiderCluster> {
    let adj = Adjacency::from_profiles(profiles);
    let edges = (0..adj.len()).flat_map(|i| adj.neighbors(i).into_iter().map(move |j| (i, j)));
    let components = connected_components(adj.len(), edges);

    let mut clusters: Vec<InsiderCluster> = components
        .into_iter()
        .filter(|members| members.len() >= 2)
        .map(|members| {
            let members: Vec<&InsiderProfile> =
                members.iter().map(|&i| &profiles[adj.name(i)]).collect();
            summarize(&members)
        })
        .collect();

    clusters.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.members.cmp(&b.members)));
    for (i, cluster) in clusters.iter_mut().enumerate() {
        cluster.cluster_id = i + 1;
    }

    tracing::debug!(clusters = clusters.len(), "Detected insider clusters");

    clusters
}

/// Components over node indices `0..size`, each sorted ascending, ordered by
/// their smallest member. The result does not depend on edge order.
fn connected_components(
    size: usize,
    edges: impl IntoIterator<Item = (usize, usize)>,
) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(size);
    for (a, b) in edges {
        uf.union(a, b);
    }

    let mut by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..size {
        let root = uf.find(i);
        by_root.entry(root).or_default().push(i);
    }

    let mut components: Vec<Vec<usize>> = by_root.into_values().collect();
    components.sort_by_key(|c| c[0]);
    components
}

fn summarize(members: &[&InsiderProfile]) -> InsiderCluster {
    let companies: BTreeSet<&str> = members
        .iter()
        .flat_map(|p| p.companies.iter().map(String::as_str))
        .collect();

    let total_transaction_value: f64 = members.iter().map(|p| p.gross_value()).sum();

    let mut dates: Vec<NaiveDate> = members
        .iter()
        .flat_map(|p| p.transactions.iter().filter_map(|t| t.date))
        .collect();
    dates.sort();
    let avg_transaction_sync = if dates.len() < 2 {
        0.0
    } else {
        let gaps: i64 = dates.windows(2).map(|w| (w[1] - w[0]).num_days()).sum();
        gaps as f64 / (dates.len() - 1) as f64
    };

    let classification = if companies.len() == 1 {
        ClusterKind::ExecutiveGroup
    } else if members.iter().all(|p| {
        p.primary_title()
            .map(|t| t.to_lowercase().contains("board"))
            .unwrap_or(false)
    }) {
        ClusterKind::BoardNetwork
    } else {
        ClusterKind::CrossCompany
    };

    InsiderCluster {
        cluster_id: 0,
        members: members.iter().map(|p| p.name.clone()).collect(),
        size: members.len(),
        companies: companies.iter().map(|c| c.to_string()).collect(),
        total_transaction_value,
        avg_transaction_sync,
        classification,
    }
}
