use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use crate::profile::InsiderProfile;

use super::adjacency::Adjacency;

const DEGREE_WEIGHT: f64 = 40.0;
const BETWEENNESS_WEIGHT: f64 = 30.0;
const CLOSENESS_WEIGHT: f64 = 20.0;
const CLUSTERING_WEIGHT: f64 = 10.0;

/// Centrality measures for one insider. All centralities are in `[0, 1]`,
/// the influence score in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub name: String,
    pub degree_centrality: f64,
    pub betweenness_centrality: f64,
    pub closeness_centrality: f64,
    pub clustering_coefficient: f64,
    pub influence_score: f64,
}

/// Compute per-insider centrality over the company-overlap graph, ranked by
/// influence score (ties broken by name).
pub fn compute_network_metrics(profiles: &BTreeMap<String, InsiderProfile>) -> Vec<NetworkMetrics> {
    let adj = Adjacency::from_profiles(profiles);
    let n = adj.len();
    if n == 0 {
        return Vec::new();
    }

    let neighbors: Vec<Vec<usize>> = (0..n).map(|i| adj.neighbors(i)).collect();
    let paths = shortest_paths(&neighbors);

    let mut metrics: Vec<NetworkMetrics> = (0..n)
        .map(|i| {
            let degree = if n > 1 {
                neighbors[i].len() as f64 / (n - 1) as f64
            } else {
                0.0
            };
            let betweenness = paths.betweenness[i];
            let closeness = paths.closeness[i];
            let clustering = clustering_coefficient(&adj, &neighbors[i]);

            NetworkMetrics {
                name: adj.name(i).to_string(),
                degree_centrality: degree,
                betweenness_centrality: betweenness,
                closeness_centrality: closeness,
                clustering_coefficient: clustering,
                influence_score: influence_score(degree, betweenness, closeness, clustering),
            }
        })
        .collect();

    metrics.sort_by(|a, b| {
        b.influence_score
            .partial_cmp(&a.influence_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    tracing::debug!(
        nodes = n,
        edges = adj.edge_count(),
        "Computed network metrics"
    );

    metrics
}

pub fn influence_score(degree: f64, betweenness: f64, closeness: f64, clustering: f64) -> f64 {
    let raw = DEGREE_WEIGHT * degree
        + BETWEENNESS_WEIGHT * betweenness
        + CLOSENESS_WEIGHT * closeness
        + CLUSTERING_WEIGHT * clustering;
    (raw * 10.0).round() / 10.0
}

struct PathMetrics {
    betweenness: Vec<f64>,
    closeness: Vec<f64>,
}

/// Brandes' algorithm for unweighted graphs: one BFS per source, counting
/// every shortest path and back-propagating pair dependencies. Closeness
/// falls out of the same BFS distances.
fn shortest_paths(neighbors: &[Vec<usize>]) -> PathMetrics {
    let n = neighbors.len();
    let mut betweenness = vec![0.0_f64; n];
    let mut closeness = vec![0.0_f64; n];

    for s in 0..n {
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist: Vec<Option<usize>> = vec![None; n];
        sigma[s] = 1.0;
        dist[s] = Some(0);

        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = dist[v].unwrap_or(0);
            for &w in &neighbors[v] {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        let (total, reachable) = dist
            .iter()
            .enumerate()
            .filter(|(t, _)| *t != s)
            .filter_map(|(_, d)| *d)
            .fold((0usize, 0usize), |(sum, count), d| (sum + d, count + 1));
        if reachable > 0 {
            closeness[s] = reachable as f64 / total as f64;
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = stack.pop() {
            for &v in &preds[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    // Every unordered pair was visited from both ends.
    let pairs = if n > 2 {
        ((n - 1) * (n - 2)) as f64 / 2.0
    } else {
        0.0
    };
    for b in betweenness.iter_mut() {
        *b = if pairs > 0.0 {
            (*b / 2.0 / pairs).min(1.0)
        } else {
            0.0
        };
    }

    PathMetrics {
        betweenness,
        closeness,
    }
}

fn clustering_coefficient(adj: &Adjacency, neighbors: &[usize]) -> f64 {
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }
    let mut links = 0usize;
    for (a, &u) in neighbors.iter().enumerate() {
        for &v in &neighbors[a + 1..] {
            if adj.is_adjacent(u, v) {
                links += 1;
            }
        }
    }
    links as f64 / (k * (k - 1) / 2) as f64
}
