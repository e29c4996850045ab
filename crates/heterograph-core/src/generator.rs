//! Synthetic heterophilous fraud graph.
//!
//! The generator deliberately produces a hard problem: node features carry a
//! weak class signal buried in Gaussian noise, and most edges connect nodes of
//! opposite classes, which is the regime where mean-aggregating message passing
//! tends to wash the signal out.
//!
//! # Example
//!
//! ```rust
//! use heterograph_core::{config::GraphConfig, generator::generate};
//!
//! let cfg = GraphConfig { num_nodes: 40, fraud_ratio: 0.25, seed: Some(1), ..Default::default() };
//! let graph = generate(&cfg).unwrap();
//!
//! assert_eq!(graph.class_count(1), 10);
//! assert_eq!(graph.num_edges(), 40 * 4 * 2);
//! ```

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::collections::HashSet;
use tracing::debug;

use crate::config::GraphConfig;
use crate::error::ConfigError;
use crate::graph::{Edge, Graph, Label};

/// Generate a graph from `config`, seeding from `config.seed` or OS entropy.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when `config` fails
/// [`GraphConfig::validate`].
pub fn generate(config: &GraphConfig) -> Result<Graph, ConfigError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_with_rng(config, &mut rng)
}

/// Generate a graph drawing all randomness from `rng`.
pub fn generate_with_rng<R: Rng + ?Sized>(config: &GraphConfig, rng: &mut R) -> Result<Graph, ConfigError> {
    config.validate()?;
    let n = config.num_nodes;

    let labels = permuted_labels(n, config.fraud_count(), rng);
    let features = noisy_features(&labels, config, rng);

    // Candidate pools per class; validation guarantees both are non-empty.
    let mut pools: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (node, &label) in labels.iter().enumerate() {
        pools[label as usize].push(node);
    }

    let mut edges: Vec<Edge> = Vec::with_capacity(n * config.edges_per_node * 2);
    for i in 0..n {
        let own = labels[i] as usize;
        for _ in 0..config.edges_per_node {
            let pool = if rng.gen::<f64>() < config.heterophily {
                &pools[1 - own]
            } else {
                &pools[own]
            };
            let j = pool[rng.gen_range(0..pool.len())];
            edges.push((i, j));
            edges.push((j, i));
        }
    }

    if config.dedup_edges {
        let before = edges.len();
        let mut seen = HashSet::with_capacity(before);
        edges.retain(|e| seen.insert(*e));
        debug!(before, after = edges.len(), "dropped parallel edges");
    }

    debug!(
        num_nodes = n,
        num_edges = edges.len(),
        fraud = pools[1].len(),
        "generated fraud graph"
    );
    Graph::new(n, edges, features, labels)
}

/// First `fraud` slots labelled 1, the rest 0, then shuffled.
fn permuted_labels<R: Rng + ?Sized>(n: usize, fraud: usize, rng: &mut R) -> Vec<Label> {
    let mut labels: Vec<Label> = (0..n).map(|i| Label::from(i < fraud)).collect();
    labels.shuffle(rng);
    labels
}

/// `N(0, 1) * noise`, shifted by `+shift` for class 1 and `-shift` for class 0.
fn noisy_features<R: Rng + ?Sized>(labels: &[Label], config: &GraphConfig, rng: &mut R) -> Array2<f64> {
    let mut x = Array2::from_shape_simple_fn((labels.len(), config.num_features), || {
        rng.sample::<f64, _>(StandardNormal) * config.feature_noise
    });
    for (mut row, &label) in x.rows_mut().into_iter().zip(labels) {
        let shift = if label == 1 { config.class_shift } else { -config.class_shift };
        row += shift;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(num_nodes: usize, fraud_ratio: f64, heterophily: f64, seed: u64) -> GraphConfig {
        GraphConfig { num_nodes, fraud_ratio, heterophily, seed: Some(seed), ..Default::default() }
    }

    #[test]
    fn label_count_matches_ratio() {
        let g = generate(&seeded(300, 0.15, 0.9, 3)).unwrap();
        assert_eq!(g.class_count(1), 45);
        assert_eq!(g.class_count(0), 255);
    }

    #[test]
    fn edge_count_is_n_times_attempts_times_two() {
        let g = generate(&seeded(300, 0.15, 0.9, 4)).unwrap();
        assert_eq!(g.num_edges(), 300 * 4 * 2);
    }

    #[test]
    fn edges_are_symmetric_pairs() {
        let g = generate(&seeded(60, 0.2, 0.5, 5)).unwrap();
        for pair in g.edges().chunks(2) {
            assert_eq!(pair[0], (pair[1].1, pair[1].0));
        }
    }

    #[test]
    fn full_heterophily_only_links_opposite_classes() {
        let g = generate(&seeded(80, 0.25, 1.0, 6)).unwrap();
        let labels = g.labels();
        assert!(g.edges().iter().all(|&(s, d)| labels[s] != labels[d]));
    }

    #[test]
    fn zero_heterophily_only_links_same_class() {
        let g = generate(&seeded(80, 0.25, 0.0, 7)).unwrap();
        let labels = g.labels();
        assert!(g.edges().iter().all(|&(s, d)| labels[s] == labels[d]));
    }

    #[test]
    fn features_have_requested_shape() {
        let g = generate(&seeded(30, 0.2, 0.9, 8)).unwrap();
        assert_eq!(g.features().dim(), (30, 8));
    }

    #[test]
    fn noiseless_features_are_pure_class_shift() {
        let cfg = GraphConfig { feature_noise: 0.0, ..seeded(20, 0.25, 0.9, 9) };
        let g = generate(&cfg).unwrap();
        for (row, &label) in g.features().rows().into_iter().zip(g.labels()) {
            let expected = if label == 1 { 0.3 } else { -0.3 };
            assert!(row.iter().all(|&v| (v - expected).abs() < 1e-12));
        }
    }

    #[test]
    fn same_seed_same_graph() {
        let a = generate(&seeded(50, 0.2, 0.9, 11)).unwrap();
        let b = generate(&seeded(50, 0.2, 0.9, 11)).unwrap();
        assert_eq!(a.edges(), b.edges());
        assert_eq!(a.labels(), b.labels());
        assert_eq!(a.features(), b.features());
    }

    #[test]
    fn dedup_removes_parallel_edges() {
        let cfg = GraphConfig { dedup_edges: true, ..seeded(10, 0.5, 0.9, 12) };
        let g = generate(&cfg).unwrap();
        let unique: HashSet<_> = g.edges().iter().collect();
        assert_eq!(unique.len(), g.num_edges());
        assert!(g.num_edges() <= 10 * 4 * 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = GraphConfig { num_nodes: 1, ..Default::default() };
        assert!(generate(&cfg).is_err());
    }
}
