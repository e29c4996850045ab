//! Integration tests for graph synthesis and the homophily metric.
//!
//! All graphs are generated from fixed seeds so the assertions are
//! deterministic.

use heterograph_core::{generate, homophily, GraphConfig};

fn config(num_nodes: usize, fraud_ratio: f64, heterophily: f64, seed: u64) -> GraphConfig {
    GraphConfig {
        num_nodes,
        fraud_ratio,
        heterophily,
        seed: Some(seed),
        ..Default::default()
    }
}

/// Label and edge counts hold across a range of sizes and ratios.
#[test]
fn counts_hold_across_sizes() {
    for (n, ratio) in [(2, 0.5), (50, 0.2), (120, 0.1), (300, 0.15)] {
        let cfg = config(n, ratio, 0.9, n as u64);
        let g = generate(&cfg).unwrap();
        assert_eq!(g.class_count(1), cfg.fraud_count(), "n={n}");
        assert_eq!(g.num_edges(), n * 4 * 2, "n={n}");
        assert!(g.edges().iter().all(|&(s, d)| s < n && d < n));
    }
}

/// With heterophily = 1.0 every draw targets the opposite class, so the
/// homophily score is exactly zero.
#[test]
fn full_heterophily_scores_zero_homophily() {
    let g = generate(&config(200, 0.3, 1.0, 21)).unwrap();
    assert_eq!(homophily(g.edges(), g.labels()), 0.0);
}

/// The default heterophily of 0.9 yields a homophily score near 0.1.
#[test]
fn default_heterophily_yields_low_homophily() {
    let g = generate(&config(300, 0.15, 0.9, 22)).unwrap();
    let h = homophily(g.edges(), g.labels());
    assert!(h > 0.03 && h < 0.2, "homophily {h} outside expected band");
}

/// An edge list restricted to same-label pairs scores exactly 1.0.
#[test]
fn same_label_edge_list_scores_one() {
    let g = generate(&config(100, 0.2, 0.0, 23)).unwrap();
    assert_eq!(homophily(g.edges(), g.labels()), 1.0);
}

/// Class-1 features are shifted up, class-0 features down.
#[test]
fn class_means_are_separated() {
    let g = generate(&config(300, 0.5, 0.9, 24)).unwrap();
    let (mut sum1, mut sum0, mut n1, mut n0) = (0.0, 0.0, 0usize, 0usize);
    for (row, &label) in g.features().rows().into_iter().zip(g.labels()) {
        if label == 1 {
            sum1 += row.sum();
            n1 += row.len();
        } else {
            sum0 += row.sum();
            n0 += row.len();
        }
    }
    let gap = sum1 / n1 as f64 - sum0 / n0 as f64;
    assert!(gap > 0.3 && gap < 0.9, "class mean gap {gap}");
}
