//! Edge homophily ratio.

use crate::graph::{Edge, Label};

/// Fraction of directed edges whose endpoints share a label.
///
/// Both directions of a symmetric pair and every parallel edge are counted, so
/// the value is a property of the edge list exactly as stored. Values near 0
/// indicate strong heterophily, values near 1 strong homophily. An empty edge
/// list scores 0.0.
///
/// # Panics
///
/// Panics if an edge endpoint is not a valid index into `labels`.
pub fn homophily(edges: &[Edge], labels: &[Label]) -> f64 {
    if edges.is_empty() {
        return 0.0;
    }
    let same = edges.iter().filter(|&&(s, d)| labels[s] == labels[d]).count();
    same as f64 / edges.len() as f64
}
