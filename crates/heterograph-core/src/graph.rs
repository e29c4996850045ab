//! Labelled node-feature graph.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directed edge `(src, dst)` between 0-based node indices.
pub type Edge = (usize, usize);

/// Binary class label: 0 = legitimate, 1 = fraud.
pub type Label = u8;

/// A labelled graph with dense node features.
///
/// Edges are stored as directed pairs. Every undirected connection produced by
/// the generator appears in both directions, and parallel edges are allowed,
/// so `edges` is a multigraph edge list rather than a simple graph.
///
/// A `Graph` is never mutated after construction; spectral filtering produces a
/// new feature matrix.
///
/// Deserialization goes through [`Graph::new`], so a decoded graph satisfies
/// the same invariants as a generated one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GraphParts")]
pub struct Graph {
    num_nodes: usize,
    edges: Vec<Edge>,
    features: Array2<f64>,
    labels: Vec<Label>,
}

impl Graph {
    /// Assemble a graph from its parts.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if `features` or `labels` do not have
    /// exactly `num_nodes` rows / entries, a label is not 0 or 1, or an edge
    /// endpoint is out of range.
    pub fn new(
        num_nodes: usize,
        edges: Vec<Edge>,
        features: Array2<f64>,
        labels: Vec<Label>,
    ) -> Result<Self, ConfigError> {
        if features.nrows() != num_nodes {
            return Err(ConfigError::invalid_value(
                "features",
                format!("{} rows for {num_nodes} nodes", features.nrows()),
            ));
        }
        if labels.len() != num_nodes {
            return Err(ConfigError::invalid_value(
                "labels",
                format!("{} labels for {num_nodes} nodes", labels.len()),
            ));
        }
        if let Some(node) = labels.iter().position(|&l| l > 1) {
            return Err(ConfigError::invalid_value(
                "labels",
                format!("label {} of node {node} is not 0 or 1", labels[node]),
            ));
        }
        if let Some(&(src, dst)) = edges.iter().find(|&&(s, d)| s >= num_nodes || d >= num_nodes) {
            return Err(ConfigError::invalid_value(
                "edges",
                format!("edge ({src}, {dst}) out of range for {num_nodes} nodes"),
            ));
        }
        Ok(Graph { num_nodes, edges, features, labels })
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of directed edges, parallel edges included.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Feature channels per node.
    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    /// Directed edge list.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// `N x F` feature matrix.
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Per-node class labels.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of nodes carrying `label`.
    pub fn class_count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// Split the graph into its parts.
    pub fn into_parts(self) -> (usize, Vec<Edge>, Array2<f64>, Vec<Label>) {
        (self.num_nodes, self.edges, self.features, self.labels)
    }
}

/// Unchecked wire form of [`Graph`].
#[derive(Deserialize)]
struct GraphParts {
    num_nodes: usize,
    edges: Vec<Edge>,
    features: Array2<f64>,
    labels: Vec<Label>,
}

impl TryFrom<GraphParts> for Graph {
    type Error = ConfigError;

    fn try_from(p: GraphParts) -> Result<Self, Self::Error> {
        Graph::new(p.num_nodes, p.edges, p.features, p.labels)
    }
}
