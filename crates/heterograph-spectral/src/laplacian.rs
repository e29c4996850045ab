//! Symmetric normalized graph Laplacian.
//!
//! `L = I - D^{-1/2} A D^{-1/2}` where `A` is the adjacency matrix assembled
//! from a directed edge list and `D` is the diagonal of its row sums. Parallel
//! edges accumulate: two entries `(i, j)` give `A[i][j] = 2`. Isolated nodes get
//! an inverse square-root degree of exactly 0, so their row of `L` is the
//! identity row.
//!
//! For a symmetric edge list `L` is symmetric positive semi-definite with
//! eigenvalues in `[0, 2]`.

use heterograph_core::Edge;
use sprs::{CsMat, TriMat};
use tracing::debug;

use crate::error::SpectralError;

/// Sparse CSR normalized Laplacian together with the degree vector it was
/// built from.
#[derive(Debug, Clone)]
pub struct Laplacian {
    matrix: CsMat<f64>,
    degrees: Vec<f64>,
}

impl Laplacian {
    /// Build the Laplacian of the graph with `num_nodes` nodes and directed
    /// edge list `edges`.
    ///
    /// # Errors
    ///
    /// [`SpectralError::ShapeMismatch`] if `num_nodes` is zero or an edge
    /// endpoint is out of range.
    pub fn from_edges(edges: &[Edge], num_nodes: usize) -> Result<Self, SpectralError> {
        if num_nodes == 0 {
            return Err(SpectralError::shape_mismatch("graph has no nodes"));
        }

        let mut tri = TriMat::<f64>::new((num_nodes, num_nodes));
        for &(src, dst) in edges {
            if src >= num_nodes || dst >= num_nodes {
                return Err(SpectralError::shape_mismatch(format!(
                    "edge ({src}, {dst}) out of range for {num_nodes} nodes"
                )));
            }
            tri.add_triplet(src, dst, 1.0);
        }
        // Duplicate triplets are summed on conversion.
        let adjacency: CsMat<f64> = tri.to_csr();

        let degrees: Vec<f64> = adjacency
            .outer_iterator()
            .map(|row| row.data().iter().sum())
            .collect();
        let inv_sqrt: Vec<f64> = degrees
            .iter()
            .map(|&d| {
                let v = d.powf(-0.5);
                if v.is_infinite() { 0.0 } else { v }
            })
            .collect();

        let d_inv_sqrt = CsMat::new(
            (num_nodes, num_nodes),
            (0..=num_nodes).collect(),
            (0..num_nodes).collect(),
            inv_sqrt,
        );
        let normalized = &(&d_inv_sqrt * &adjacency) * &d_inv_sqrt;
        let identity = CsMat::<f64>::eye(num_nodes);
        let matrix = &identity - &normalized;

        debug!(
            num_nodes,
            num_edges = edges.len(),
            nnz = matrix.nnz(),
            isolated = degrees.iter().filter(|&&d| d == 0.0).count(),
            "built normalized Laplacian"
        );
        Ok(Laplacian { matrix, degrees })
    }

    /// Order of the matrix.
    pub fn num_nodes(&self) -> usize {
        self.matrix.rows()
    }

    /// The sparse CSR matrix.
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    /// Row sums of the adjacency matrix (parallel edges counted).
    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    /// `out = L * x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `out` is not of length [`num_nodes`](Self::num_nodes).
    pub fn mul_vec(&self, x: &[f64], out: &mut [f64]) {
        assert_eq!(x.len(), self.num_nodes());
        assert_eq!(out.len(), self.num_nodes());
        for (o, row) in out.iter_mut().zip(self.matrix.outer_iterator()) {
            *o = row.iter().map(|(col, &val)| val * x[col]).sum();
        }
    }
}
