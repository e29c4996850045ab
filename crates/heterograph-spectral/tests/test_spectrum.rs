//! Validation tests for the Laplacian spectrum and spectral filter.
//!
//! Graphs come from the seeded generator; the eigensolver is checked against
//! the Laplacian's known structure and against a dense reference solve.

use approx::assert_abs_diff_eq;
use heterograph_core::{generate, Graph, GraphConfig};
use heterograph_spectral::{filter, spectrum, FilterMode, Laplacian, SpectralError, Spectrum, SpectrumConfig};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::Array2;

const TOL: f64 = 1e-6;

fn fraud_graph(num_nodes: usize, seed: u64) -> Graph {
    generate(&GraphConfig { num_nodes, seed: Some(seed), ..Default::default() }).unwrap()
}

fn graph_spectrum(graph: &Graph, k: usize) -> Spectrum {
    let lap = Laplacian::from_edges(graph.edges(), graph.num_nodes()).unwrap();
    spectrum(&lap, &SpectrumConfig::with_k(k)).unwrap()
}

/// Eigenvalues are non-negative, non-decreasing, and start at 0.
#[test]
fn eigenvalues_are_sorted_and_non_negative() {
    let g = fraud_graph(300, 1);
    let s = graph_spectrum(&g, 20);

    assert_eq!(s.k(), 20);
    assert_eq!(s.num_nodes(), 300);
    let vals = s.eigvals();
    assert!(vals.iter().all(|&v| v >= -TOL), "negative eigenvalue in {vals:?}");
    for w in vals.as_slice().unwrap().windows(2) {
        assert!(w[0] <= w[1] + 1e-12, "eigenvalues out of order: {w:?}");
    }
    assert_abs_diff_eq!(vals[0], 0.0, epsilon = TOL);
}

/// Eigenvector columns are orthonormal.
#[test]
fn eigenvectors_are_orthonormal() {
    let g = fraud_graph(200, 2);
    let s = graph_spectrum(&g, 20);
    let gram = s.eigvecs().t().dot(s.eigvecs());
    for i in 0..20 {
        for j in 0..20 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(gram[[i, j]], expected, epsilon = TOL);
        }
    }
}

/// Every returned pair satisfies `L v = λ v`.
#[test]
fn pairs_satisfy_eigen_equation() {
    let g = fraud_graph(150, 3);
    let lap = Laplacian::from_edges(g.edges(), g.num_nodes()).unwrap();
    let s = spectrum(&lap, &SpectrumConfig::with_k(10)).unwrap();
    let mut lv = vec![0.0; 150];
    for (j, &lambda) in s.eigvals().iter().enumerate() {
        let v = s.eigvecs().column(j).to_vec();
        lap.mul_vec(&v, &mut lv);
        for (a, b) in lv.iter().zip(&v) {
            assert_abs_diff_eq!(*a, lambda * b, epsilon = TOL);
        }
    }
}

/// The Lanczos eigenvalues agree with a dense symmetric eigensolve.
#[test]
fn matches_dense_reference() {
    let g = fraud_graph(40, 4);
    let lap = Laplacian::from_edges(g.edges(), g.num_nodes()).unwrap();
    let s = spectrum(&lap, &SpectrumConfig::with_k(10)).unwrap();

    let dense = lap.matrix().to_dense();
    let m = DMatrix::from_fn(40, 40, |i, j| dense[[i, j]]);
    let mut reference: Vec<f64> = SymmetricEigen::new(m).eigenvalues.iter().copied().collect();
    reference.sort_by(f64::total_cmp);

    for (got, want) in s.eigvals().iter().zip(&reference) {
        assert_abs_diff_eq!(*got, *want, epsilon = TOL);
    }
}

/// The spectrum is a deterministic function of the graph.
#[test]
fn spectrum_is_reproducible() {
    let g = fraud_graph(80, 5);
    let a = graph_spectrum(&g, 8);
    let b = graph_spectrum(&g, 8);
    assert_eq!(a.eigvals(), b.eigvals());
}

/// Asking for more eigenpairs than nodes is a numerical error.
#[test]
fn rank_above_n_is_rejected() {
    let g = fraud_graph(30, 6);
    let lap = Laplacian::from_edges(g.edges(), g.num_nodes()).unwrap();
    let err = spectrum(&lap, &SpectrumConfig::with_k(31)).unwrap_err();
    assert!(err.is_numerical());
    assert!(matches!(err, SpectralError::InvalidRank { k: 31, num_nodes: 30 }));
}

/// Low band plus high band at any cutoff equals the full k-rank projection.
#[test]
fn low_plus_high_is_full_projection() {
    let g = fraud_graph(100, 7);
    let s = graph_spectrum(&g, 12);
    let x = g.features();
    let full = filter(x, &s, FilterMode::Low, 12).unwrap();

    for cutoff in 0..=12 {
        let low = filter(x, &s, FilterMode::Low, cutoff).unwrap();
        let high = filter(x, &s, FilterMode::High, cutoff).unwrap();
        let sum = &low + &high;
        for (a, b) in sum.iter().zip(full.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }
}

/// The full-band reconstruction is `U Uᵀ X` and projecting it again is a no-op.
#[test]
fn full_band_is_idempotent_projection() {
    let g = fraud_graph(60, 8);
    let s = graph_spectrum(&g, 10);
    let u = s.eigvecs();
    let expected: Array2<f64> = u.dot(&u.t().dot(g.features()));

    let once = filter(g.features(), &s, FilterMode::Low, 10).unwrap();
    let twice = filter(&once, &s, FilterMode::Low, 10).unwrap();
    for ((a, b), c) in once.iter().zip(expected.iter()).zip(twice.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        assert_abs_diff_eq!(*a, *c, epsilon = 1e-9);
    }
}

/// Boundary cutoffs discard everything.
#[test]
fn boundary_cutoffs_zero_the_output() {
    let g = fraud_graph(60, 9);
    let s = graph_spectrum(&g, 10);
    let low0 = filter(g.features(), &s, FilterMode::Low, 0).unwrap();
    let high_k = filter(g.features(), &s, FilterMode::High, 10).unwrap();
    assert!(low0.iter().all(|&v| v == 0.0));
    assert!(high_k.iter().all(|&v| v == 0.0));
}

/// Disconnected graphs expose one zero eigenvalue per component.
#[test]
fn zero_multiplicity_counts_components() {
    // Three disjoint triangles.
    let mut edges = Vec::new();
    for c in 0..3 {
        let b = c * 3;
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            edges.push((b + i, b + j));
            edges.push((b + j, b + i));
        }
    }
    let lap = Laplacian::from_edges(&edges, 9).unwrap();
    let s = spectrum(&lap, &SpectrumConfig::with_k(4)).unwrap();
    let zeros = s.eigvals().iter().filter(|v| v.abs() < TOL).count();
    assert_eq!(zeros, 3);
    assert_abs_diff_eq!(s.eigvals()[3], 1.5, epsilon = TOL);
}

/// An iteration cap too small for the tridiagonal solve surfaces as a
/// numerical error instead of a partial spectrum.
#[test]
fn iteration_cap_reports_non_convergence() {
    let graph = fraud_graph(100, 12);
    let lap = Laplacian::from_edges(graph.edges(), graph.num_nodes()).unwrap();
    let config = SpectrumConfig { max_iterations: 1, ..SpectrumConfig::with_k(10) };
    let err = spectrum(&lap, &config).unwrap_err();
    assert!(matches!(err, SpectralError::NonConvergence { .. }), "{err}");
    assert!(err.is_numerical());
}
