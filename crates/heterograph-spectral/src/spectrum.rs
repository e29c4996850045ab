//! Smallest eigenpairs of the normalized Laplacian.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SpectralError;
use crate::lanczos::LanczosWorkspace;
use crate::laplacian::Laplacian;

// ---------------------------------------------------------------------------
// SpectrumConfig
// ---------------------------------------------------------------------------

/// Eigensolver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Number of eigenpairs to extract. Default: **20**.
    pub k: usize,

    /// Iteration cap of the dense tridiagonal eigensolve. Default: **10 000**.
    pub max_iterations: usize,

    /// Residual norm `‖L v − λ v‖` every returned pair must reach.
    /// Default: **1e-8**.
    pub tolerance: f64,

    /// Seed of the Lanczos start vector. Fixed by default so the spectrum is
    /// a deterministic function of the graph. Default: **7**.
    pub seed: u64,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        SpectrumConfig { k: 20, max_iterations: 10_000, tolerance: 1e-8, seed: 7 }
    }
}

impl SpectrumConfig {
    /// Config with the default solver settings and `k` eigenpairs.
    pub fn with_k(k: usize) -> Self {
        SpectrumConfig { k, ..Default::default() }
    }

    /// Check solver settings. The rank `k` is checked against the graph in
    /// [`spectrum`].
    pub fn validate(&self) -> Result<(), SpectralError> {
        if self.max_iterations == 0 {
            return Err(SpectralError::InvalidSetting {
                field: "max_iterations",
                reason: "must be > 0".into(),
            });
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(SpectralError::InvalidSetting {
                field: "tolerance",
                reason: "must be finite and > 0.0".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Spectrum
// ---------------------------------------------------------------------------

/// `k` eigenpairs, eigenvalues ascending, eigenvector `j` in column `j`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrum {
    eigvals: Array1<f64>,
    eigvecs: Array2<f64>,
}

impl Spectrum {
    /// Pair eigenvalues with an `N x k` eigenvector matrix.
    ///
    /// # Errors
    ///
    /// [`SpectralError::ShapeMismatch`] if the column count differs from the
    /// number of eigenvalues.
    pub fn new(eigvals: Array1<f64>, eigvecs: Array2<f64>) -> Result<Self, SpectralError> {
        if eigvecs.ncols() != eigvals.len() {
            return Err(SpectralError::shape_mismatch(format!(
                "{} eigenvalues but {} eigenvector columns",
                eigvals.len(),
                eigvecs.ncols()
            )));
        }
        Ok(Spectrum { eigvals, eigvecs })
    }

    /// Number of eigenpairs.
    pub fn k(&self) -> usize {
        self.eigvals.len()
    }

    /// Number of rows of the eigenvector matrix.
    pub fn num_nodes(&self) -> usize {
        self.eigvecs.nrows()
    }

    /// Eigenvalues, ascending.
    pub fn eigvals(&self) -> &Array1<f64> {
        &self.eigvals
    }

    /// `N x k` eigenvectors, one unit-norm column per eigenvalue.
    pub fn eigvecs(&self) -> &Array2<f64> {
        &self.eigvecs
    }
}

/// Extract the `config.k` algebraically smallest eigenpairs of `laplacian`.
///
/// The Krylov dimension starts at `max(2k + 1, k + 20)` and doubles until every
/// requested pair meets `config.tolerance`, up to the full order `n` where the
/// decomposition is exact.
///
/// # Errors
///
/// - [`SpectralError::InvalidRank`] unless `0 < k < n`.
/// - [`SpectralError::NonConvergence`] if the tridiagonal solve exceeds
///   `config.max_iterations` or residuals stay above tolerance with a full
///   basis.
pub fn spectrum(laplacian: &Laplacian, config: &SpectrumConfig) -> Result<Spectrum, SpectralError> {
    config.validate()?;
    let n = laplacian.num_nodes();
    let k = config.k;
    if k == 0 || k >= n {
        return Err(SpectralError::InvalidRank { k, num_nodes: n });
    }

    let mut ws = LanczosWorkspace::new(laplacian, config.seed);
    let mut target = (2 * k + 1).max(k + 20).min(n);
    loop {
        ws.extend_to(target);
        let steps = ws.steps();
        if steps < k {
            return Err(SpectralError::non_convergence(format!(
                "Krylov basis stalled at dimension {steps} < k={k}"
            )));
        }

        let pairs = ws.ritz_pairs(k, config.max_iterations)?;
        let worst = pairs.iter().map(|p| p.residual).fold(0.0f64, f64::max);
        debug!(krylov_dim = steps, k, worst_residual = worst, "Lanczos pass");

        if worst <= config.tolerance {
            let eigvals = Array1::from_iter(pairs.iter().map(|p| p.value));
            let mut eigvecs = Array2::zeros((n, k));
            for (j, p) in pairs.iter().enumerate() {
                eigvecs.column_mut(j).assign(&Array1::from_vec(p.vector.clone()));
            }
            return Spectrum::new(eigvals, eigvecs);
        }

        if steps >= n || target >= n {
            return Err(SpectralError::non_convergence(format!(
                "worst residual {worst:.3e} above tolerance {:.1e} with full Krylov basis",
                config.tolerance
            )));
        }
        target = (target * 2).min(n);
    }
}
