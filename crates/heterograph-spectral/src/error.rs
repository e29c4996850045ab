//! Error types for spectral analysis.

use thiserror::Error;

/// Errors produced while building the Laplacian, extracting its spectrum, or
/// filtering features in the spectral domain.
#[derive(Debug, Error)]
pub enum SpectralError {
    /// The requested number of eigenpairs is not in `1..num_nodes`.
    #[error("Invalid spectral rank k={k} for a graph with {num_nodes} nodes (need 0 < k < num_nodes)")]
    InvalidRank {
        /// Requested number of eigenpairs.
        k: usize,
        /// Order of the Laplacian.
        num_nodes: usize,
    },

    /// The eigensolver did not reach the residual tolerance.
    #[error("Eigensolver failed to converge: {reason}")]
    NonConvergence {
        /// What failed and by how much.
        reason: String,
    },

    /// A filter mode string other than `low` or `high`.
    #[error("Invalid filter mode `{0}`: expected `low` or `high`")]
    InvalidMode(String),

    /// The cutoff exceeds the number of available eigencomponents.
    #[error("Cutoff {cutoff} exceeds the {k} available eigencomponents")]
    InvalidCutoff {
        /// Requested cutoff.
        cutoff: usize,
        /// Number of eigenpairs in the spectrum.
        k: usize,
    },

    /// Two inputs that must agree in shape do not.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A solver setting is out of range.
    #[error("Invalid solver setting `{field}`: {reason}")]
    InvalidSetting {
        /// Name of the setting.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}

impl SpectralError {
    /// Construct a [`SpectralError::NonConvergence`].
    pub fn non_convergence<S: Into<String>>(reason: S) -> Self {
        SpectralError::NonConvergence { reason: reason.into() }
    }

    /// Construct a [`SpectralError::ShapeMismatch`].
    pub fn shape_mismatch<S: Into<String>>(msg: S) -> Self {
        SpectralError::ShapeMismatch(msg.into())
    }

    /// `true` for the numerical failures: an invalid rank or a solver that
    /// did not converge.
    pub fn is_numerical(&self) -> bool {
        matches!(self, SpectralError::InvalidRank { .. } | SpectralError::NonConvergence { .. })
    }
}
