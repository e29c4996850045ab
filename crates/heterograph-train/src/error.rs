//! Error types for classifier training and the experiment orchestrator.
//!
//! ## Hierarchy
//!
//! ```text
//! TrainError (top-level)
//! ├── ConfigError    (invalid generator / trainer / sweep settings)
//! ├── SpectralError  (invalid rank, non-convergence, invalid filter mode)
//! └── training failures (shape mismatch, bad label, non-finite loss)
//! ```
//!
//! Nothing in the pipeline recovers from an error: every failure aborts the
//! current run and reaches the caller unchanged.

use heterograph_core::ConfigError;
use heterograph_spectral::SpectralError;
use thiserror::Error;

/// Convenient `Result` alias used by training and orchestration functions.
pub type TrainResult<T> = Result<T, TrainError>;

/// Top-level error type for training and experiments.
#[derive(Debug, Error)]
pub enum TrainError {
    /// A configuration validation or loading error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Laplacian, eigensolver or filter failure.
    #[error("Spectral error: {0}")]
    Spectral(#[from] SpectralError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A shape mismatch between features, labels or parameters.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        actual: Vec<usize>,
    },

    /// A feature matrix with no rows or no columns.
    #[error("Feature matrix must be non-empty, got {rows}x{cols}")]
    EmptyInput {
        /// Rows of the matrix.
        rows: usize,
        /// Columns of the matrix.
        cols: usize,
    },

    /// A label outside `0..num_classes`.
    #[error("Label {label} of node {node} is not in 0..{num_classes}")]
    InvalidLabel {
        /// Offending node.
        node: usize,
        /// Its label.
        label: u8,
        /// Number of classes of the classifier.
        num_classes: usize,
    },

    /// An edge endpoint outside the node range.
    #[error("Edge ({src}, {dst}) out of range for {num_nodes} nodes")]
    InvalidEdge {
        /// Source node.
        src: usize,
        /// Destination node.
        dst: usize,
        /// Number of nodes.
        num_nodes: usize,
    },

    /// A training step failed, e.g. the loss became non-finite.
    #[error("Training step failed: {0}")]
    TrainingStep(String),
}

impl TrainError {
    /// Construct a [`TrainError::TrainingStep`].
    pub fn training_step<S: Into<String>>(msg: S) -> Self {
        TrainError::TrainingStep(msg.into())
    }

    /// Construct a [`TrainError::ShapeMismatch`].
    pub fn shape_mismatch(expected: Vec<usize>, actual: Vec<usize>) -> Self {
        TrainError::ShapeMismatch { expected, actual }
    }
}
