//! Trainer and experiment configuration.
//!
//! [`ExperimentConfig`] bundles the generator, eigensolver and trainer
//! settings with the cutoff sweep, so one JSON file describes a whole run.
//!
//! # Example
//!
//! ```rust
//! use heterograph_train::config::ExperimentConfig;
//!
//! let cfg = ExperimentConfig::default();
//! cfg.validate().expect("default config is valid");
//! assert_eq!(cfg.cutoffs, vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
//! ```

use heterograph_core::{load_json, save_json, ConfigError, GraphConfig};
use heterograph_spectral::SpectrumConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TrainResult;

// ---------------------------------------------------------------------------
// TrainerConfig
// ---------------------------------------------------------------------------

/// Hyperparameters of a node classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Width of the hidden layer. Default: **8**.
    pub hidden_dim: usize,

    /// Number of output classes. Default: **2**.
    pub num_classes: usize,

    /// Full-batch epochs per training run. Default: **30**.
    pub epochs: usize,

    /// Adam learning rate. Default: **0.01**.
    pub learning_rate: f64,

    /// Seed of the parameter initialisation. `None` draws a fresh seed from
    /// the OS for every run, so repeated runs differ. Default: **None**.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            hidden_dim: 8,
            num_classes: 2,
            epochs: 30,
            learning_rate: 0.01,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Validate all fields and return an error describing the first problem
    /// found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_dim == 0 {
            return Err(ConfigError::invalid_value("hidden_dim", "must be > 0"));
        }
        if self.num_classes < 2 {
            return Err(ConfigError::invalid_value("num_classes", "must be >= 2"));
        }
        if self.num_classes > usize::from(u8::MAX) + 1 {
            return Err(ConfigError::invalid_value("num_classes", "must be <= 256"));
        }
        if self.epochs == 0 {
            return Err(ConfigError::invalid_value("epochs", "must be > 0"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::invalid_value("learning_rate", "must be finite and > 0.0"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ExperimentConfig
// ---------------------------------------------------------------------------

/// Everything needed to run one cutoff sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Synthetic graph parameters.
    pub graph: GraphConfig,

    /// Eigensolver parameters; `spectrum.k` is the number of eigenpairs the
    /// filters can draw on.
    pub spectrum: SpectrumConfig,

    /// Classifier hyperparameters.
    pub trainer: TrainerConfig,

    /// Cutoffs to sweep, strictly increasing, each `<= spectrum.k`.
    /// Default: **2, 4, …, 20**.
    pub cutoffs: Vec<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            graph: GraphConfig::default(),
            spectrum: SpectrumConfig::default(),
            trainer: TrainerConfig::default(),
            cutoffs: default_cutoffs(),
        }
    }
}

/// `2, 4, …, 20`.
pub fn default_cutoffs() -> Vec<usize> {
    (2..=20).step_by(2).collect()
}

impl ExperimentConfig {
    /// Validate every section.
    ///
    /// Whether `spectrum.k` fits the graph is left to the eigensolver, which
    /// reports it as [`SpectralError::InvalidRank`].
    ///
    /// [`SpectralError::InvalidRank`]: heterograph_spectral::SpectralError::InvalidRank
    pub fn validate(&self) -> TrainResult<()> {
        self.graph.validate()?;
        self.spectrum.validate()?;
        self.trainer.validate()?;

        if self.cutoffs.is_empty() {
            return Err(ConfigError::invalid_value("cutoffs", "must not be empty").into());
        }
        if let Some(&c) = self.cutoffs.iter().find(|&&c| c > self.spectrum.k) {
            return Err(ConfigError::invalid_value(
                "cutoffs",
                format!("cutoff {c} exceeds spectrum.k={}", self.spectrum.k),
            )
            .into());
        }
        if self.cutoffs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::invalid_value("cutoffs", "must be strictly increasing").into());
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file. Missing fields
    /// take their defaults.
    pub fn from_json(path: &Path) -> TrainResult<Self> {
        let cfg: ExperimentConfig = load_json(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn to_json(&self, path: &Path) -> TrainResult<()> {
        save_json(self, path)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
