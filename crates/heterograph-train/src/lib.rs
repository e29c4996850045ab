//! # Heterograph Train
//!
//! Node classification on spectrally filtered features.
//!
//! - [`config`]: [`TrainerConfig`] and the whole-run [`ExperimentConfig`]
//! - [`model`]: GraphSAGE and logistic models with hand-written gradients
//! - [`optim`]: [`Adam`] over a flat parameter vector
//! - [`trainer`]: the [`Trainer`] capability with [`SageTrainer`] and
//!   [`LogisticTrainer`]
//! - [`experiment`]: the cutoff sweep, [`run_experiment`]
//!
//! Accuracies are measured on the nodes the classifier was trained on, so they
//! quantify fit rather than generalisation.
//!
//! ```rust,no_run
//! use heterograph_train::{run_experiment, ExperimentConfig};
//!
//! let result = run_experiment(&ExperimentConfig::default()).unwrap();
//! for ((c, lo), hi) in result.cutoffs.iter().zip(&result.low_pass_accuracy).zip(&result.high_pass_accuracy) {
//!     println!("Cutoff {c:02} | Low-pass {lo:.4} | High-pass {hi:.4}");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod experiment;
pub mod model;
pub mod optim;
pub mod trainer;

pub use config::{default_cutoffs, ExperimentConfig, TrainerConfig};
pub use error::{TrainError, TrainResult};
pub use experiment::{run_experiment, Experiment, ExperimentReport, ExperimentResult};
pub use optim::Adam;
pub use trainer::{LogisticTrainer, SageTrainer, Trainer};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
