//! The [`Trainer`] capability and its two implementations.
//!
//! A trainer fits a fresh classifier on one feature matrix and reports its
//! accuracy. Both trainers run full-batch Adam for a fixed number of epochs
//! and score on the training nodes themselves, using the logits of the last
//! forward pass (computed just before the final parameter update).

use heterograph_core::{Edge, Label};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::config::TrainerConfig;
use crate::error::{TrainError, TrainResult};
use crate::model::{accuracy, LogisticModel, Model, SageModel};
use crate::optim::Adam;

/// Train a node classifier and return its accuracy in `[0, 1]`.
pub trait Trainer {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Fit a new model on `features` (`N x F`), `edges` and `labels`, and
    /// score it. Inputs are not modified.
    fn train_and_score(&self, features: &Array2<f64>, edges: &[Edge], labels: &[Label]) -> TrainResult<f64>;
}

// ---------------------------------------------------------------------------
// GraphSAGE
// ---------------------------------------------------------------------------

/// Two-layer GraphSAGE with mean aggregation, hidden width
/// [`TrainerConfig::hidden_dim`], ReLU, and [`TrainerConfig::num_classes`]
/// outputs.
#[derive(Debug, Clone, Default)]
pub struct SageTrainer {
    config: TrainerConfig,
}

impl SageTrainer {
    /// Create a trainer with the given hyperparameters.
    pub fn new(config: TrainerConfig) -> Self {
        SageTrainer { config }
    }

    /// Hyperparameters.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }
}

impl Trainer for SageTrainer {
    fn name(&self) -> &'static str {
        "graphsage"
    }

    fn train_and_score(&self, features: &Array2<f64>, edges: &[Edge], labels: &[Label]) -> TrainResult<f64> {
        check_inputs(&self.config, features, labels)?;
        let model = SageModel::new(features, edges, self.config.hidden_dim, self.config.num_classes)?;
        fit(&model, labels, &self.config, self.name())
    }
}

// ---------------------------------------------------------------------------
// Logistic regression
// ---------------------------------------------------------------------------

/// Softmax regression on the features alone; edges are ignored.
#[derive(Debug, Clone, Default)]
pub struct LogisticTrainer {
    config: TrainerConfig,
}

impl LogisticTrainer {
    /// Create a trainer; `hidden_dim` is unused.
    pub fn new(config: TrainerConfig) -> Self {
        LogisticTrainer { config }
    }

    /// Hyperparameters.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }
}

impl Trainer for LogisticTrainer {
    fn name(&self) -> &'static str {
        "logistic"
    }

    fn train_and_score(&self, features: &Array2<f64>, _edges: &[Edge], labels: &[Label]) -> TrainResult<f64> {
        check_inputs(&self.config, features, labels)?;
        let model = LogisticModel::new(features, self.config.num_classes);
        fit(&model, labels, &self.config, self.name())
    }
}

// ---------------------------------------------------------------------------
// Shared training loop
// ---------------------------------------------------------------------------

fn check_inputs(config: &TrainerConfig, features: &Array2<f64>, labels: &[Label]) -> TrainResult<()> {
    config.validate()?;
    let (n, f) = features.dim();
    if n == 0 || f == 0 {
        return Err(TrainError::EmptyInput { rows: n, cols: f });
    }
    if labels.len() != n {
        return Err(TrainError::shape_mismatch(vec![n], vec![labels.len()]));
    }
    if let Some(node) = labels.iter().position(|&l| usize::from(l) >= config.num_classes) {
        return Err(TrainError::InvalidLabel {
            node,
            label: labels[node],
            num_classes: config.num_classes,
        });
    }
    Ok(())
}

fn fit<M: Model>(model: &M, labels: &[Label], config: &TrainerConfig, name: &str) -> TrainResult<f64> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut params = model.init_params(&mut rng);
    let mut optimizer = Adam::new(config.learning_rate);

    let mut score = 0.0;
    let mut loss = f64::NAN;
    for epoch in 0..config.epochs {
        let step = model.forward_backward(&params, labels)?;
        if !step.loss.is_finite() {
            return Err(TrainError::training_step(format!(
                "{name}: non-finite loss {} at epoch {epoch}",
                step.loss
            )));
        }
        loss = step.loss;
        score = accuracy(&step.logits, labels);
        optimizer.step(&mut params, &step.gradients);
        trace!(trainer = name, epoch, loss, accuracy = score, "epoch");
    }

    debug!(
        trainer = name,
        params = model.num_params(),
        epochs = config.epochs,
        final_loss = loss,
        accuracy = score,
        "training finished"
    );
    Ok(score)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
