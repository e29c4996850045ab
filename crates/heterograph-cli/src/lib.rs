//! Heterograph CLI
//!
//! Command-line interface for the spectral cutoff experiment.
//!
//! # Usage
//!
//! ```bash
//! # Default sweep: 300 nodes, k = 20, cutoffs 2..=20 step 2
//! heterograph run
//!
//! # Smaller graph, JSON output
//! heterograph run --nodes 50 --fraud-ratio 0.2 --k 10 --cutoffs 2,4,6,8,10 --format json
//!
//! # First ten Laplacian eigenvalues of a generated graph
//! heterograph spectrum --seed 7
//!
//! # Write the default configuration to a file
//! heterograph config --output experiment.json
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use heterograph_train::ExperimentConfig;
use std::path::PathBuf;

pub mod commands;

/// Heterograph Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "heterograph")]
#[command(author, version, about = "Spectral feature filtering on heterophilous graphs")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the cutoff sweep and print accuracies
    Run(RunArgs),

    /// Generate a graph and print the smallest Laplacian eigenvalues
    Spectrum(SpectrumArgs),

    /// Print or write the effective configuration as JSON
    Config(ConfigArgs),

    /// Display version information
    Version,
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
    /// One line per cutoff
    Compact,
}

/// Classifier used for every accuracy in a sweep
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrainerKind {
    /// Two-layer GraphSAGE
    #[default]
    Sage,
    /// Softmax regression on features only
    Logistic,
}

/// Experiment settings shared by every command. Flags override values
/// loaded with `--config`.
#[derive(Args, Debug, Default, Clone)]
pub struct ExperimentArgs {
    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of nodes
    #[arg(short, long)]
    pub nodes: Option<usize>,

    /// Fraction of nodes labelled as fraud
    #[arg(long)]
    pub fraud_ratio: Option<f64>,

    /// Probability that an edge joins opposite labels
    #[arg(long)]
    pub heterophily: Option<f64>,

    /// Standard deviation of the feature noise
    #[arg(long)]
    pub feature_noise: Option<f64>,

    /// Drop repeated directed edges after generation
    #[arg(long)]
    pub dedup_edges: bool,

    /// Graph generator seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of Laplacian eigenpairs
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Cutoffs to sweep, comma separated
    #[arg(long, value_delimiter = ',')]
    pub cutoffs: Option<Vec<usize>>,

    /// Training epochs per run
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Adam learning rate
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Hidden layer width
    #[arg(long)]
    pub hidden_dim: Option<usize>,

    /// Parameter initialisation seed
    #[arg(long)]
    pub trainer_seed: Option<u64>,
}

impl ExperimentArgs {
    /// Load `--config` (or the defaults) and apply the flag overrides.
    pub fn to_config(&self) -> Result<ExperimentConfig> {
        let mut cfg = match &self.config {
            Some(path) => ExperimentConfig::from_json(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ExperimentConfig::default(),
        };

        if let Some(v) = self.nodes {
            cfg.graph.num_nodes = v;
        }
        if let Some(v) = self.fraud_ratio {
            cfg.graph.fraud_ratio = v;
        }
        if let Some(v) = self.heterophily {
            cfg.graph.heterophily = v;
        }
        if let Some(v) = self.feature_noise {
            cfg.graph.feature_noise = v;
        }
        if self.dedup_edges {
            cfg.graph.dedup_edges = true;
        }
        if self.seed.is_some() {
            cfg.graph.seed = self.seed;
        }
        if let Some(v) = self.k {
            cfg.spectrum.k = v;
        }
        if let Some(v) = &self.cutoffs {
            cfg.cutoffs = v.clone();
        }
        if let Some(v) = self.epochs {
            cfg.trainer.epochs = v;
        }
        if let Some(v) = self.learning_rate {
            cfg.trainer.learning_rate = v;
        }
        if let Some(v) = self.hidden_dim {
            cfg.trainer.hidden_dim = v;
        }
        if self.trainer_seed.is_some() {
            cfg.trainer.seed = self.trainer_seed;
        }

        cfg.validate().context("invalid experiment configuration")?;
        Ok(cfg)
    }
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Experiment settings
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Classifier to train
    #[arg(short, long, value_enum, default_value = "sage")]
    pub trainer: TrainerKind,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the spectrum command
#[derive(Args, Debug)]
pub struct SpectrumArgs {
    /// Experiment settings
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// How many eigenvalues to print
    #[arg(long, default_value = "10")]
    pub show: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Experiment settings
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "heterograph", "run", "--nodes", "50", "--k", "10", "--cutoffs", "2,4,6", "--format", "json",
            "--trainer", "logistic",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else { panic!("expected run") };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.trainer, TrainerKind::Logistic);

        let cfg = args.experiment.to_config().unwrap();
        assert_eq!(cfg.graph.num_nodes, 50);
        assert_eq!(cfg.spectrum.k, 10);
        assert_eq!(cfg.cutoffs, vec![2, 4, 6]);
        assert_eq!(cfg.trainer.epochs, 30);
    }

    #[test]
    fn no_flags_give_defaults() {
        let cfg = ExperimentArgs::default().to_config().unwrap();
        assert_eq!(cfg, ExperimentConfig::default());
    }

    #[test]
    fn flags_override_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exp.json");
        let mut base = ExperimentConfig::default();
        base.graph.num_nodes = 120;
        base.trainer.epochs = 7;
        base.to_json(&path).unwrap();

        let args = ExperimentArgs { config: Some(path), epochs: Some(12), ..Default::default() };
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.graph.num_nodes, 120);
        assert_eq!(cfg.trainer.epochs, 12);
    }

    #[test]
    fn invalid_override_is_reported() {
        let args = ExperimentArgs { cutoffs: Some(vec![2, 40]), ..Default::default() };
        let err = args.to_config().unwrap_err();
        assert!(format!("{err:#}").contains("cutoffs"));
    }

    #[test]
    fn version_parses() {
        let cli = Cli::try_parse_from(["heterograph", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }
}
