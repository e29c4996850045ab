//! Command implementations and output rendering.

use anyhow::{Context, Result};
use colored::Colorize;
use heterograph_core::{generate, homophily, save_json};
use heterograph_spectral::{spectrum, Laplacian};
use heterograph_train::{Experiment, ExperimentReport, ExperimentResult, LogisticTrainer, SageTrainer};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use crate::{Commands, ConfigArgs, OutputFormat, RunArgs, SpectrumArgs, TrainerKind};

/// Execute a parsed command.
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => execute_run(args),
        Commands::Spectrum(args) => execute_spectrum(args),
        Commands::Config(args) => execute_config(args),
        Commands::Version => {
            println!("heterograph {}", env!("CARGO_PKG_VERSION"));
            println!("spectral module version: {}", heterograph_spectral::VERSION);
            println!("train module version: {}", heterograph_train::VERSION);
            Ok(())
        }
    }
}

fn execute_run(args: RunArgs) -> Result<()> {
    let config = args.experiment.to_config()?;
    info!(
        num_nodes = config.graph.num_nodes,
        k = config.spectrum.k,
        cutoffs = config.cutoffs.len(),
        trainer = ?args.trainer,
        "starting sweep"
    );

    let experiment = Experiment::new(config.clone());
    let report = match args.trainer {
        TrainerKind::Sage => experiment
            .with_trainer(SageTrainer::new(config.trainer))
            .run_detailed(),
        TrainerKind::Logistic => experiment
            .with_trainer(LogisticTrainer::new(config.trainer))
            .run_detailed(),
    }
    .context("experiment failed")?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.result)?),
        OutputFormat::Compact => print!("{}", render_compact(&report.result)),
        OutputFormat::Table => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &ExperimentReport) {
    let r = &report.result;
    println!(
        "{} {} nodes, {} edges, trainer {}",
        "[sweep]".bright_cyan().bold(),
        report.num_nodes,
        report.num_edges,
        report.trainer
    );
    println!("  {} {:.4}", "Homophily:".dimmed(), r.heterophily);
    println!();
    println!("{}", render_table(r));
    println!();
    println!("  {} {:.4}", "Baseline accuracy:".bold(), r.baseline_accuracy);
}

/// One row of the sweep table.
#[derive(Tabled)]
struct CutoffRow {
    #[tabled(rename = "Cutoff")]
    cutoff: usize,
    #[tabled(rename = "Low-pass")]
    low: String,
    #[tabled(rename = "High-pass")]
    high: String,
}

/// Sweep accuracies as a rounded table.
pub fn render_table(result: &ExperimentResult) -> String {
    let rows: Vec<CutoffRow> = result
        .cutoffs
        .iter()
        .zip(&result.low_pass_accuracy)
        .zip(&result.high_pass_accuracy)
        .map(|((&cutoff, low), high)| CutoffRow {
            cutoff,
            low: format!("{low:.4}"),
            high: format!("{high:.4}"),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// `Cutoff 02 | Low-pass 0.6133 | High-pass 0.5467` lines plus the baseline.
pub fn render_compact(result: &ExperimentResult) -> String {
    let mut out = String::new();
    for ((cutoff, low), high) in result
        .cutoffs
        .iter()
        .zip(&result.low_pass_accuracy)
        .zip(&result.high_pass_accuracy)
    {
        out.push_str(&format!("Cutoff {cutoff:02} | Low-pass {low:.4} | High-pass {high:.4}\n"));
    }
    out.push_str(&format!(
        "Homophily {:.4} | Baseline {:.4}\n",
        result.heterophily, result.baseline_accuracy
    ));
    out
}

/// Eigenvalue listing of the spectrum command.
#[derive(Debug, Serialize)]
struct SpectrumSummary {
    num_nodes: usize,
    num_edges: usize,
    homophily: f64,
    eigenvalues: Vec<f64>,
}

#[derive(Tabled)]
struct EigenRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Eigenvalue")]
    value: String,
}

fn execute_spectrum(args: SpectrumArgs) -> Result<()> {
    let config = args.experiment.to_config()?;
    let graph = generate(&config.graph)?;
    let laplacian = Laplacian::from_edges(graph.edges(), graph.num_nodes())?;
    let spec = spectrum(&laplacian, &config.spectrum).context("eigensolver failed")?;

    let summary = SpectrumSummary {
        num_nodes: graph.num_nodes(),
        num_edges: graph.num_edges(),
        homophily: homophily(graph.edges(), graph.labels()),
        eigenvalues: spec.eigvals().iter().take(args.show).copied().collect(),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Compact => {
            let values: Vec<String> = summary.eigenvalues.iter().map(|v| format!("{v:.6}")).collect();
            println!("{}", values.join(" "));
        }
        OutputFormat::Table => {
            println!(
                "{} {} nodes, {} edges, homophily {:.4}",
                "[spectrum]".bright_cyan().bold(),
                summary.num_nodes,
                summary.num_edges,
                summary.homophily
            );
            let rows: Vec<EigenRow> = summary
                .eigenvalues
                .iter()
                .enumerate()
                .map(|(index, v)| EigenRow { index, value: format!("{v:.6}") })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }
    Ok(())
}

fn execute_config(args: ConfigArgs) -> Result<()> {
    let config = args.experiment.to_config()?;
    match &args.output {
        Some(path) => {
            save_json(&config, path).with_context(|| format!("writing {}", path.display()))?;
            println!("{} {}", "Wrote".green(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
