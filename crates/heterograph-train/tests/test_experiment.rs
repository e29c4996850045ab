//! End-to-end sweeps on small graphs.

use heterograph_core::{generate, GraphConfig};
use heterograph_train::{
    run_experiment, Experiment, ExperimentConfig, ExperimentResult, LogisticTrainer, TrainerConfig,
};

fn small_config() -> ExperimentConfig {
    let mut cfg = ExperimentConfig::default();
    cfg.graph.num_nodes = 50;
    cfg.graph.fraud_ratio = 0.2;
    cfg.graph.heterophily = 0.9;
    cfg.spectrum.k = 10;
    cfg.cutoffs = vec![2, 4, 6, 8, 10];
    cfg
}

fn assert_well_formed(r: &ExperimentResult, cutoffs: &[usize]) {
    assert_eq!(r.cutoffs, cutoffs);
    assert_eq!(r.low_pass_accuracy.len(), cutoffs.len());
    assert_eq!(r.high_pass_accuracy.len(), cutoffs.len());
    for acc in r.low_pass_accuracy.iter().chain(&r.high_pass_accuracy) {
        assert!((0.0..=1.0).contains(acc), "accuracy {acc}");
    }
    assert!((0.0..=1.0).contains(&r.baseline_accuracy));
    assert!((0.0..=1.0).contains(&r.heterophily));
}

/// Unseeded: the run is stochastic but its shape is fixed.
#[test]
fn small_sweep_has_expected_shape() {
    let r = run_experiment(&small_config()).unwrap();
    assert_well_formed(&r, &[2, 4, 6, 8, 10]);
}

#[test]
fn seeded_sweep_is_reproducible() {
    let mut cfg = small_config();
    cfg.graph.seed = Some(17);
    cfg.trainer.seed = Some(18);
    let a = run_experiment(&cfg).unwrap();
    let b = run_experiment(&cfg).unwrap();
    assert_eq!(a, b);
}

#[test]
fn scalar_fields_are_rounded() {
    let mut cfg = small_config();
    cfg.graph.seed = Some(3);
    let r = run_experiment(&cfg).unwrap();
    for v in [r.heterophily, r.baseline_accuracy] {
        assert!(((v * 1e4).round() - v * 1e4).abs() < 1e-6, "{v} not rounded");
    }
}

#[test]
fn logistic_trainer_plugs_in() {
    let cfg = small_config();
    let trainer = LogisticTrainer::new(TrainerConfig { seed: Some(9), ..Default::default() });
    let report = Experiment::new(cfg).with_trainer(trainer).run_detailed().unwrap();
    assert_well_formed(&report.result, &[2, 4, 6, 8, 10]);
    assert_eq!(report.trainer, "logistic");
    assert_eq!(report.eigenvalues.len(), 10);
}

#[test]
fn sweep_on_existing_graph() {
    let graph = generate(&GraphConfig { num_nodes: 60, seed: Some(4), ..Default::default() }).unwrap();
    let mut cfg = ExperimentConfig::default();
    cfg.spectrum.k = 8;
    cfg.cutoffs = vec![1, 8];
    cfg.trainer.epochs = 5;
    let report = Experiment::new(cfg).run_on(&graph).unwrap();
    assert_eq!(report.num_nodes, 60);
    assert_eq!(report.result.low_pass_accuracy.len(), 2);
    assert!(report.eigenvalues[0].abs() < 1e-6);
}

#[test]
fn result_serializes_with_flat_field_names() {
    let mut cfg = small_config();
    cfg.graph.seed = Some(5);
    cfg.trainer.epochs = 2;
    let r = run_experiment(&cfg).unwrap();
    let json = serde_json::to_value(&r).unwrap();
    for key in ["heterophily", "cutoffs", "low_pass_accuracy", "high_pass_accuracy", "baseline_accuracy"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["cutoffs"], serde_json::json!([2, 4, 6, 8, 10]));
}

/// A graph decoded from JSON is checked on the way in, so a bad edge never
/// reaches the sweep.
#[test]
fn decoded_graph_is_validated_before_sweep() {
    let graph = generate(&GraphConfig { num_nodes: 40, seed: Some(6), ..Default::default() }).unwrap();
    let mut cfg = ExperimentConfig::default();
    cfg.spectrum.k = 4;
    cfg.cutoffs = vec![2, 4];
    cfg.trainer.epochs = 2;
    let experiment = Experiment::new(cfg);

    let json = serde_json::to_value(&graph).unwrap();
    let decoded: heterograph_core::Graph = serde_json::from_value(json.clone()).unwrap();
    let report = experiment.run_on(&decoded).unwrap();
    assert_eq!(report.num_edges, graph.num_edges());

    let mut bad = json;
    bad["edges"] = serde_json::json!([[0, 70]]);
    let err = serde_json::from_value::<heterograph_core::Graph>(bad).unwrap_err();
    assert!(err.to_string().contains("edges"), "{err}");
}
