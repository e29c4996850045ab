//! Graph synthesis configuration.
//!
//! [`GraphConfig`] holds every knob of the synthetic fraud graph. It is
//! serializable via [`serde`] so a whole experiment can be stored to and
//! restored from JSON; the JSON helpers at the bottom of this module are shared
//! with the other configuration types of the workspace.
//!
//! # Example
//!
//! ```rust
//! use heterograph_core::config::GraphConfig;
//!
//! let cfg = GraphConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.num_nodes, 300);
//! assert_eq!(cfg.fraud_count(), 45);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// GraphConfig
// ---------------------------------------------------------------------------

/// Parameters of the heterophilous fraud graph generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Number of nodes. Default: **300**.
    pub num_nodes: usize,

    /// Fraction of nodes labelled fraud (class 1). Default: **0.15**.
    pub fraud_ratio: f64,

    /// Probability that an edge attempt targets the opposite class.
    /// Default: **0.9**.
    pub heterophily: f64,

    /// Standard deviation of the Gaussian feature noise. Default: **1.5**.
    pub feature_noise: f64,

    /// Feature channels per node. Default: **8**.
    pub num_features: usize,

    /// Edge attempts per node; each attempt inserts two directed edges.
    /// Default: **4**.
    pub edges_per_node: usize,

    /// Mean shift added to class-1 features and subtracted from class-0
    /// features. Default: **0.3**.
    pub class_shift: f64,

    /// Drop repeated directed pairs after generation. The default (`false`)
    /// keeps parallel edges, so the edge list length is always
    /// `num_nodes * edges_per_node * 2`.
    pub dedup_edges: bool,

    /// RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            num_nodes: 300,
            fraud_ratio: 0.15,
            heterophily: 0.9,
            feature_noise: 1.5,
            num_features: 8,
            edges_per_node: 4,
            class_shift: 0.3,
            dedup_edges: false,
            seed: None,
        }
    }
}

impl GraphConfig {
    /// Number of nodes labelled 1: `floor(num_nodes * fraud_ratio)`.
    pub fn fraud_count(&self) -> usize {
        (self.num_nodes as f64 * self.fraud_ratio).floor() as usize
    }

    /// Validate all fields and return an error describing the first problem
    /// found.
    ///
    /// Both classes must be non-empty: the generator samples edge targets from
    /// the opposite or the same class, and an empty class would leave a draw
    /// with no candidates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes < 2 {
            return Err(ConfigError::invalid_value("num_nodes", "must be >= 2"));
        }
        if !(0.0..=1.0).contains(&self.fraud_ratio) {
            return Err(ConfigError::invalid_value("fraud_ratio", "must be in [0.0, 1.0]"));
        }
        let fraud = self.fraud_count();
        if fraud == 0 {
            return Err(ConfigError::invalid_value(
                "fraud_ratio",
                format!("yields no class-1 nodes for num_nodes={}", self.num_nodes),
            ));
        }
        if fraud >= self.num_nodes {
            return Err(ConfigError::invalid_value(
                "fraud_ratio",
                format!("yields no class-0 nodes for num_nodes={}", self.num_nodes),
            ));
        }
        if !(0.0..=1.0).contains(&self.heterophily) {
            return Err(ConfigError::invalid_value("heterophily", "must be in [0.0, 1.0]"));
        }
        if !self.feature_noise.is_finite() || self.feature_noise < 0.0 {
            return Err(ConfigError::invalid_value("feature_noise", "must be finite and >= 0.0"));
        }
        if self.num_features == 0 {
            return Err(ConfigError::invalid_value("num_features", "must be > 0"));
        }
        if self.edges_per_node == 0 {
            return Err(ConfigError::invalid_value("edges_per_node", "must be > 0"));
        }
        if !self.class_shift.is_finite() {
            return Err(ConfigError::invalid_value("class_shift", "must be finite"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

/// Read and deserialize a JSON document at `path`.
///
/// # Errors
///
/// [`ConfigError::FileRead`] if the file cannot be read,
/// [`ConfigError::ParseError`] if it is not valid JSON for `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` to pretty-printed JSON at `path`, creating parent
/// directories if necessary.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ConfigError::invalid_value("(serialization)", e.to_string()))?;
    std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        GraphConfig::default().validate().expect("default config should be valid");
    }

    #[test]
    fn fraud_count_floors() {
        let cfg = GraphConfig { num_nodes: 50, fraud_ratio: 0.2, ..Default::default() };
        assert_eq!(cfg.fraud_count(), 10);

        let cfg = GraphConfig { num_nodes: 7, fraud_ratio: 0.5, ..Default::default() };
        assert_eq!(cfg.fraud_count(), 3);
    }

    #[test]
    fn single_node_is_invalid() {
        let cfg = GraphConfig { num_nodes: 1, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().field(), Some("num_nodes"));
    }

    #[test]
    fn empty_fraud_class_is_invalid() {
        let cfg = GraphConfig { num_nodes: 5, fraud_ratio: 0.1, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().field(), Some("fraud_ratio"));
    }

    #[test]
    fn empty_legit_class_is_invalid() {
        let cfg = GraphConfig { num_nodes: 10, fraud_ratio: 1.0, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().field(), Some("fraud_ratio"));
    }

    #[test]
    fn heterophily_out_of_range_is_invalid() {
        let cfg = GraphConfig { heterophily: 1.5, ..Default::default() };
        assert_eq!(cfg.validate().unwrap_err().field(), Some("heterophily"));
    }

    #[test]
    fn negative_noise_is_invalid() {
        let cfg = GraphConfig { feature_noise: -0.1, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn json_round_trip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("graph.json");

        let original = GraphConfig { seed: Some(9), dedup_edges: true, ..Default::default() };
        save_json(&original, &path).expect("serialization should succeed");

        let loaded: GraphConfig = load_json(&path).expect("deserialization should succeed");
        assert_eq!(loaded, original);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: GraphConfig = serde_json::from_str(r#"{"num_nodes": 50}"#).unwrap();
        assert_eq!(cfg.num_nodes, 50);
        assert_eq!(cfg.num_features, 8);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_json::<GraphConfig>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
