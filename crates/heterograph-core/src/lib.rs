//! # Heterograph Core
//!
//! Data model and graph synthesis for studying spectral feature filtering on
//! heterophilous graphs.
//!
//! - [`Graph`]: labelled multigraph with dense node features
//! - [`generate`]: synthetic fraud graph with controllable heterophily and
//!   feature noise
//! - [`homophily`]: fraction of edges joining same-labelled nodes
//!
//! ```rust
//! use heterograph_core::{generate, homophily, GraphConfig};
//!
//! let graph = generate(&GraphConfig { seed: Some(42), ..Default::default() }).unwrap();
//! let h = homophily(graph.edges(), graph.labels());
//! assert!((0.0..=1.0).contains(&h));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod homophily;

pub use config::{load_json, save_json, GraphConfig};
pub use error::ConfigError;
pub use generator::{generate, generate_with_rng};
pub use graph::{Edge, Graph, Label};
pub use homophily::homophily;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
