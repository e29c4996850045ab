//! Heterograph Spectral Analysis
//!
//! Graph-frequency tools for node features:
//!
//! - **Laplacian**: sparse symmetric normalized Laplacian `I - D^{-1/2} A D^{-1/2}`
//! - **Spectrum**: the `k` smallest eigenpairs via Lanczos with full
//!   reorthogonalization
//! - **Filter**: low-pass / high-pass reconstruction of a feature matrix from
//!   a band of its spectral coefficients
//!
//! # Example
//!
//! ```rust,no_run
//! use heterograph_core::{generate, GraphConfig};
//! use heterograph_spectral::{filter, spectrum, FilterMode, Laplacian, SpectrumConfig};
//!
//! let graph = generate(&GraphConfig::default()).unwrap();
//! let lap = Laplacian::from_edges(graph.edges(), graph.num_nodes()).unwrap();
//! let spec = spectrum(&lap, &SpectrumConfig::default()).unwrap();
//! let smooth = filter(graph.features(), &spec, FilterMode::Low, 4).unwrap();
//! assert_eq!(smooth.dim(), graph.features().dim());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod filter;
mod lanczos;
pub mod laplacian;
pub mod spectrum;

pub use error::SpectralError;
pub use filter::{filter, filter_named, FilterMode};
pub use laplacian::Laplacian;
pub use spectrum::{spectrum, Spectrum, SpectrumConfig};

/// Common result type for spectral operations.
pub type Result<T> = std::result::Result<T, SpectralError>;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
