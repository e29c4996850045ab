//! HTTP front end of the spectral cutoff experiment.
//!
//! The service is stateless apart from its configuration: every `GET /run`
//! generates a new graph and trains new classifiers.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::{build_router, AppState, StatusResponse};
