//! API error type and its HTTP mapping.
//!
//! Every failure of an experiment run is a server error: the request itself
//! carries no input that could be wrong. The `code` field of the JSON body
//! tells the failure classes apart.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use heterograph_spectral::SpectralError;
use heterograph_train::TrainError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The experiment aborted.
    #[error("Experiment failed: {0}")]
    Experiment(#[from] TrainError),

    /// The blocking worker running the experiment panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Experiment(TrainError::Config(_)) => "CONFIGURATION_ERROR",
            ApiError::Experiment(TrainError::Spectral(SpectralError::InvalidMode(_))) => "INVALID_MODE",
            ApiError::Experiment(TrainError::Spectral(e)) if e.is_numerical() => "NUMERICAL_ERROR",
            ApiError::Experiment(TrainError::Spectral(_)) => "SPECTRAL_ERROR",
            ApiError::Experiment(_) => "TRAINING_ERROR",
            ApiError::Worker(_) => "INTERNAL_ERROR",
        }
    }
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };
        tracing::error!(error = %self, code = %body.code, "API error");
        (status, Json(body)).into_response()
    }
}
