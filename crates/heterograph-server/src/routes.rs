//! Router and request handlers.

use std::sync::Arc;

use axum::{extract::State, http::HeaderValue, routing::get, Json, Router};
use heterograph_train::{run_experiment, ExperimentConfig, ExperimentResult};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;

/// Shared, read-only handler state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    config: Arc<ExperimentConfig>,
}

impl AppState {
    /// State that runs every experiment with `config`.
    pub fn new(config: ExperimentConfig) -> Self {
        AppState { config: Arc::new(config) }
    }

    /// The experiment configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }
}

/// Liveness payload of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `"Backend is running"`.
    pub status: String,
}

/// Build the application router.
///
/// - `GET /`    liveness check
/// - `GET /run` one experiment run, returned as [`ExperimentResult`]
///
/// Cross-origin requests are accepted from `allow_origin` only.
pub fn build_router(state: AppState, allow_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([allow_origin]))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    Router::new()
        .route("/", get(health_check))
        .route("/run", get(run))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse { status: "Backend is running".to_string() })
}

/// Each request gets its own run on the blocking pool; nothing is shared
/// between requests except the configuration.
async fn run(State(state): State<AppState>) -> Result<Json<ExperimentResult>, ApiError> {
    let config = Arc::clone(&state.config);
    let result = tokio::task::spawn_blocking(move || run_experiment(&config)).await??;
    info!(
        heterophily = result.heterophily,
        baseline = result.baseline_accuracy,
        cutoffs = result.cutoffs.len(),
        "experiment served"
    );
    Ok(Json(result))
}
