//! `heterograph-server`: serve the cutoff experiment over HTTP.
//!
//! Usage:
//!   cargo run -p heterograph-server -- --port 8000
//!   cargo run -p heterograph-server -- --config experiment.json

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use heterograph_server::{build_router, AppState};
use heterograph_train::ExperimentConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "heterograph-server", about = "Spectral cutoff experiment server", version)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// HTTP port
    #[arg(long, default_value = "8000")]
    port: u16,

    /// The one origin allowed to make cross-origin requests
    #[arg(long, default_value = "http://localhost:3000")]
    allow_origin: String,

    /// Experiment configuration (JSON); defaults apply when omitted
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ExperimentConfig::from_json(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ExperimentConfig::default(),
    };
    config.validate().context("invalid experiment configuration")?;

    let origin = HeaderValue::from_str(&args.allow_origin)
        .with_context(|| format!("invalid --allow-origin {:?}", args.allow_origin))?;
    let app = build_router(AppState::new(config), origin);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("HTTP server listening on {addr}");
    info!("CORS origin: {}", args.allow_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await?;
    Ok(())
}
