//! carometro-ui - roster photo capture service
//!
//! Serves the Carômetro web UI: import a CSV roster, search it, and capture a
//! webcam photo per student. Photos are written to the photos directory as
//! `<matricula>_<name>.jpg`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use carometro_common::config::{CliOverrides, ServiceConfig};
use carometro_common::events::EventBus;
use carometro_common::photo::PhotoStore;
use carometro_ui::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for carometro-ui
///
/// Anything not given here falls back to CAROMETRO_* environment variables,
/// then the TOML config file, then built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "carometro-ui")]
#[command(about = "Roster photo capture service")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory photos are written to and served from
    #[arg(long, value_name = "DIR")]
    photos_dir: Option<PathBuf>,

    /// Maximum request body size in bytes
    #[arg(long)]
    max_upload_bytes: Option<usize>,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            photos_dir: args.photos_dir,
            max_upload_bytes: args.max_upload_bytes,
            config: args.config,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliOverrides::from(Args::parse());

    // The log level is itself configurable, so config resolution logs through
    // a temporary default subscriber.
    let config = tracing::subscriber::with_default(tracing_subscriber::fmt().finish(), || {
        ServiceConfig::resolve(&cli)
    });

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Carômetro (carometro-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Photos directory: {}", config.photos_dir.display());
    info!("Max upload size: {} bytes", config.max_upload_bytes);

    let photos = PhotoStore::new(config.photos_dir.clone());
    std::fs::create_dir_all(photos.dir()).with_context(|| {
        format!("Failed to create photos directory {}", photos.dir().display())
    })?;

    let state = AppState::new(photos, EventBus::new(100));
    let app = build_router(state, config.max_upload_bytes);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("carometro-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
