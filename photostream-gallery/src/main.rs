//! PhotoStream Gallery - Main entry point
//!
//! Web module for the PhotoStream photo gallery: serves the browser UI,
//! records uploads, requests tag and capture date suggestions from the
//! analysis service, and mirrors the collection to a JSON document under
//! the root folder.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use photostream_common::config::RootFolderInitializer;
use photostream_common::events::EventBus;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photostream_gallery::config::{Config, ConfigOverrides};
use photostream_gallery::services::{AnalysisClient, Gallery, PhotoStore};
use photostream_gallery::{build_router, AppState};

/// Command-line arguments for photostream-gallery
#[derive(Parser, Debug)]
#[command(name = "photostream-gallery")]
#[command(about = "Photo gallery web module for PhotoStream")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PHOTOSTREAM_PORT")]
    port: Option<u16>,

    /// Root folder for gallery data
    #[arg(short, long, env = "PHOTOSTREAM_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Config file path (defaults to the per-user location)
    #[arg(short, long, env = "PHOTOSTREAM_CONFIG")]
    config: Option<PathBuf>,

    /// Photo analysis service endpoint URL
    #[arg(long, env = "PHOTOSTREAM_ANALYSIS_ENDPOINT")]
    analysis_endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments before tracing init so the configured
    // log level can seed the default filter
    let args = Args::parse();

    let config = Config::load(
        args.config.as_deref(),
        ConfigOverrides {
            port: args.port,
            root_folder: args.root_folder,
            analysis_endpoint: args.analysis_endpoint,
        },
    )
    .context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG overrides the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.directive())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting PhotoStream Gallery (photostream-gallery) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to prepare root folder")?;

    let photos_path = initializer.photos_path();
    info!("Photo document path: {}", photos_path.display());
    info!("Analysis endpoint: {}", config.analysis.endpoint);

    let store = PhotoStore::new(photos_path);
    let analysis = AnalysisClient::new(&config.analysis)
        .context("Failed to create analysis client")?;
    let event_bus = EventBus::new(100);

    let gallery = Gallery::open(store, analysis, event_bus.clone()).await;

    let state = AppState::new(Arc::new(gallery), event_bus);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

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
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
