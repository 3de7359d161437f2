//! songlib-catalog - song catalog HTTP service
//!
//! Startup: load `.env`, resolve configuration (CLI > ENV > TOML > defaults),
//! open the database with retries and migrations, then serve the API until
//! Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use songlib_common::config::{load_toml_config, ServiceConfig};
use songlib_common::db::init_database_with_retry;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songlib_catalog::cli::Args;
use songlib_catalog::{build_catalog, build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Before clap so .env values act as environment variables
    let dotenv_result = dotenvy::dotenv();

    let args = Args::parse();
    let file_config = load_toml_config(args.config.as_deref())?;
    let config = ServiceConfig::resolve(args.overrides(), file_config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("songlib_catalog={0},songlib_common={0},tower_http=info", config.log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting songlib-catalog v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match dotenv_result {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => warn!("Failed to load .env file, using existing environment: {}", e),
    }

    info!("Database path: {}", config.database_path.display());
    match &config.lookup_base_url {
        Some(url) => info!(
            "Lookup service: {} (timeout {:?})",
            url, config.lookup_timeout
        ),
        None => warn!("EXTERNAL_API_URL not set, songs will be stored with fallback data"),
    }

    let pool = init_database_with_retry(
        &config.database_path,
        config.connect_attempts,
        config.retry_delay,
    )
    .await
    .context("Failed to connect to database after retries")?;
    info!("Connected to database");

    let catalog = build_catalog(pool, &config).context("Failed to build lookup client")?;
    let app = build_router(AppState::new(catalog));

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("songlib-catalog listening on http://{}", addr);
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
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
            info!("Received terminate signal, shutting down");
        },
    }
}
