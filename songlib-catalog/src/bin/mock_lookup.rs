//! songlib-mock-lookup - stand-in for the song details lookup service
//!
//! Point the catalog at it with `EXTERNAL_API_URL=http://127.0.0.1:8081`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "songlib-mock-lookup")]
#[command(about = "Stand-in lookup service returning sample song details")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8081", env = "MOCK_LOOKUP_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .context("Failed to bind to address")?;
    info!("Mock lookup listening on http://0.0.0.0:{}/info", args.port);

    axum::serve(listener, songlib_catalog::mock_lookup::mock_lookup_router())
        .await
        .context("Server error")?;

    Ok(())
}
