//! signpost - launch-time content-resolution coordinator

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use signpost::{
    config::Args,
    coordinator::{ContentCoordinator, TracingAnalytics, TracingRatingPrompter},
    store::JsonFileStore,
    DisplayMode,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("signpost={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  signpost - content resolution");
    info!("======================================");
    info!("Variant: {}", args.content_variant());
    info!("Source: {}", args.source_url);
    info!("Store: {}", args.store_path.display());
    info!("Gate date: {}", args.gate_date);
    info!("======================================");

    let store = Arc::new(JsonFileStore::open(&args.store_path)?);

    let coordinator = ContentCoordinator::new(args.coordinator_config(), store)
        .with_analytics(Arc::new(TracingAnalytics))
        .with_ratings(Arc::new(TracingRatingPrompter));

    let mode = coordinator.run().await;
    match &mode {
        DisplayMode::Basic => info!("resolved display mode: basic"),
        DisplayMode::Enhanced(path) => info!(path = %path, "resolved display mode: enhanced"),
        DisplayMode::Loading => error!("resolution ended without a terminal mode"),
    }

    println!("{mode}");
    Ok(())
}
