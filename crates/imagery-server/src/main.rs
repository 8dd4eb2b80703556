//! Imagery - image asset cache and transform server
//!
//! Serves originals and resized derivatives out of a local disk cache in
//! front of a remote object store, and ingests uploads.

use clap::Parser;
use imagery_server::{start_server, Args, Config, Result, ServerState, SharedState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("imagery_server=info".parse()?)
        .add_directive("asset_cache=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let args = Args::parse();
    info!("Starting imagery {}...", env!("CARGO_PKG_VERSION"));
    info!("Config file: {:?}", args.config_file);

    let config = Config::load(&args.config_file)?;
    let namespaces = config.namespaces()?;
    for name in namespaces.names() {
        info!(storage = name, "Configured storage");
    }

    let state: SharedState = Arc::new(ServerState::with_image_magick(
        namespaces,
        config.origins.clone(),
    ));

    start_server(state, &args.bind).await?;

    Ok(())
}
