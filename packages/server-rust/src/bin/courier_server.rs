//! Courier demo server entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use courier_server::cli::ServerArgs;
use courier_server::network::{NetworkConfig, NetworkModule};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_logging(args.log_json)?;

    let mut module = NetworkModule::new(NetworkConfig::from(&args), Arc::new(args.registry()));
    let port = module.start().await?;
    info!(port, "courier-server listening");

    module.serve(shutdown_signal()).await
}

fn init_logging(json: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    }
    .context("failed to initialize tracing subscriber")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
