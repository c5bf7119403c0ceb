use anyhow::Context;
use cafe_client::ClientConfig;
use cafe_kitchen::{KitchenConfig, KitchenRuntime, LogAlertSink, logger};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = KitchenConfig::from_env();
    logger::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!("Cafe kitchen feed starting...");

    // 2. Gateway
    let client_config = ClientConfig::from_env();
    let gateway = client_config
        .build_gateway()
        .context("failed to build gateway client")?;
    tracing::info!(endpoint = %gateway.endpoint(), "Using order gateway");

    // 3. Poll until interrupted
    let runtime = KitchenRuntime::start(gateway, &config, Arc::new(LogAlertSink));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    runtime.shutdown().await;
    Ok(())
}
