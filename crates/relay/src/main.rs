use glade_relay::{
    config::RelayConfig,
    metrics::{start_metrics_reporter, RelayMetrics},
    network::WebSocketServer,
    relay::Relay,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RelayConfig::from_env()?;

    let metrics = Arc::new(RelayMetrics::default());
    let relay = Arc::new(Relay::new(metrics.clone()));

    tokio::spawn(start_metrics_reporter(metrics, config.metrics_interval));

    let server = WebSocketServer::new(config, relay);
    server.run().await?;

    Ok(())
}
