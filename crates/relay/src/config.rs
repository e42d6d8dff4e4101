use std::{env, time::Duration};

/// Configuration for the glade relay binary.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address and port the relay binds to (e.g. `0.0.0.0:8080`).
    pub bind_address: String,
    /// How often the metrics reporter logs a stats line.
    pub metrics_interval: Duration,
}

impl RelayConfig {
    /// Builds a configuration from environment variables while falling back
    /// to defaults that match the development setup.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_address = env::var("GLADE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".into());
        let metrics_interval_secs: u64 = env::var("GLADE_METRICS_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        anyhow::ensure!(
            metrics_interval_secs >= 1,
            "metrics interval must be at least 1 second"
        );

        Ok(Self {
            bind_address,
            metrics_interval: Duration::from_secs(metrics_interval_secs),
        })
    }
}
