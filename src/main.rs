use anyhow::Result;
use nettleie::coordinator::{CoordinatorCommand, RefreshCoordinator};
use nettleie::http::HttpExecutor;
use nettleie::tariff::TariffClient;
use nettleie::{Config, TariffSource};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    nettleie::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Nettleie {} starting up (metering point {})",
        env!("CARGO_PKG_VERSION"),
        config.credentials.metering_point_id
    );

    let executor = HttpExecutor::new(&config.http)
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP executor: {}", e))?;
    let client: Arc<dyn TariffSource> = Arc::new(TariffClient::new(
        config.credentials.clone(),
        &config.api,
        executor,
    ));

    let (_cmd_tx, cmd_rx) = mpsc::unbounded_channel::<CoordinatorCommand>();
    let mut coordinator = RefreshCoordinator::new(
        client,
        Duration::from_secs(config.refresh.interval_secs),
        Duration::from_secs(config.refresh.republish_secs),
        cmd_rx,
    );

    // Log published value changes so the host side is observable from logs
    let mut values_rx = coordinator.subscribe_values();
    tokio::spawn(async move {
        while values_rx.changed().await.is_ok() {
            let values = values_rx.borrow().clone();
            tracing::debug!("Published {} derived value(s)", values.len());
        }
    });

    tokio::select! {
        result = coordinator.run() => {
            match result {
                Ok(()) => {
                    info!("Coordinator shutdown complete");
                    Ok(())
                }
                Err(e) => {
                    error!("Coordinator failed with error: {}", e);
                    Err(anyhow::anyhow!("Coordinator error: {}", e))
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received, shutting down");
            Ok(())
        }
    }
}
