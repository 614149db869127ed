//! GigDesk Service Binary
//!
//! Wires the store, notifier, and coordinator together. The HTTP surface is
//! an external collaborator and is not served here.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gigdesk_coordinator::{HireCoordinator, MarketConfig, Marketplace, Metrics, Notifier};
use gigdesk_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting GigDesk");

    // Load configuration
    let config = MarketConfig::from_env();
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(Notifier::new(config.notify_channel_capacity));
    let metrics = Arc::new(Metrics::new());

    let _coordinator = HireCoordinator::new(store.clone(), notifier.clone(), metrics.clone());
    let _marketplace = Marketplace::new(store, notifier, metrics.clone());

    info!(
        listen_addr = %config.listen_addr,
        listen_port = %config.listen_port,
        "GigDesk running"
    );

    tokio::signal::ctrl_c().await?;

    let snapshot = metrics.snapshot();
    info!(
        hires_total = snapshot.hires_total,
        hires_success = snapshot.hires_success,
        gigs_created = snapshot.gigs_created,
        bids_placed = snapshot.bids_placed,
        "GigDesk shutdown complete"
    );
    Ok(())
}
