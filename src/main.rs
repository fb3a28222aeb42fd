//! geogate - geolocation access control for edge request pipelines
//!
//! This is the composition root that wires together all the components.

use geogate::{load_config, AccessService, GateServer, MaxMindResolver};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;
    cfg.validate()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting geogate listen={} db={}",
        cfg.listen_addr,
        cfg.db_path
    );

    // Open the database during startup so the first request does not race
    // the lazy open path.
    let resolver = Arc::new(MaxMindResolver::new(cfg.db_path.clone()));
    if let Err(e) = resolver.open() {
        anyhow::bail!("cannot open database file {}: {}", cfg.db_path, e);
    }

    let service = Arc::new(AccessService::new(resolver, cfg.policy()));

    let server = GateServer::new(service, cfg.listen_addr);
    server.run().await
}
