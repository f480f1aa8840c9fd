//! geoip-filter - country based IP filter
//!
//! This is the composition root that wires together all the components.

use geoip_filter::infrastructure::shutdown_signal;
use geoip_filter::{load_config, CheckServer, DatabaseWatcher, GeoFilter};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    tracing::info!(
        "starting geoip-filter version={} listen={}",
        env!("CARGO_PKG_VERSION"),
        cfg.listen_addr
    );

    // ===== COMPOSITION ROOT =====

    // 1. Country policy
    let policy = cfg.policy().map_err(|e| {
        tracing::error!("no country is set");
        e
    })?;
    tracing::debug!(
        "configured countries allowed={:?} denied={:?}",
        policy.allowed(),
        policy.denied()
    );

    // 2. Filter with the MaxMind database loaded
    let filter = Arc::new(GeoFilter::with_maxmind(policy));
    filter.reload(&cfg.db_file)?;

    // 3. Optional hot reload of the database file
    let watcher = (cfg.db_reload_secs > 0).then(|| {
        let watcher = Arc::new(DatabaseWatcher::new(
            filter.clone(),
            &cfg.db_file,
            Duration::from_secs(cfg.db_reload_secs),
        ));
        watcher.start()
    });

    // 4. Inbound adapter
    let server = CheckServer::new(filter.clone(), cfg.listen_addr.clone());

    let result = tokio::select! {
        res = server.run() => res,
        _ = shutdown_signal() => Ok(()),
    };

    if let Some(watcher) = watcher {
        watcher.abort();
    }
    filter.close();

    result
}
