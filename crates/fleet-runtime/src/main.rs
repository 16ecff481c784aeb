//! # fleetd
//!
//! Battery and shipment fleet management server.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging and metrics
//! 2. Load configuration (defaults, `FLEET_CONFIG` file, environment)
//! 3. Validate configuration (production checks when `FLEET_PRODUCTION` is set)
//! 4. Open storage and wire the services
//! 5. Serve HTTP until Ctrl+C or SIGTERM, letting in-flight requests finish

use anyhow::{Context, Result};
use fleet_runtime::{FleetConfig, FleetContainer};
use fleet_telemetry::{init_telemetry, TelemetryConfig};
use fm_04_access_policy::DEV_JWT_SECRET;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("failed to initialize telemetry")?;

    let config = FleetConfig::from_env().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    if config.gateway.auth.secret == DEV_JWT_SECRET {
        warn!("Using the development JWT secret; set FLEET_JWT_SECRET before exposing this server");
    }

    info!("===========================================");
    info!("  fleetd v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(
        addr = %config.gateway.http_addr(),
        storage = ?config.storage.backend,
        strict_transitions = config.lifecycle.strict_transitions,
        "Configuration loaded"
    );

    let container = FleetContainer::new(config).context("failed to wire services")?;
    let gateway = container.gateway().context("failed to build gateway")?;

    gateway
        .serve(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("fleetd stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}
