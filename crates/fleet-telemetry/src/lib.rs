//! # Fleet Telemetry
//!
//! Logging and metrics for the fleet services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fleet_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FLEET_SERVICE_NAME` | `fleetd` | Service name attached to the startup log |
//! | `FLEET_LOG_LEVEL` | `info` | Log filter; falls back to `RUST_LOG` |
//! | `FLEET_JSON_LOGS` | `false` (`true` in containers) | JSON log output |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, BATTERIES_CREATED, ENVIRONMENTAL_READINGS, HTTP_LATENCY,
    HTTP_REQUESTS, SHIPMENT_TRANSITIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Register metrics and install the global subscriber.
///
/// Call once at startup. A second call fails with
/// [`TelemetryError::LoggingInit`] because the subscriber is global.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    logging::init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}
