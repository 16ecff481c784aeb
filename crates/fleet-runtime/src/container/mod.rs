//! # Service Container
//!
//! Opens the configured storage backend and wires every subsystem to it.
//!
//! ```text
//! KeyValueStore ──→ EntityStore ──┬──→ fm-01 Battery Lifecycle ─────────┐
//!                                 ├──→ fm-02 Shipment Lifecycle ←─ fm-03 │──→ fm-05 Gateway
//!                                 └──→ fm-04 User Directory ─────────────┘
//!                                      fm-04 JwtCodec (TokenVerifier) ──→ fm-05 AuthLayer
//! ```
//!
//! All services share one [`EntityStore`], so a shipment cascade and a
//! battery edit never interleave inside a unit of work.

pub mod config;

pub use config::{ConfigError, FleetConfig, StorageBackend, StorageConfig};

use fleet_store::{EntityStore, InMemoryKVStore, KeyValueStore};
use fleet_types::{SystemTimeSource, TimeSource};
use fm_01_battery_lifecycle::{BatteryLifecycleDependencies, BatteryLifecycleService};
use fm_02_shipment_lifecycle::{ShipmentLifecycleDependencies, ShipmentLifecycleService};
use fm_03_environmental_alerting::AlertEvaluator;
use fm_04_access_policy::{JwtCodec, UserDirectoryDependencies, UserDirectoryService};
use fm_05_api_gateway::{ApiGatewayService, AppState, GatewayError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Wiring failures.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("storage backend '{0}' is not compiled in; rebuild with --features {0}")]
    BackendUnavailable(&'static str),

    #[error("failed to open storage: {0}")]
    Storage(String),
}

/// Every wired subsystem, ready to be served.
pub struct FleetContainer {
    pub config: FleetConfig,
    /// Inbound ports handed to the gateway.
    pub state: AppState,
    /// Verifies gateway credentials; also issues tokens for tooling and tests.
    pub jwt: Arc<JwtCodec>,
}

impl FleetContainer {
    /// Open the configured backend and wire against the system clock.
    pub fn new(config: FleetConfig) -> Result<Self, ContainerError> {
        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage; data is lost on exit");
                Ok(Self::with_store(config, InMemoryKVStore::new(), SystemTimeSource))
            }
            StorageBackend::Rocksdb => open_rocksdb(config),
        }
    }

    /// In-memory wiring with a caller-supplied clock.
    pub fn in_memory<TS>(config: FleetConfig, clock: TS) -> Self
    where
        TS: TimeSource + Clone + 'static,
    {
        Self::with_store(config, InMemoryKVStore::new(), clock)
    }

    /// Wire every service over `kv`.
    pub fn with_store<KV, TS>(config: FleetConfig, kv: KV, clock: TS) -> Self
    where
        KV: KeyValueStore + 'static,
        TS: TimeSource + Clone + 'static,
    {
        let store = Arc::new(EntityStore::new(kv));

        let batteries = BatteryLifecycleService::new(BatteryLifecycleDependencies {
            store: Arc::clone(&store),
            time_source: clock.clone(),
        });

        let shipments = ShipmentLifecycleService::new(ShipmentLifecycleDependencies {
            store: Arc::clone(&store),
            time_source: clock.clone(),
            alert_evaluator: AlertEvaluator::default(),
            config: config.lifecycle.clone(),
        });
        info!(policy = ?config.lifecycle.transition_policy(), "Shipment lifecycle ready");

        let users = UserDirectoryService::new(UserDirectoryDependencies {
            store,
            time_source: clock.clone(),
        });

        let state = AppState {
            batteries: Arc::new(batteries),
            shipments: Arc::new(shipments),
            users: Arc::new(users),
            clock: Arc::new(clock),
        };
        let jwt = Arc::new(JwtCodec::new(&config.gateway.auth));

        Self { config, state, jwt }
    }

    /// Build the HTTP gateway over the wired services.
    pub fn gateway(&self) -> Result<ApiGatewayService, GatewayError> {
        ApiGatewayService::new(
            self.config.gateway.clone(),
            self.state.clone(),
            self.jwt.clone(),
        )
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(config: FleetConfig) -> Result<FleetContainer, ContainerError> {
    use crate::adapters::storage::{RocksDbConfig, RocksDbStore};

    let path = config.storage.data_dir.join("rocksdb");
    let store = RocksDbStore::open(RocksDbConfig::new(&path))
        .map_err(|e| ContainerError::Storage(e.to_string()))?;
    info!(path = %path.display(), "Opened RocksDB storage");
    Ok(FleetContainer::with_store(config, store, SystemTimeSource))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_config: FleetConfig) -> Result<FleetContainer, ContainerError> {
    Err(ContainerError::BackendUnavailable("rocksdb"))
}
