//! # Fleet Runtime Library
//!
//! Configuration loading and dependency wiring for `fleetd`, exposed as a
//! library so tests can build the same container the binary serves.
//!
//! - `container/` - configuration and service wiring
//! - `adapters/` - storage backends selected at startup

pub mod adapters;
pub mod container;

pub use container::{ConfigError, ContainerError, FleetConfig, FleetContainer, StorageBackend};
