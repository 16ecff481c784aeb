//! # Fleet Store
//!
//! Document persistence for the fleet entities.
//!
//! ## Architecture
//!
//! ```text
//! lifecycle services
//!        │  transact(|uow| ...)          get / find_unique / all
//!        ▼                                        │
//! ┌──────────────────────────────────────────────┴──┐
//! │ EntityStore                                     │
//! │   UnitOfWork: staged docs + index entries       │
//! │   single writer, read-your-writes               │
//! └──────────────────────┬──────────────────────────┘
//!                        │ atomic_batch_write
//!                        ▼
//!               KeyValueStore (port)
//!          InMemoryKVStore │ RocksDbStore (fleet-runtime)
//! ```
//!
//! ## Key Layout
//!
//! | Prefix | Key | Value |
//! |--------|-----|-------|
//! | `b:` | battery id | Battery JSON |
//! | `s:` | shipment id | Shipment JSON |
//! | `u:` | user id | User JSON |
//! | `ib:` | serialNumber | battery id |
//! | `is:` | shipmentNumber | shipment id |
//! | `iu:` | email | user id |
//!
//! ## Atomicity
//!
//! Every mutation goes through [`EntityStore::transact`]. Staged changes
//! are committed with one `atomic_batch_write`; an error returned from the
//! closure discards them all.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::memory::InMemoryKVStore;
pub use domain::document::Document;
pub use domain::errors::{KVStoreError, StoreError};
pub use domain::keys::KeyPrefix;
pub use ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
pub use service::{EntityStore, UnitOfWork};
