//! # Production Storage Adapters
//!
//! Enable the `rocksdb` feature to persist the entity store:
//!
//! ```toml
//! fleet-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! Documents and unique indexes share one keyspace; the entity store keeps
//! them apart with key prefixes, so a single column family is enough.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

pub use fleet_store::InMemoryKVStore;
