//! Storage adapters.
//!
//! Production: `RocksDbStore` (fleet-runtime/adapters/storage/rocksdb_adapter.rs)
//! Testing and ephemeral deployments: [`memory::InMemoryKVStore`]

pub mod memory;
