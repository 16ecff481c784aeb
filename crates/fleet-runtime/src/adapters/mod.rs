//! Outbound adapters owned by the runtime.

pub mod storage;
