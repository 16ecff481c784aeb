//! Cross-subsystem integration tests.
//!
//! Every test wires the real services over an in-memory store through
//! [`fleet_runtime::FleetContainer`], so cascades run exactly as they do
//! in `fleetd`.

#[cfg(test)]
mod support;

pub mod http_api;
pub mod properties;
pub mod scenarios;
