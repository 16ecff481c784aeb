//! # Battery Lifecycle (fm-01)
//!
//! Rules for registering, editing, charging and removing fleet batteries.
//!
//! ## Invariants
//!
//! - `healthStatus` and `currentCharge` stay within `[0, 100]` after every
//!   successful operation.
//! - `serialNumber` is unique across the fleet.
//! - Removing a battery first drops it from its owning shipment's
//!   membership list, in the same atomic unit as the removal itself.
//!
//! ## Usage
//!
//! ```ignore
//! use fm_01_battery_lifecycle::{BatteryLifecycleApi, BatteryLifecycleService};
//!
//! let service = BatteryLifecycleService::new(deps);
//! let battery = service.create_battery(new_battery)?;
//! service.update_charge(battery.id, Some(42.0))?;
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::commands::{BatteryPatch, BatteryQuery, NewBattery};
pub use ports::inbound::BatteryLifecycleApi;
pub use service::{BatteryLifecycleDependencies, BatteryLifecycleService};
