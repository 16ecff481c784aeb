//! # Inbound Ports (Driving Ports)
//!
//! The battery operations exposed to the gateway.

use crate::domain::commands::{BatteryPatch, BatteryQuery, NewBattery};
use fleet_types::{Battery, EntityId, FleetError, Page};

/// Battery lifecycle operations.
pub trait BatteryLifecycleApi: Send + Sync {
    /// Register a battery. Fails with `DuplicateKey` on a taken serial number.
    fn create_battery(&self, input: NewBattery) -> Result<Battery, FleetError>;

    fn get_battery(&self, id: EntityId) -> Result<Battery, FleetError>;

    /// Filtered page of batteries, newest first.
    fn list_batteries(&self, query: &BatteryQuery) -> Result<Page<Battery>, FleetError>;

    /// Apply a partial update and refresh `lastCheckedDate`.
    fn update_battery(&self, id: EntityId, patch: BatteryPatch) -> Result<Battery, FleetError>;

    /// Set `currentCharge`. `None` or a value outside `[0, 100]` is rejected
    /// before the battery is looked up.
    fn update_charge(&self, id: EntityId, value: Option<f64>) -> Result<Battery, FleetError>;

    /// Remove a battery, detaching it from its shipment first.
    fn delete_battery(&self, id: EntityId) -> Result<Battery, FleetError>;

    /// Batteries with health below 30, worst first.
    fn critical_batteries(&self) -> Result<Vec<Battery>, FleetError>;
}
