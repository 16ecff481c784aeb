//! # Inbound Ports (Driving Ports)
//!
//! The shipment operations exposed to the gateway. `actor` is the
//! authenticated caller, recorded as `updatedBy` in the audit trail.

use crate::domain::commands::{
    EnvironmentalLogRequest, LoggedReading, NewShipment, ShipmentPatch, ShipmentQuery,
    ShipmentUpdate,
};
use fleet_types::{EntityId, FleetError, Page, Shipment};

/// Shipment lifecycle operations.
pub trait ShipmentLifecycleApi: Send + Sync {
    /// Create in `Preparing`, seed the audit trail and attach batteries.
    fn create_shipment(
        &self,
        input: NewShipment,
        actor: Option<EntityId>,
    ) -> Result<Shipment, FleetError>;

    fn get_shipment(&self, id: EntityId) -> Result<Shipment, FleetError>;

    /// Filtered page of shipments, newest first.
    fn list_shipments(&self, query: &ShipmentQuery) -> Result<Page<Shipment>, FleetError>;

    /// Partial update with status transition and membership cascades.
    fn update_shipment(
        &self,
        id: EntityId,
        patch: ShipmentPatch,
        actor: Option<EntityId>,
    ) -> Result<ShipmentUpdate, FleetError>;

    /// Detach every member battery, then remove the shipment.
    fn delete_shipment(&self, id: EntityId) -> Result<Shipment, FleetError>;

    /// Evaluate and append one environmental reading.
    fn add_environmental_log(
        &self,
        id: EntityId,
        request: EnvironmentalLogRequest,
    ) -> Result<LoggedReading, FleetError>;

    /// Active shipments with at least one flagged reading, most recently
    /// modified first.
    fn shipments_with_active_alerts(&self) -> Result<Vec<Shipment>, FleetError>;
}
