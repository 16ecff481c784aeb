//! # Core Domain Entities
//!
//! Battery, Shipment and User documents plus the enumerations they carry.
//!
//! Every enumeration serializes to the exact label used by the REST contract
//! and parses back from it (`FromStr`), so query parameters and stored
//! documents share one vocabulary.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Server-assigned identifier of any stored entity.
pub type EntityId = Uuid;

/// Wall-clock instant, always UTC.
pub type Timestamp = DateTime<Utc>;

/// Health below this value marks a battery as critical.
pub const CRITICAL_HEALTH_THRESHOLD: f64 = 30.0;

/// Default location of a freshly registered battery.
pub const DEFAULT_BATTERY_LOCATION: &str = "Warehouse";

/// Default hazard class for lithium battery consignments (UN Class 9).
pub const DEFAULT_HAZARD_CLASS: &str = "Class 9";

/// Generate a fresh entity identifier.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Error returned when a label does not name a known enumeration variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Operational status of a battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BatteryStatus {
    #[default]
    Available,
    #[serde(rename = "In Transit")]
    InTransit,
    Installed,
    Maintenance,
    Defective,
}

impl BatteryStatus {
    pub const ALL: [BatteryStatus; 5] = [
        BatteryStatus::Available,
        BatteryStatus::InTransit,
        BatteryStatus::Installed,
        BatteryStatus::Maintenance,
        BatteryStatus::Defective,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryStatus::Available => "Available",
            BatteryStatus::InTransit => "In Transit",
            BatteryStatus::Installed => "Installed",
            BatteryStatus::Maintenance => "Maintenance",
            BatteryStatus::Defective => "Defective",
        }
    }
}

impl fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatteryStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "battery status",
                value: s.to_string(),
            })
    }
}

/// Lifecycle status of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShipmentStatus {
    #[default]
    Preparing,
    #[serde(rename = "In Transit")]
    InTransit,
    Delayed,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 5] = [
        ShipmentStatus::Preparing,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delayed,
        ShipmentStatus::Delivered,
        ShipmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Preparing => "Preparing",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delayed => "Delayed",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Cancelled => "Cancelled",
        }
    }

    /// A shipment that has not yet been delivered or cancelled.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ShipmentStatus::Preparing | ShipmentStatus::InTransit | ShipmentStatus::Delayed
        )
    }

    /// Delivered and Cancelled accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "shipment status",
                value: s.to_string(),
            })
    }
}

/// Cell chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chemistry {
    #[serde(rename = "Li-ion")]
    LithiumIon,
    #[serde(rename = "LiFePO4")]
    LithiumIronPhosphate,
    #[serde(rename = "Lead-Acid")]
    LeadAcid,
    #[serde(rename = "NiMH")]
    NickelMetalHydride,
    #[serde(rename = "NiCd")]
    NickelCadmium,
    Other,
}

impl Chemistry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chemistry::LithiumIon => "Li-ion",
            Chemistry::LithiumIronPhosphate => "LiFePO4",
            Chemistry::LeadAcid => "Lead-Acid",
            Chemistry::NickelMetalHydride => "NiMH",
            Chemistry::NickelCadmium => "NiCd",
            Chemistry::Other => "Other",
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit the `capacity` figure is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CapacityUnit {
    #[serde(rename = "mAh")]
    MilliampHours,
    #[default]
    #[serde(rename = "Wh")]
    WattHours,
}

/// Role of an authenticated user, ordered by privilege.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Operator,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "operator",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator" => Ok(Role::Operator),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// BATTERY
// =============================================================================

/// A tracked battery unit.
///
/// `serial_number` is unique across the fleet. `health_status` and
/// `current_charge` are percentages and always lie in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battery {
    pub id: EntityId,
    pub serial_number: String,
    pub model: String,
    pub manufacturer: String,
    pub capacity: f64,
    pub capacity_unit: CapacityUnit,
    pub voltage: f64,
    pub chemistry: Chemistry,
    pub manufacture_date: Timestamp,
    pub status: BatteryStatus,
    pub health_status: f64,
    pub cycle_count: u32,
    pub last_checked_date: Timestamp,
    pub current_charge: f64,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Owning shipment, if the battery is currently part of one.
    #[serde(default)]
    pub shipment: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Battery {
    pub fn is_critical(&self) -> bool {
        self.health_status < CRITICAL_HEALTH_THRESHOLD
    }

    /// Whole years elapsed since manufacture.
    pub fn age_years(&self, now: Timestamp) -> i32 {
        let mut years = now.year() - self.manufacture_date.year();
        if (now.month(), now.day()) < (self.manufacture_date.month(), self.manufacture_date.day())
        {
            years -= 1;
        }
        years.max(0)
    }

    /// Join a shipment: the battery travels with it from `location`.
    pub fn attach_to(&mut self, shipment: EntityId, location: &str, now: Timestamp) {
        self.shipment = Some(shipment);
        self.status = BatteryStatus::InTransit;
        self.location = location.to_string();
        self.updated_at = now;
    }

    /// Leave the owning shipment and become available at `location`.
    pub fn detach(&mut self, location: &str, now: Timestamp) {
        self.shipment = None;
        self.status = BatteryStatus::Available;
        self.location = location.to_string();
        self.updated_at = now;
    }

    /// Follow the owning shipment's status and position.
    pub fn follow(&mut self, status: BatteryStatus, location: &str, now: Timestamp) {
        self.status = status;
        self.location = location.to_string();
        self.updated_at = now;
    }
}

// =============================================================================
// SHIPMENT
// =============================================================================

/// A temperature or humidity sample. `is_alert` is fixed at insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub value: f64,
    pub timestamp: Timestamp,
    pub is_alert: bool,
}

/// A recorded shock. `is_alert` is fixed at insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShockEvent {
    pub magnitude: f64,
    pub timestamp: Timestamp,
    pub is_alert: bool,
}

/// One entry of a shipment's append-only audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ShipmentStatus,
    pub timestamp: Timestamp,
    pub location: String,
    pub notes: String,
    #[serde(default)]
    pub updated_by: Option<EntityId>,
}

/// A consignment of batteries moving between two sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: EntityId,
    pub shipment_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: Timestamp,
    pub estimated_arrival: Timestamp,
    #[serde(default)]
    pub actual_arrival: Option<Timestamp>,
    pub status: ShipmentStatus,
    pub carrier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    /// Member batteries in the order they were supplied.
    #[serde(default)]
    pub batteries: Vec<EntityId>,
    pub current_location: String,
    #[serde(default)]
    pub temperature_logs: Vec<SensorReading>,
    #[serde(default)]
    pub humidity_logs: Vec<SensorReading>,
    #[serde(default)]
    pub shock_events: Vec<ShockEvent>,
    #[serde(default)]
    pub status_updates: Vec<StatusUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub hazard_class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_information: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Shipment {
    pub fn battery_count(&self) -> usize {
        self.batteries.len()
    }

    pub fn contains_battery(&self, battery: &EntityId) -> bool {
        self.batteries.contains(battery)
    }

    /// Remove exactly `battery` from the membership list.
    ///
    /// Returns whether it was present.
    pub fn remove_battery(&mut self, battery: &EntityId) -> bool {
        let before = self.batteries.len();
        self.batteries.retain(|id| id != battery);
        self.batteries.len() != before
    }

    /// Number of flagged entries across all three sensor collections.
    pub fn alert_count(&self) -> usize {
        self.temperature_logs.iter().filter(|r| r.is_alert).count()
            + self.humidity_logs.iter().filter(|r| r.is_alert).count()
            + self.shock_events.iter().filter(|e| e.is_alert).count()
    }

    /// Still moving and at least one reading was flagged.
    pub fn has_active_alert(&self) -> bool {
        self.status.is_active() && self.alert_count() > 0
    }

    /// Whole days between departure and estimated arrival.
    pub fn duration_days(&self) -> i64 {
        (self.estimated_arrival - self.departure_date).num_days()
    }
}

// =============================================================================
// USER
// =============================================================================

/// A person who can act on the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: String,
    /// Unique, stored lowercase.
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
