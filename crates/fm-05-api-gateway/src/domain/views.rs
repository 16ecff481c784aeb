//! Response bodies.
//!
//! Stored documents carry references as bare ids. Detail reads replace
//! them with small summaries of the referenced entity. List reads only
//! expand the shipment assignee and keep every other id. A reference whose
//! target is gone is rendered as the bare id.

use fleet_types::{
    Battery, BatteryStatus, CapacityUnit, Chemistry, EntityId, Page, SensorReading, Shipment,
    ShipmentStatus, ShockEvent, StatusUpdate, Timestamp, User,
};
use fm_02_shipment_lifecycle::{LogEntry, LoggedReading};
use serde::Serialize;

/// Shipment reference embedded in a battery detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRef {
    pub id: EntityId,
    pub shipment_number: String,
    pub status: ShipmentStatus,
}

impl From<&Shipment> for ShipmentRef {
    fn from(shipment: &Shipment) -> Self {
        Self {
            id: shipment.id,
            shipment_number: shipment.shipment_number.clone(),
            status: shipment.status,
        }
    }
}

/// Battery summary embedded in a shipment detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySummary {
    pub id: EntityId,
    pub serial_number: String,
    pub model: String,
    pub manufacturer: String,
    pub status: BatteryStatus,
    pub health_status: f64,
    pub current_charge: f64,
}

impl From<&Battery> for BatterySummary {
    fn from(battery: &Battery) -> Self {
        Self {
            id: battery.id,
            serial_number: battery.serial_number.clone(),
            model: battery.model.clone(),
            manufacturer: battery.manufacturer.clone(),
            status: battery.status,
            health_status: battery.health_status,
            current_charge: battery.current_charge,
        }
    }
}

/// User embedded in a shipment as assignee or audit author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRef {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A reference that is either a bare id or a populated summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Link<T> {
    Id(EntityId),
    Populated(T),
}

// =============================================================================
// BATTERIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryView {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub shipment: Option<Link<ShipmentRef>>,
    /// Whole years since manufacture.
    pub age_years: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BatteryView {
    pub fn new(battery: Battery, now: Timestamp) -> Self {
        let age_years = battery.age_years(now);
        Self {
            id: battery.id,
            serial_number: battery.serial_number,
            model: battery.model,
            manufacturer: battery.manufacturer,
            capacity: battery.capacity,
            capacity_unit: battery.capacity_unit,
            voltage: battery.voltage,
            chemistry: battery.chemistry,
            manufacture_date: battery.manufacture_date,
            status: battery.status,
            health_status: battery.health_status,
            cycle_count: battery.cycle_count,
            last_checked_date: battery.last_checked_date,
            current_charge: battery.current_charge,
            location: battery.location,
            notes: battery.notes,
            shipment: battery.shipment.map(Link::Id),
            age_years,
            created_at: battery.created_at,
            updated_at: battery.updated_at,
        }
    }

    pub fn with_shipment(mut self, shipment: Option<&Shipment>) -> Self {
        if let Some(shipment) = shipment {
            self.shipment = Some(Link::Populated(ShipmentRef::from(shipment)));
        }
        self
    }
}

/// One page of batteries.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryPage {
    pub batteries: Vec<BatteryView>,
    pub page: u32,
    pub pages: u32,
    pub total: usize,
}

impl BatteryPage {
    pub fn new(page: Page<Battery>, now: Timestamp) -> Self {
        let page = page.map(|b| BatteryView::new(b, now));
        Self {
            batteries: page.items,
            page: page.page,
            pages: page.pages,
            total: page.total,
        }
    }
}

// =============================================================================
// SHIPMENTS
// =============================================================================

/// Audit trail entry with its author as a link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateView {
    pub status: ShipmentStatus,
    pub timestamp: Timestamp,
    pub location: String,
    pub notes: String,
    pub updated_by: Option<Link<UserRef>>,
}

impl From<StatusUpdate> for StatusUpdateView {
    fn from(entry: StatusUpdate) -> Self {
        Self {
            status: entry.status,
            timestamp: entry.timestamp,
            location: entry.location,
            notes: entry.notes,
            updated_by: entry.updated_by.map(Link::Id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentView {
    pub id: EntityId,
    pub shipment_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: Timestamp,
    pub estimated_arrival: Timestamp,
    pub actual_arrival: Option<Timestamp>,
    pub status: ShipmentStatus,
    pub carrier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub batteries: Vec<Link<BatterySummary>>,
    pub battery_count: usize,
    pub current_location: String,
    pub temperature_logs: Vec<SensorReading>,
    pub humidity_logs: Vec<SensorReading>,
    pub shock_events: Vec<ShockEvent>,
    pub status_updates: Vec<StatusUpdateView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub hazard_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs_information: Option<String>,
    pub assigned_to: Option<Link<UserRef>>,
    /// Whole days between departure and estimated arrival.
    pub duration_days: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Shipment> for ShipmentView {
    fn from(shipment: Shipment) -> Self {
        let battery_count = shipment.battery_count();
        let duration_days = shipment.duration_days();
        Self {
            id: shipment.id,
            shipment_number: shipment.shipment_number,
            origin: shipment.origin,
            destination: shipment.destination,
            departure_date: shipment.departure_date,
            estimated_arrival: shipment.estimated_arrival,
            actual_arrival: shipment.actual_arrival,
            status: shipment.status,
            carrier: shipment.carrier,
            tracking_number: shipment.tracking_number,
            batteries: shipment.batteries.into_iter().map(Link::Id).collect(),
            battery_count,
            current_location: shipment.current_location,
            temperature_logs: shipment.temperature_logs,
            humidity_logs: shipment.humidity_logs,
            shock_events: shipment.shock_events,
            status_updates: shipment
                .status_updates
                .into_iter()
                .map(StatusUpdateView::from)
                .collect(),
            special_instructions: shipment.special_instructions,
            hazard_class: shipment.hazard_class,
            customs_information: shipment.customs_information,
            assigned_to: shipment.assigned_to.map(Link::Id),
            duration_days,
            created_at: shipment.created_at,
            updated_at: shipment.updated_at,
        }
    }
}

impl ShipmentView {
    /// Replace member ids with summaries where `lookup` finds the battery.
    pub fn populate_batteries(mut self, lookup: impl Fn(EntityId) -> Option<Battery>) -> Self {
        for link in &mut self.batteries {
            if let Link::Id(id) = link {
                if let Some(battery) = lookup(*id) {
                    *link = Link::Populated(BatterySummary::from(&battery));
                }
            }
        }
        self
    }

    pub fn with_assignee(mut self, user: Option<&User>) -> Self {
        if let Some(user) = user {
            self.assigned_to = Some(Link::Populated(UserRef::from(user)));
        }
        self
    }

    /// Replace audit author ids with summaries where `lookup` finds the user.
    pub fn populate_authors(mut self, lookup: impl Fn(EntityId) -> Option<User>) -> Self {
        for entry in &mut self.status_updates {
            if let Some(Link::Id(id)) = entry.updated_by {
                if let Some(user) = lookup(id) {
                    entry.updated_by = Some(Link::Populated(UserRef::from(&user)));
                }
            }
        }
        self
    }
}

/// One page of shipments.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentPage {
    pub shipments: Vec<ShipmentView>,
    pub page: u32,
    pub pages: u32,
    pub total: usize,
}

impl From<Page<ShipmentView>> for ShipmentPage {
    fn from(page: Page<ShipmentView>) -> Self {
        Self {
            shipments: page.items,
            page: page.page,
            pages: page.pages,
            total: page.total,
        }
    }
}

/// Row of the active-alerts listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub id: EntityId,
    pub shipment_number: String,
    pub status: ShipmentStatus,
    pub current_location: String,
    pub carrier: String,
    pub alert_count: usize,
    pub updated_at: Timestamp,
}

impl From<&Shipment> for AlertSummary {
    fn from(shipment: &Shipment) -> Self {
        Self {
            id: shipment.id,
            shipment_number: shipment.shipment_number.clone(),
            status: shipment.status,
            current_location: shipment.current_location.clone(),
            carrier: shipment.carrier.clone(),
            alert_count: shipment.alert_count(),
            updated_at: shipment.updated_at,
        }
    }
}

/// Body returned after an environmental reading is appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResponse {
    pub message: String,
    pub log: LogEntry,
    pub is_alert: bool,
}

impl From<LoggedReading> for LogResponse {
    fn from(logged: LoggedReading) -> Self {
        Self {
            message: format!("{} log added", logged.kind),
            log: logged.entry,
            is_alert: logged.is_alert,
        }
    }
}

/// Body returned by deletes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Removed {
    pub message: String,
    pub id: EntityId,
}

impl Removed {
    pub fn new(what: &str, id: EntityId) -> Self {
        Self {
            message: format!("{what} removed"),
            id,
        }
    }
}
