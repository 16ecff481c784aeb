//! Inputs and results of the shipment lifecycle.

use super::membership::dedupe;
use super::rules::validate_shipment;
use fleet_types::{
    EntityId, FleetError, Keyword, SensorReading, Shipment, ShipmentStatus, ShockEvent,
    StatusUpdate, Timestamp, DEFAULT_HAZARD_CLASS,
};
use fm_03_environmental_alerting::ReadingKind;
use serde::{Deserialize, Serialize};

/// Creation request for a shipment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    pub shipment_number: String,
    pub origin: String,
    pub destination: String,
    #[serde(deserialize_with = "fleet_types::dates::deserialize")]
    pub departure_date: Timestamp,
    #[serde(deserialize_with = "fleet_types::dates::deserialize")]
    pub estimated_arrival: Timestamp,
    pub carrier: String,
    #[serde(default, deserialize_with = "fleet_types::forms::optional")]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub batteries: Vec<EntityId>,
    #[serde(default, deserialize_with = "fleet_types::forms::optional")]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub hazard_class: Option<String>,
    #[serde(default, deserialize_with = "fleet_types::forms::optional")]
    pub customs_information: Option<String>,
    #[serde(default, deserialize_with = "fleet_types::forms::optional")]
    pub assigned_to: Option<EntityId>,
}

impl NewShipment {
    /// Build the stored document: `Preparing` at origin with one audit entry.
    pub fn into_shipment(
        self,
        id: EntityId,
        now: Timestamp,
        actor: Option<EntityId>,
    ) -> Result<Shipment, FleetError> {
        let origin = self.origin.trim().to_string();
        let shipment = Shipment {
            id,
            shipment_number: self.shipment_number.trim().to_string(),
            destination: self.destination.trim().to_string(),
            departure_date: self.departure_date,
            estimated_arrival: self.estimated_arrival,
            actual_arrival: None,
            status: ShipmentStatus::Preparing,
            carrier: self.carrier.trim().to_string(),
            tracking_number: self.tracking_number,
            batteries: dedupe(self.batteries),
            current_location: origin.clone(),
            temperature_logs: Vec::new(),
            humidity_logs: Vec::new(),
            shock_events: Vec::new(),
            status_updates: vec![StatusUpdate {
                status: ShipmentStatus::Preparing,
                timestamp: now,
                location: origin.clone(),
                notes: "Shipment created".to_string(),
                updated_by: actor,
            }],
            special_instructions: self.special_instructions,
            hazard_class: self
                .hazard_class
                .map(|h| h.trim().to_string())
                .unwrap_or_else(|| DEFAULT_HAZARD_CLASS.to_string()),
            customs_information: self.customs_information,
            assigned_to: self.assigned_to,
            origin,
            created_at: now,
            updated_at: now,
        };
        validate_shipment(&shipment)?;
        Ok(shipment)
    }
}

/// Partial update. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipmentPatch {
    pub shipment_number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(deserialize_with = "fleet_types::dates::option::deserialize")]
    pub departure_date: Option<Timestamp>,
    #[serde(deserialize_with = "fleet_types::dates::option::deserialize")]
    pub estimated_arrival: Option<Timestamp>,
    /// A value different from the current status triggers a transition.
    pub status: Option<ShipmentStatus>,
    pub current_location: Option<String>,
    /// Audit note for the transition; defaults to "Status changed to X".
    pub status_notes: Option<String>,
    pub carrier: Option<String>,
    #[serde(deserialize_with = "fleet_types::forms::clearable")]
    pub tracking_number: Option<Option<String>>,
    /// Replaces the membership list when present.
    pub batteries: Option<Vec<EntityId>>,
    #[serde(deserialize_with = "fleet_types::forms::clearable")]
    pub special_instructions: Option<Option<String>>,
    pub hazard_class: Option<String>,
    #[serde(deserialize_with = "fleet_types::forms::clearable")]
    pub customs_information: Option<Option<String>>,
    #[serde(deserialize_with = "fleet_types::forms::clearable")]
    pub assigned_to: Option<Option<EntityId>>,
}

impl ShipmentPatch {
    pub fn new_number(&self) -> Option<&str> {
        self.shipment_number.as_deref().map(str::trim)
    }

    /// Apply descriptive fields. Status, location and membership are
    /// handled by the service because they cascade.
    pub fn apply_details(&mut self, shipment: &mut Shipment) {
        if let Some(number) = self.shipment_number.take() {
            shipment.shipment_number = number.trim().to_string();
        }
        if let Some(origin) = self.origin.take() {
            shipment.origin = origin.trim().to_string();
        }
        if let Some(destination) = self.destination.take() {
            shipment.destination = destination.trim().to_string();
        }
        if let Some(date) = self.departure_date.take() {
            shipment.departure_date = date;
        }
        if let Some(date) = self.estimated_arrival.take() {
            shipment.estimated_arrival = date;
        }
        if let Some(carrier) = self.carrier.take() {
            shipment.carrier = carrier.trim().to_string();
        }
        if let Some(tracking) = self.tracking_number.take() {
            shipment.tracking_number = tracking;
        }
        if let Some(instructions) = self.special_instructions.take() {
            shipment.special_instructions = instructions;
        }
        if let Some(hazard) = self.hazard_class.take() {
            shipment.hazard_class = hazard.trim().to_string();
        }
        if let Some(customs) = self.customs_information.take() {
            shipment.customs_information = customs;
        }
        if let Some(assignee) = self.assigned_to.take() {
            shipment.assigned_to = assignee;
        }
    }
}

/// A status change applied by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: ShipmentStatus,
    pub to: ShipmentStatus,
}

/// Result of a partial update: the stored shipment and the status change
/// it applied, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentUpdate {
    pub shipment: Shipment,
    pub transition: Option<StatusTransition>,
}

/// Filters for the paginated shipment list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipmentQuery {
    /// Matched against shipmentNumber, origin, destination and carrier.
    pub keyword: Option<Keyword>,
    pub status: Option<ShipmentStatus>,
    /// 1-based page number.
    pub page: u32,
}

impl ShipmentQuery {
    pub fn matches(&self, shipment: &Shipment) -> bool {
        self.keyword.as_ref().map_or(true, |k| {
            k.matches_any(&[
                shipment.shipment_number.as_str(),
                shipment.origin.as_str(),
                shipment.destination.as_str(),
                shipment.carrier.as_str(),
            ])
        }) && self.status.map_or(true, |s| shipment.status == s)
    }
}

/// An environmental reading submitted for a shipment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentalLogRequest {
    /// `temperature`, `humidity` or `shock`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<f64>,
    #[serde(deserialize_with = "fleet_types::dates::option::deserialize")]
    pub timestamp: Option<Timestamp>,
}

impl EnvironmentalLogRequest {
    /// Check kind and value before any lookup happens.
    pub fn validate(&self) -> Result<(ReadingKind, f64), FleetError> {
        let kind = self
            .kind
            .as_deref()
            .ok_or_else(|| FleetError::invalid("log type is required"))?
            .parse::<ReadingKind>()?;
        let value = self
            .value
            .ok_or_else(|| FleetError::invalid("log value is required"))?;
        if !value.is_finite() {
            return Err(FleetError::invalid("log value must be a finite number"));
        }
        Ok((kind, value))
    }
}

/// The entry appended by an environmental log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogEntry {
    Reading(SensorReading),
    Shock(ShockEvent),
}

/// Result of appending an environmental reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedReading {
    pub kind: ReadingKind,
    pub entry: LogEntry,
    pub is_alert: bool,
}
