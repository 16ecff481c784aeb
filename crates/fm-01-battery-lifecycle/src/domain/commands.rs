//! Inputs accepted by the battery lifecycle.

use super::rules::{require_text, validate_battery};
use fleet_types::{
    Battery, BatteryStatus, CapacityUnit, Chemistry, EntityId, FleetError, Keyword, Timestamp,
    DEFAULT_BATTERY_LOCATION,
};
use serde::Deserialize;

/// Registration request for a new battery.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBattery {
    pub serial_number: String,
    pub model: String,
    pub manufacturer: String,
    pub capacity: f64,
    #[serde(default)]
    pub capacity_unit: Option<CapacityUnit>,
    pub voltage: f64,
    pub chemistry: Chemistry,
    #[serde(deserialize_with = "fleet_types::dates::deserialize")]
    pub manufacture_date: Timestamp,
    #[serde(default)]
    pub status: Option<BatteryStatus>,
    #[serde(default)]
    pub health_status: Option<f64>,
    #[serde(default)]
    pub cycle_count: Option<u32>,
    #[serde(default)]
    pub current_charge: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewBattery {
    /// Build the stored document, filling defaults and checking bounds.
    pub fn into_battery(self, id: EntityId, now: Timestamp) -> Result<Battery, FleetError> {
        let battery = Battery {
            id,
            serial_number: require_text("serialNumber", &self.serial_number)?,
            model: self.model.trim().to_string(),
            manufacturer: self.manufacturer.trim().to_string(),
            capacity: self.capacity,
            capacity_unit: self.capacity_unit.unwrap_or_default(),
            voltage: self.voltage,
            chemistry: self.chemistry,
            manufacture_date: self.manufacture_date,
            status: self.status.unwrap_or_default(),
            health_status: self.health_status.unwrap_or(100.0),
            cycle_count: self.cycle_count.unwrap_or(0),
            last_checked_date: now,
            current_charge: self.current_charge.unwrap_or(100.0),
            location: self
                .location
                .map(|l| l.trim().to_string())
                .unwrap_or_else(|| DEFAULT_BATTERY_LOCATION.to_string()),
            notes: self.notes,
            shipment: None,
            created_at: now,
            updated_at: now,
        };
        validate_battery(&battery)?;
        Ok(battery)
    }
}

/// Partial update. Absent fields keep their value; present fields are
/// applied even when zero or empty, then validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatteryPatch {
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub capacity: Option<f64>,
    pub capacity_unit: Option<CapacityUnit>,
    pub voltage: Option<f64>,
    pub chemistry: Option<Chemistry>,
    #[serde(deserialize_with = "fleet_types::dates::option::deserialize")]
    pub manufacture_date: Option<Timestamp>,
    pub status: Option<BatteryStatus>,
    pub health_status: Option<f64>,
    pub cycle_count: Option<u32>,
    pub current_charge: Option<f64>,
    pub location: Option<String>,
    /// `null` clears the notes.
    #[serde(deserialize_with = "serde_with::rust::double_option::deserialize")]
    pub notes: Option<Option<String>>,
}

impl BatteryPatch {
    /// Serial number the patch would move the battery to, if any.
    pub fn new_serial(&self) -> Option<&str> {
        self.serial_number.as_deref().map(str::trim)
    }

    pub fn apply_to(self, battery: &mut Battery) {
        if let Some(serial) = self.serial_number {
            battery.serial_number = serial.trim().to_string();
        }
        if let Some(model) = self.model {
            battery.model = model.trim().to_string();
        }
        if let Some(manufacturer) = self.manufacturer {
            battery.manufacturer = manufacturer.trim().to_string();
        }
        if let Some(capacity) = self.capacity {
            battery.capacity = capacity;
        }
        if let Some(unit) = self.capacity_unit {
            battery.capacity_unit = unit;
        }
        if let Some(voltage) = self.voltage {
            battery.voltage = voltage;
        }
        if let Some(chemistry) = self.chemistry {
            battery.chemistry = chemistry;
        }
        if let Some(date) = self.manufacture_date {
            battery.manufacture_date = date;
        }
        if let Some(status) = self.status {
            battery.status = status;
        }
        if let Some(health) = self.health_status {
            battery.health_status = health;
        }
        if let Some(cycles) = self.cycle_count {
            battery.cycle_count = cycles;
        }
        if let Some(charge) = self.current_charge {
            battery.current_charge = charge;
        }
        if let Some(location) = self.location {
            battery.location = location.trim().to_string();
        }
        if let Some(notes) = self.notes {
            battery.notes = notes;
        }
    }
}

/// Filters for the paginated battery list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatteryQuery {
    /// Matched against serialNumber, model and manufacturer.
    pub keyword: Option<Keyword>,
    pub status: Option<BatteryStatus>,
    /// Inclusive lower bound on healthStatus.
    pub min_health: Option<f64>,
    /// 1-based page number.
    pub page: u32,
}

impl BatteryQuery {
    pub fn matches(&self, battery: &Battery) -> bool {
        self.keyword.as_ref().map_or(true, |k| {
            k.matches_any(&[
                battery.serial_number.as_str(),
                battery.model.as_str(),
                battery.manufacturer.as_str(),
            ])
        }) && self.status.map_or(true, |s| battery.status == s)
            && self.min_health.map_or(true, |min| battery.health_status >= min)
    }
}
