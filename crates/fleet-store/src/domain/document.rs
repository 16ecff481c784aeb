//! Stored document families.

use crate::domain::keys::KeyPrefix;
use fleet_types::{Battery, EntityId, EntityKind, Shipment, User};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A JSON document with one unique secondary key.
pub trait Document: Serialize + DeserializeOwned {
    const KIND: EntityKind;
    const PREFIX: KeyPrefix;
    const UNIQUE_INDEX: KeyPrefix;
    /// Wire name of the unique field, reported on collisions.
    const UNIQUE_FIELD: &'static str;

    fn id(&self) -> EntityId;
    fn unique_value(&self) -> &str;
}

impl Document for Battery {
    const KIND: EntityKind = EntityKind::Battery;
    const PREFIX: KeyPrefix = KeyPrefix::Battery;
    const UNIQUE_INDEX: KeyPrefix = KeyPrefix::BatterySerial;
    const UNIQUE_FIELD: &'static str = "serialNumber";

    fn id(&self) -> EntityId {
        self.id
    }

    fn unique_value(&self) -> &str {
        &self.serial_number
    }
}

impl Document for Shipment {
    const KIND: EntityKind = EntityKind::Shipment;
    const PREFIX: KeyPrefix = KeyPrefix::Shipment;
    const UNIQUE_INDEX: KeyPrefix = KeyPrefix::ShipmentNumber;
    const UNIQUE_FIELD: &'static str = "shipmentNumber";

    fn id(&self) -> EntityId {
        self.id
    }

    fn unique_value(&self) -> &str {
        &self.shipment_number
    }
}

impl Document for User {
    const KIND: EntityKind = EntityKind::User;
    const PREFIX: KeyPrefix = KeyPrefix::User;
    const UNIQUE_INDEX: KeyPrefix = KeyPrefix::UserEmail;
    const UNIQUE_FIELD: &'static str = "email";

    fn id(&self) -> EntityId {
        self.id
    }

    fn unique_value(&self) -> &str {
        &self.email
    }
}
