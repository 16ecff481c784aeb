//! Key layout.

use fleet_types::EntityId;

/// Key prefixes for each record family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Battery document: `b:{id}` -> Battery
    Battery,
    /// Shipment document: `s:{id}` -> Shipment
    Shipment,
    /// User document: `u:{id}` -> User
    User,
    /// Serial number index: `ib:{serialNumber}` -> battery id
    BatterySerial,
    /// Shipment number index: `is:{shipmentNumber}` -> shipment id
    ShipmentNumber,
    /// Email index: `iu:{email}` -> user id
    UserEmail,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Battery => b"b:",
            KeyPrefix::Shipment => b"s:",
            KeyPrefix::User => b"u:",
            KeyPrefix::BatterySerial => b"ib:",
            KeyPrefix::ShipmentNumber => b"is:",
            KeyPrefix::UserEmail => b"iu:",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    /// Build a document key from an entity id.
    pub fn id_key(&self, id: &EntityId) -> Vec<u8> {
        self.key(id.to_string().as_bytes())
    }
}
