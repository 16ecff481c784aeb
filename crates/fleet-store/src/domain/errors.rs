//! Store error types.

use fleet_types::{EntityKind, FleetError};
use thiserror::Error;

/// Key-value backend errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },
    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Errors raised by the document layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] KVStoreError),

    /// A document could not be encoded for storage.
    #[error("Failed to encode {kind} document: {message}")]
    Encode { kind: EntityKind, message: String },

    /// A stored document or index entry could not be decoded.
    #[error("Corrupt {kind} record: {message}")]
    Decode { kind: EntityKind, message: String },

    /// A unique index already maps the value to a different entity.
    #[error("{kind} {field} '{value}' is already taken")]
    UniqueViolation {
        kind: EntityKind,
        field: &'static str,
        value: String,
    },
}

impl From<StoreError> for FleetError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { kind, field, value } => FleetError::DuplicateKey {
                entity: kind,
                field,
                value,
            },
            other => FleetError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_maps_to_duplicate_key() {
        let err = StoreError::UniqueViolation {
            kind: EntityKind::Shipment,
            field: "shipmentNumber",
            value: "SHP-1".into(),
        };
        assert_eq!(
            FleetError::from(err),
            FleetError::duplicate(EntityKind::Shipment, "shipmentNumber", "SHP-1")
        );
    }

    #[test]
    fn test_backend_failure_maps_to_storage() {
        let err = StoreError::from(KVStoreError::IOError {
            message: "disk gone".into(),
        });
        assert!(matches!(FleetError::from(err), FleetError::Storage(m) if m.contains("disk gone")));
    }
}
