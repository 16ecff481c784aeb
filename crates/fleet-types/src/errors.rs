//! # Error Types
//!
//! The failure taxonomy shared by every lifecycle operation.
//!
//! Each failure is scoped to a single request and never retried
//! automatically; the gateway maps each variant to one HTTP status.

use crate::entities::ShipmentStatus;
use std::fmt;
use thiserror::Error;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Battery,
    Shipment,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Battery => f.write_str("Battery"),
            EntityKind::Shipment => f.write_str("Shipment"),
            EntityKind::User => f.write_str("User"),
        }
    }
}

/// Errors produced by fleet operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    /// Referenced entity id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// Uniqueness violation on serialNumber, shipmentNumber or email.
    #[error("{entity} with {field} '{value}' already exists")]
    DuplicateKey {
        entity: EntityKind,
        field: &'static str,
        value: String,
    },

    /// Malformed or out-of-range input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Status change rejected by the shipment state machine.
    #[error("Illegal shipment transition from {from} to {to}")]
    InvalidTransition {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },

    /// The entity store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl FleetError {
    pub fn not_found(entity: EntityKind, id: impl ToString) -> Self {
        FleetError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity: EntityKind, field: &'static str, value: impl Into<String>) -> Self {
        FleetError::DuplicateKey {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        FleetError::InvalidArgument(message.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            FleetError::NotFound { .. } => "NOT_FOUND",
            FleetError::DuplicateKey { .. } => "DUPLICATE_KEY",
            FleetError::InvalidArgument(_) => "INVALID_ARGUMENT",
            FleetError::InvalidTransition { .. } => "INVALID_TRANSITION",
            FleetError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
