//! # Shipment Lifecycle (fm-02)
//!
//! Owns the shipment state machine and keeps member batteries consistent
//! with it.
//!
//! ## State Machine
//!
//! ```text
//! Preparing ──► In Transit ──► Delivered
//!     │           │    ▲
//!     │           ▼    │
//!     │          Delayed ─────► Delivered
//!     │           │
//!     └───────────┴──────────► Cancelled
//! ```
//!
//! Delivered and Cancelled are terminal. Legality is only enforced when
//! the service runs with [`TransitionPolicy::Strict`]; the default
//! [`TransitionPolicy::Permissive`] accepts any target as a manual override.
//!
//! ## Cascades
//!
//! | Trigger | Effect on batteries |
//! |---------|---------------------|
//! | create with batteries | attached: `In Transit` at origin |
//! | status change | members follow: `Available` when Delivered/Cancelled, else `In Transit`; location = shipment location |
//! | membership change | removed: detached, `Available`; added: attached, `In Transit` |
//! | delete | all members detached, `Available` |
//!
//! Each operation, cascade included, commits as one atomic unit of work.
//! Every status change appends exactly one audit entry; every environmental
//! reading appends exactly one log entry whose alert flag never changes.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::commands::{
    EnvironmentalLogRequest, LogEntry, LoggedReading, NewShipment, ShipmentPatch, ShipmentQuery,
    ShipmentUpdate, StatusTransition,
};
pub use domain::config::ShipmentLifecycleConfig;
pub use domain::transitions::{battery_status_for, legal_targets, TransitionPolicy};
pub use ports::inbound::ShipmentLifecycleApi;
pub use service::{ShipmentLifecycleDependencies, ShipmentLifecycleService};
