//! # Fleet Types Crate
//!
//! This crate contains all domain entities, enumerations and the error
//! taxonomy shared by the fleet subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Battery, Shipment and User documents are
//!   defined once here and persisted as-is by the entity store.
//! - **camelCase on the wire**: field names match the REST contract exactly,
//!   so the stored document and the response body are the same shape.
//! - **Bounded state**: enumerations carry their display strings
//!   (`"In Transit"`, `"Li-ion"`) so no free-text status ever reaches storage.

pub mod dates;
pub mod entities;
pub mod errors;
pub mod forms;
pub mod listing;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use listing::{Keyword, Page, PAGE_SIZE};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
