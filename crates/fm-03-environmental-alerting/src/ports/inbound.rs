//! # Inbound Ports (Driving Ports)

use crate::domain::reading::ReadingKind;

/// Classifies environmental readings at insertion time.
pub trait AlertEvaluationApi: Send + Sync {
    /// Whether `value` lies outside the safe range for `kind`.
    fn evaluate(&self, kind: ReadingKind, value: f64) -> bool;
}
