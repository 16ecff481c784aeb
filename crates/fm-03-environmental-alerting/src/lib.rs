//! # Environmental Alerting (fm-03)
//!
//! Classifies a single sensor reading as safe or alerting.
//!
//! | Kind | Unit | Alert when |
//! |------|------|------------|
//! | temperature | °C | `value < -10` or `value > 45` |
//! | humidity | % RH | `value < 20` or `value > 80` |
//! | shock | g | `magnitude > 5` |
//!
//! Boundary values are safe. A verdict is computed once, when the reading
//! is recorded, and is never revisited.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::reading::ReadingKind;
pub use domain::thresholds::{AlertThresholds, SafeRange};
pub use ports::inbound::AlertEvaluationApi;
pub use service::AlertEvaluator;
