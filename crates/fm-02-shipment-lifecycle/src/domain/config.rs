use super::transitions::TransitionPolicy;
use serde::{Deserialize, Serialize};

/// Shipment lifecycle settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentLifecycleConfig {
    /// Reject status changes that are not edges of the state machine.
    pub strict_transitions: bool,
}

impl ShipmentLifecycleConfig {
    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.strict_transitions {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        }
    }
}
