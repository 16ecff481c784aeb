//! Shipment status state machine.

use fleet_types::{BatteryStatus, FleetError, ShipmentStatus};
use serde::{Deserialize, Serialize};

/// How status changes are vetted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any target status is accepted.
    #[default]
    Permissive,
    /// Only edges of the state machine are accepted.
    Strict,
}

impl TransitionPolicy {
    pub fn check(&self, from: ShipmentStatus, to: ShipmentStatus) -> Result<(), FleetError> {
        match self {
            TransitionPolicy::Permissive => Ok(()),
            TransitionPolicy::Strict if legal_targets(from).contains(&to) => Ok(()),
            TransitionPolicy::Strict => Err(FleetError::InvalidTransition { from, to }),
        }
    }
}

/// Statuses reachable from `from` in one step.
pub fn legal_targets(from: ShipmentStatus) -> &'static [ShipmentStatus] {
    use ShipmentStatus::*;
    match from {
        Preparing => &[InTransit, Cancelled],
        InTransit => &[Delayed, Delivered, Cancelled],
        Delayed => &[InTransit, Delivered, Cancelled],
        Delivered | Cancelled => &[],
    }
}

/// Status member batteries take when their shipment moves to `status`.
pub fn battery_status_for(status: ShipmentStatus) -> BatteryStatus {
    match status {
        ShipmentStatus::Delivered | ShipmentStatus::Cancelled => BatteryStatus::Available,
        _ => BatteryStatus::InTransit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ShipmentStatus::*;

    #[test]
    fn test_terminal_states_have_no_targets() {
        assert!(legal_targets(Delivered).is_empty());
        assert!(legal_targets(Cancelled).is_empty());
    }

    #[test]
    fn test_strict_policy_follows_edges() {
        let strict = TransitionPolicy::Strict;
        assert!(strict.check(Preparing, InTransit).is_ok());
        assert!(strict.check(Delayed, InTransit).is_ok());
        assert_eq!(
            strict.check(Preparing, Delivered),
            Err(FleetError::InvalidTransition {
                from: Preparing,
                to: Delivered
            })
        );
        assert!(strict.check(Delivered, InTransit).is_err());
    }

    #[test]
    fn test_permissive_policy_accepts_everything() {
        for from in ShipmentStatus::ALL {
            for to in ShipmentStatus::ALL {
                assert!(TransitionPolicy::Permissive.check(from, to).is_ok());
            }
        }
    }

    #[test]
    fn test_battery_status_follows_shipment() {
        assert_eq!(battery_status_for(Delivered), BatteryStatus::Available);
        assert_eq!(battery_status_for(Cancelled), BatteryStatus::Available);
        assert_eq!(battery_status_for(Delayed), BatteryStatus::InTransit);
        assert_eq!(battery_status_for(Preparing), BatteryStatus::InTransit);
    }
}
