//! # Cross-Subsystem Properties
//!
//! Invariants that must hold for any sequence of operations, not just the
//! hand-picked scenarios:
//!
//! - A battery and its shipment always agree on membership, and no battery
//!   belongs to two shipments.
//! - Charge never leaves `[0, 100]`, whatever the client sends.
//! - Appending a reading never rewrites an earlier one.

#[cfg(test)]
mod tests {
    use crate::integration::support::TestFleet;
    use fleet_types::{Battery, Shipment};
    use fm_02_shipment_lifecycle::{EnvironmentalLogRequest, ShipmentPatch};
    use proptest::prelude::*;

    const KINDS: [&str; 3] = ["temperature", "humidity", "shock"];

    fn assert_membership_consistent(batteries: &[Battery], shipments: &[Shipment]) {
        for battery in batteries {
            let owners: Vec<_> = shipments
                .iter()
                .filter(|s| s.contains_battery(&battery.id))
                .map(|s| s.id)
                .collect();
            assert!(owners.len() <= 1, "battery in {} shipments", owners.len());
            assert_eq!(battery.shipment, owners.first().copied());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_membership_stays_consistent(
            ops in prop::collection::vec((0usize..2, 0u8..16), 1..12)
        ) {
            let fleet = TestFleet::new();
            let batteries: Vec<_> = (0..4)
                .map(|n| fleet.battery(&format!("BAT-{n}")).id)
                .collect();
            let shipments = [fleet.shipment("SHP-A", &[]).id, fleet.shipment("SHP-B", &[]).id];

            for (target, mask) in ops {
                let members: Vec<_> = batteries
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, id)| *id)
                    .collect();
                fleet
                    .container
                    .state
                    .shipments
                    .update_shipment(
                        shipments[target],
                        ShipmentPatch {
                            batteries: Some(members.clone()),
                            ..Default::default()
                        },
                        None,
                    )
                    .unwrap();

                let stored_batteries: Vec<_> = batteries
                    .iter()
                    .map(|id| fleet.container.state.batteries.get_battery(*id).unwrap())
                    .collect();
                let stored_shipments: Vec<_> = shipments
                    .iter()
                    .map(|id| fleet.container.state.shipments.get_shipment(*id).unwrap())
                    .collect();
                prop_assert_eq!(&stored_shipments[target].batteries, &members);
                assert_membership_consistent(&stored_batteries, &stored_shipments);
            }
        }

        #[test]
        fn prop_charge_stays_in_bounds(values in prop::collection::vec(-50.0f64..150.0, 1..10)) {
            let fleet = TestFleet::new();
            let id = fleet.battery("BAT-1").id;

            let mut expected = 100.0;
            for value in values {
                let result = fleet.container.state.batteries.update_charge(id, Some(value));
                if (0.0..=100.0).contains(&value) {
                    prop_assert!(result.is_ok());
                    expected = value;
                } else {
                    prop_assert!(result.is_err());
                }
                let stored = fleet.container.state.batteries.get_battery(id).unwrap();
                prop_assert_eq!(stored.current_charge, expected);
            }
        }

        #[test]
        fn prop_readings_are_append_only(
            readings in prop::collection::vec((0usize..3, -40.0f64..120.0), 1..16)
        ) {
            let fleet = TestFleet::new();
            let id = fleet.shipment("SHP-1", &[]).id;
            let shipments = &fleet.container.state.shipments;

            for (kind, value) in readings {
                let before = shipments.get_shipment(id).unwrap();
                shipments
                    .add_environmental_log(
                        id,
                        EnvironmentalLogRequest {
                            kind: Some(KINDS[kind].to_string()),
                            value: Some(value),
                            timestamp: None,
                        },
                    )
                    .unwrap();
                let after = shipments.get_shipment(id).unwrap();

                prop_assert!(after.temperature_logs.starts_with(&before.temperature_logs));
                prop_assert!(after.humidity_logs.starts_with(&before.humidity_logs));
                prop_assert!(after.shock_events.starts_with(&before.shock_events));
                prop_assert_eq!(
                    after.temperature_logs.len()
                        + after.humidity_logs.len()
                        + after.shock_events.len(),
                    before.temperature_logs.len()
                        + before.humidity_logs.len()
                        + before.shock_events.len()
                        + 1
                );
            }
        }
    }
}
