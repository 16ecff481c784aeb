//! # Fleet Lifecycle Scenarios
//!
//! End-to-end flows through the inbound ports of the wired services:
//!
//! ```text
//! register battery → create shipment → log readings → deliver
//!        ↑                  │                              │
//!        └── detach ◄───────┴──── membership / delete ◄────┘
//! ```
//!
//! Each scenario asserts on both sides of a cascade: the shipment document
//! and every battery it touched.

#[cfg(test)]
mod tests {
    use crate::integration::support::{new_battery, new_shipment, TestFleet};
    use chrono::Duration;
    use fleet_types::{BatteryStatus, FleetError, ShipmentStatus, TimeSource};
    use fleet_runtime::FleetConfig;
    use fm_01_battery_lifecycle::{BatteryPatch, BatteryQuery};
    use fm_02_shipment_lifecycle::{EnvironmentalLogRequest, ShipmentPatch};

    fn reading(kind: &str, value: f64) -> EnvironmentalLogRequest {
        EnvironmentalLogRequest {
            kind: Some(kind.to_string()),
            value: Some(value),
            timestamp: None,
        }
    }

    fn status(target: ShipmentStatus) -> ShipmentPatch {
        ShipmentPatch {
            status: Some(target),
            ..Default::default()
        }
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    #[tokio::test]
    async fn test_registered_battery_reads_back_with_defaults() {
        let fleet = TestFleet::new();
        let created = fleet.battery("BAT-0001");

        let fetched = fleet.container.state.batteries.get_battery(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.status, BatteryStatus::Available);
        assert_eq!(fetched.location, "Warehouse");
        assert_eq!(fetched.health_status, 100.0);
        assert_eq!(fetched.current_charge, 100.0);
        assert_eq!(fetched.shipment, None);
        assert_eq!(fetched.age_years(fleet.clock.now()), 2);
    }

    #[tokio::test]
    async fn test_duplicate_serial_leaves_store_unchanged() {
        let fleet = TestFleet::new();
        let original = fleet.battery("BAT-0001");

        let err = fleet
            .container
            .state
            .batteries
            .create_battery(new_battery("BAT-0001"))
            .unwrap_err();
        assert!(matches!(err, FleetError::DuplicateKey { .. }));

        let page = fleet
            .container
            .state
            .batteries
            .list_batteries(&BatteryQuery::default())
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, original.id);
    }

    #[tokio::test]
    async fn test_serial_can_be_reused_after_rename() {
        let fleet = TestFleet::new();
        let battery = fleet.battery("BAT-0001");

        fleet
            .container
            .state
            .batteries
            .update_battery(
                battery.id,
                BatteryPatch {
                    serial_number: Some("BAT-0001-R".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(fleet
            .container
            .state
            .batteries
            .create_battery(new_battery("BAT-0001"))
            .is_ok());
    }

    // =========================================================================
    // SHIPMENT LIFECYCLE
    // =========================================================================

    #[tokio::test]
    async fn test_new_shipment_takes_its_batteries_in_transit() {
        let fleet = TestFleet::new();
        let b1 = fleet.battery("BAT-0001");

        let shipment = fleet.shipment("SHP-1", &[b1.id]);

        assert_eq!(shipment.status, ShipmentStatus::Preparing);
        assert_eq!(shipment.current_location, "Dock A");
        assert_eq!(shipment.hazard_class, "Class 9");
        assert_eq!(shipment.status_updates.len(), 1);
        assert_eq!(shipment.status_updates[0].status, ShipmentStatus::Preparing);

        let b1 = fleet.container.state.batteries.get_battery(b1.id).unwrap();
        assert_eq!(b1.status, BatteryStatus::InTransit);
        assert_eq!(b1.location, "Dock A");
        assert_eq!(b1.shipment, Some(shipment.id));
    }

    #[tokio::test]
    async fn test_delivery_releases_batteries_at_destination() {
        let fleet = TestFleet::new();
        let b1 = fleet.battery("BAT-0001");
        let shipment = fleet.shipment("SHP-1", &[b1.id]);

        fleet.clock.advance(Duration::hours(30));
        let delivered = fleet
            .container
            .state
            .shipments
            .update_shipment(
                shipment.id,
                ShipmentPatch {
                    status: Some(ShipmentStatus::Delivered),
                    current_location: Some("Dock B".into()),
                    ..Default::default()
                },
                None,
            )
            .unwrap()
            .shipment;

        assert_eq!(delivered.status, ShipmentStatus::Delivered);
        assert_eq!(delivered.actual_arrival, Some(fleet.clock.now()));
        assert_eq!(delivered.status_updates.len(), 2);
        assert_eq!(delivered.status_updates[1].location, "Dock B");
        assert_eq!(delivered.status_updates[1].notes, "Status changed to Delivered");

        let b1 = fleet.container.state.batteries.get_battery(b1.id).unwrap();
        assert_eq!(b1.status, BatteryStatus::Available);
        assert_eq!(b1.location, "Dock B");
    }

    #[tokio::test]
    async fn test_repeated_status_adds_no_audit_entry() {
        let fleet = TestFleet::new();
        let shipment = fleet.shipment("SHP-1", &[]);

        let same = fleet
            .container
            .state
            .shipments
            .update_shipment(shipment.id, status(ShipmentStatus::Preparing), None)
            .unwrap()
            .shipment;
        assert_eq!(same.status_updates.len(), 1);
    }

    #[tokio::test]
    async fn test_strict_policy_blocks_skipping_transit() {
        let mut config = FleetConfig::default();
        config.lifecycle.strict_transitions = true;
        let fleet = TestFleet::with_config(config);
        let b1 = fleet.battery("BAT-0001");
        let shipment = fleet.shipment("SHP-1", &[b1.id]);

        let err = fleet
            .container
            .state
            .shipments
            .update_shipment(shipment.id, status(ShipmentStatus::Delivered), None)
            .unwrap_err();
        assert!(matches!(err, FleetError::InvalidTransition { .. }));

        // Nothing moved.
        let stored = fleet.container.state.shipments.get_shipment(shipment.id).unwrap();
        assert_eq!(stored.status, ShipmentStatus::Preparing);
        assert_eq!(stored.status_updates.len(), 1);

        for target in [ShipmentStatus::InTransit, ShipmentStatus::Delivered] {
            fleet
                .container
                .state
                .shipments
                .update_shipment(shipment.id, status(target), None)
                .unwrap();
        }
        let b1 = fleet.container.state.batteries.get_battery(b1.id).unwrap();
        assert_eq!(b1.status, BatteryStatus::Available);
    }

    // =========================================================================
    // MEMBERSHIP
    // =========================================================================

    #[tokio::test]
    async fn test_membership_swap_detaches_and_attaches() {
        let fleet = TestFleet::new();
        let b1 = fleet.battery("BAT-0001");
        let b2 = fleet.battery("BAT-0002");
        let shipment = fleet.shipment("SHP-1", &[b1.id]);

        let updated = fleet
            .container
            .state
            .shipments
            .update_shipment(
                shipment.id,
                ShipmentPatch {
                    batteries: Some(vec![b2.id]),
                    ..Default::default()
                },
                None,
            )
            .unwrap()
            .shipment;
        assert_eq!(updated.batteries, vec![b2.id]);

        let b1 = fleet.container.state.batteries.get_battery(b1.id).unwrap();
        assert_eq!(b1.status, BatteryStatus::Available);
        assert_eq!(b1.shipment, None);
        let b2 = fleet.container.state.batteries.get_battery(b2.id).unwrap();
        assert_eq!(b2.status, BatteryStatus::InTransit);
        assert_eq!(b2.shipment, Some(shipment.id));
    }

    #[tokio::test]
    async fn test_battery_moves_between_shipments() {
        let fleet = TestFleet::new();
        let b1 = fleet.battery("BAT-0001");
        let first = fleet.shipment("SHP-1", &[b1.id]);
        let second = fleet.shipment("SHP-2", &[b1.id]);

        let first = fleet.container.state.shipments.get_shipment(first.id).unwrap();
        assert!(first.batteries.is_empty());
        let b1 = fleet.container.state.batteries.get_battery(b1.id).unwrap();
        assert_eq!(b1.shipment, Some(second.id));
    }

    #[tokio::test]
    async fn test_unknown_member_rejects_whole_shipment() {
        let fleet = TestFleet::new();
        let b1 = fleet.battery("BAT-0001");

        let err = fleet
            .container
            .state
            .shipments
            .create_shipment(
                new_shipment("SHP-1", &[b1.id, fleet_types::new_entity_id()]),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, FleetError::NotFound { .. }));

        let b1 = fleet.container.state.batteries.get_battery(b1.id).unwrap();
        assert_eq!(b1.status, BatteryStatus::Available);
        assert_eq!(b1.shipment, None);
    }

    #[tokio::test]
    async fn test_deleting_member_battery_prunes_only_that_id() {
        let fleet = TestFleet::new();
        let b1 = fleet.battery("BAT-0001");
        let b2 = fleet.battery("BAT-0002");
        let shipment = fleet.shipment("SHP-1", &[b1.id, b2.id]);

        fleet.container.state.batteries.delete_battery(b1.id).unwrap();

        let shipment = fleet.container.state.shipments.get_shipment(shipment.id).unwrap();
        assert_eq!(shipment.batteries, vec![b2.id]);
    }

    #[tokio::test]
    async fn test_deleting_shipment_frees_batteries() {
        let fleet = TestFleet::new();
        let b1 = fleet.battery("BAT-0001");
        let shipment = fleet.shipment("SHP-1", &[b1.id]);

        fleet.container.state.shipments.delete_shipment(shipment.id).unwrap();

        let b1 = fleet.container.state.batteries.get_battery(b1.id).unwrap();
        assert_eq!(b1.status, BatteryStatus::Available);
        assert_eq!(b1.shipment, None);
        assert!(matches!(
            fleet.container.state.shipments.get_shipment(shipment.id),
            Err(FleetError::NotFound { .. })
        ));
    }

    // =========================================================================
    // ENVIRONMENTAL ALERTING
    // =========================================================================

    #[tokio::test]
    async fn test_readings_are_flagged_against_thresholds() {
        let fleet = TestFleet::new();
        let shipment = fleet.shipment("SHP-1", &[]);
        let shipments = &fleet.container.state.shipments;

        let hot = shipments
            .add_environmental_log(shipment.id, reading("temperature", 50.0))
            .unwrap();
        assert!(hot.is_alert);
        let mild = shipments
            .add_environmental_log(shipment.id, reading("temperature", 20.0))
            .unwrap();
        assert!(!mild.is_alert);
        let jolt = shipments
            .add_environmental_log(shipment.id, reading("shock", 7.5))
            .unwrap();
        assert!(jolt.is_alert);

        let stored = shipments.get_shipment(shipment.id).unwrap();
        assert_eq!(stored.temperature_logs.len(), 2);
        assert!(stored.temperature_logs[0].is_alert);
        assert!(!stored.temperature_logs[1].is_alert);
        assert_eq!(stored.shock_events[0].magnitude, 7.5);
        assert_eq!(stored.alert_count(), 2);
    }

    #[tokio::test]
    async fn test_alert_list_skips_finished_shipments() {
        let fleet = TestFleet::new();
        let shipments = &fleet.container.state.shipments;
        let active = fleet.shipment("SHP-1", &[]);
        let finished = fleet.shipment("SHP-2", &[]);
        let calm = fleet.shipment("SHP-3", &[]);

        for id in [active.id, finished.id] {
            shipments
                .add_environmental_log(id, reading("humidity", 95.0))
                .unwrap();
        }
        shipments
            .add_environmental_log(calm.id, reading("humidity", 50.0))
            .unwrap();
        shipments
            .update_shipment(finished.id, status(ShipmentStatus::Delivered), None)
            .unwrap();

        let alerting: Vec<_> = shipments
            .shipments_with_active_alerts()
            .unwrap()
            .into_iter()
            .map(|s| s.shipment_number)
            .collect();
        assert_eq!(alerting, vec!["SHP-1"]);
    }

    #[tokio::test]
    async fn test_invalid_reading_is_rejected_before_lookup() {
        let fleet = TestFleet::new();
        let err = fleet
            .container
            .state
            .shipments
            .add_environmental_log(fleet_types::new_entity_id(), reading("pressure", 1.0))
            .unwrap_err();
        assert!(matches!(err, FleetError::InvalidArgument(_)));
    }
}
