//! # Battery Lifecycle Service
//!
//! Implements [`BatteryLifecycleApi`] over the shared entity store.


use crate::domain::commands::{BatteryPatch, BatteryQuery, NewBattery};
use crate::domain::rules::{check_percentage, validate_battery};
use crate::ports::inbound::BatteryLifecycleApi;
use fleet_store::{EntityStore, KeyValueStore};
use fleet_types::{
    new_entity_id, Battery, EntityId, EntityKind, FleetError, Page, Shipment, TimeSource,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Dependencies for BatteryLifecycleService
pub struct BatteryLifecycleDependencies<KV: KeyValueStore, TS: TimeSource> {
    pub store: Arc<EntityStore<KV>>,
    pub time_source: TS,
}

/// The Battery Lifecycle Service.
pub struct BatteryLifecycleService<KV: KeyValueStore, TS: TimeSource> {
    store: Arc<EntityStore<KV>>,
    time_source: TS,
}

impl<KV: KeyValueStore, TS: TimeSource> BatteryLifecycleService<KV, TS> {
    pub fn new(deps: BatteryLifecycleDependencies<KV, TS>) -> Self {
        Self {
            store: deps.store,
            time_source: deps.time_source,
        }
    }
}

impl<KV: KeyValueStore, TS: TimeSource> BatteryLifecycleApi for BatteryLifecycleService<KV, TS> {
    fn create_battery(&self, input: NewBattery) -> Result<Battery, FleetError> {
        let battery = input.into_battery(new_entity_id(), self.time_source.now())?;

        self.store.transact(|uow| {
            if uow.find_unique::<Battery>(&battery.serial_number)?.is_some() {
                return Err(FleetError::duplicate(
                    EntityKind::Battery,
                    "serialNumber",
                    battery.serial_number.clone(),
                ));
            }
            uow.put(&battery)?;
            Ok(())
        })?;

        info!(
            battery_id = %battery.id,
            serial_number = %battery.serial_number,
            "Battery registered"
        );
        Ok(battery)
    }

    fn get_battery(&self, id: EntityId) -> Result<Battery, FleetError> {
        self.store
            .get::<Battery>(&id)?
            .ok_or_else(|| FleetError::not_found(EntityKind::Battery, id))
    }

    fn list_batteries(&self, query: &BatteryQuery) -> Result<Page<Battery>, FleetError> {
        let mut batteries: Vec<Battery> = self
            .store
            .all::<Battery>()?
            .into_iter()
            .filter(|b| query.matches(b))
            .collect();
        batteries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::slice(batteries, query.page))
    }

    fn update_battery(&self, id: EntityId, patch: BatteryPatch) -> Result<Battery, FleetError> {
        let now = self.time_source.now();

        let battery = self.store.transact(|uow| {
            let mut battery = uow
                .get::<Battery>(&id)?
                .ok_or_else(|| FleetError::not_found(EntityKind::Battery, id))?;

            if let Some(serial) = patch.new_serial() {
                if serial != battery.serial_number {
                    if let Some(other) = uow.find_unique::<Battery>(serial)? {
                        if other.id != id {
                            return Err(FleetError::duplicate(
                                EntityKind::Battery,
                                "serialNumber",
                                serial,
                            ));
                        }
                    }
                }
            }

            patch.apply_to(&mut battery);
            validate_battery(&battery)?;
            battery.last_checked_date = now;
            battery.updated_at = now;
            uow.put(&battery)?;
            Ok(battery)
        })?;

        info!(battery_id = %id, serial_number = %battery.serial_number, "Battery updated");
        Ok(battery)
    }

    fn update_charge(&self, id: EntityId, value: Option<f64>) -> Result<Battery, FleetError> {
        let charge =
            value.ok_or_else(|| FleetError::invalid("currentCharge must be between 0 and 100"))?;
        check_percentage("currentCharge", charge)?;
        let now = self.time_source.now();

        let battery = self.store.transact(|uow| {
            let mut battery = uow
                .get::<Battery>(&id)?
                .ok_or_else(|| FleetError::not_found(EntityKind::Battery, id))?;
            battery.current_charge = charge;
            battery.last_checked_date = now;
            battery.updated_at = now;
            uow.put(&battery)?;
            Ok::<_, FleetError>(battery)
        })?;

        debug!(battery_id = %id, charge, "Battery charge updated");
        Ok(battery)
    }

    fn delete_battery(&self, id: EntityId) -> Result<Battery, FleetError> {
        let now = self.time_source.now();

        let battery = self.store.transact(|uow| {
            let battery = uow
                .delete::<Battery>(&id)?
                .ok_or_else(|| FleetError::not_found(EntityKind::Battery, id))?;

            if let Some(shipment_id) = battery.shipment {
                if let Some(mut shipment) = uow.get::<Shipment>(&shipment_id)? {
                    if shipment.remove_battery(&id) {
                        shipment.updated_at = now;
                        uow.put(&shipment)?;
                    }
                }
            }
            Ok::<_, FleetError>(battery)
        })?;

        info!(
            battery_id = %id,
            serial_number = %battery.serial_number,
            shipment_id = ?battery.shipment,
            "Battery removed"
        );
        Ok(battery)
    }

    fn critical_batteries(&self) -> Result<Vec<Battery>, FleetError> {
        let mut critical: Vec<Battery> = self
            .store
            .all::<Battery>()?
            .into_iter()
            .filter(Battery::is_critical)
            .collect();
        critical.sort_by(|a, b| a.health_status.total_cmp(&b.health_status));
        Ok(critical)
    }
}
