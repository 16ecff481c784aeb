//! # Shipment Lifecycle Service
//!
//! Implements [`ShipmentLifecycleApi`]. Every operation that touches more
//! than one document runs inside a single [`EntityStore::transact`] call, so
//! a shipment and its batteries are always committed together.


use crate::domain::commands::{
    EnvironmentalLogRequest, LogEntry, LoggedReading, NewShipment, ShipmentPatch, ShipmentQuery,
    ShipmentUpdate, StatusTransition,
};
use crate::domain::config::ShipmentLifecycleConfig;
use crate::domain::membership::{dedupe, MembershipChange};
use crate::domain::rules::validate_shipment;
use crate::domain::transitions::{battery_status_for, TransitionPolicy};
use crate::ports::inbound::ShipmentLifecycleApi;
use fleet_store::{EntityStore, KeyValueStore, UnitOfWork};
use fleet_types::{
    new_entity_id, Battery, EntityId, EntityKind, FleetError, Page, SensorReading, Shipment,
    ShipmentStatus, ShockEvent, StatusUpdate, TimeSource, Timestamp,
};
use fm_03_environmental_alerting::{AlertEvaluationApi, ReadingKind};
use std::sync::Arc;
use tracing::{debug, info};

/// Dependencies for ShipmentLifecycleService
pub struct ShipmentLifecycleDependencies<KV: KeyValueStore, TS: TimeSource, AE: AlertEvaluationApi>
{
    pub store: Arc<EntityStore<KV>>,
    pub time_source: TS,
    pub alert_evaluator: AE,
    pub config: ShipmentLifecycleConfig,
}

/// The Shipment Lifecycle Service.
pub struct ShipmentLifecycleService<KV: KeyValueStore, TS: TimeSource, AE: AlertEvaluationApi> {
    store: Arc<EntityStore<KV>>,
    time_source: TS,
    alerts: AE,
    policy: TransitionPolicy,
}

impl<KV, TS, AE> ShipmentLifecycleService<KV, TS, AE>
where
    KV: KeyValueStore,
    TS: TimeSource,
    AE: AlertEvaluationApi,
{
    pub fn new(deps: ShipmentLifecycleDependencies<KV, TS, AE>) -> Self {
        Self {
            store: deps.store,
            time_source: deps.time_source,
            alerts: deps.alert_evaluator,
            policy: deps.config.transition_policy(),
        }
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        self.policy
    }
}

fn shipment_not_found(id: EntityId) -> FleetError {
    FleetError::not_found(EntityKind::Shipment, id)
}

/// Fail unless `number` is free or already owned by `owner`.
fn ensure_number_free<KV: KeyValueStore>(
    uow: &UnitOfWork<'_, KV>,
    number: &str,
    owner: Option<EntityId>,
) -> Result<(), FleetError> {
    match uow.find_unique::<Shipment>(number)? {
        Some(other) if Some(other.id) != owner => Err(FleetError::duplicate(
            EntityKind::Shipment,
            "shipmentNumber",
            number,
        )),
        _ => Ok(()),
    }
}

/// Load every listed battery, failing on the first unknown id.
fn load_batteries<KV: KeyValueStore>(
    uow: &UnitOfWork<'_, KV>,
    ids: &[EntityId],
) -> Result<Vec<Battery>, FleetError> {
    ids.iter()
        .map(|id| {
            uow.get::<Battery>(id)?
                .ok_or_else(|| FleetError::not_found(EntityKind::Battery, id))
        })
        .collect()
}

/// Batteries whose `shipment` reference points at `shipment_id`.
fn members_of<KV: KeyValueStore>(
    uow: &UnitOfWork<'_, KV>,
    shipment_id: EntityId,
) -> Result<Vec<Battery>, FleetError> {
    Ok(uow
        .all::<Battery>()?
        .into_iter()
        .filter(|b| b.shipment == Some(shipment_id))
        .collect())
}

/// Attach `battery` to `shipment_id`, taking it away from any other
/// shipment that still lists it.
fn claim<KV: KeyValueStore>(
    uow: &mut UnitOfWork<'_, KV>,
    battery: &mut Battery,
    shipment_id: EntityId,
    location: &str,
    now: Timestamp,
) -> Result<(), FleetError> {
    if let Some(previous) = battery.shipment.filter(|prev| *prev != shipment_id) {
        if let Some(mut other) = uow.get::<Shipment>(&previous)? {
            if other.remove_battery(&battery.id) {
                other.updated_at = now;
                uow.put(&other)?;
                debug!(
                    battery_id = %battery.id,
                    from = %previous,
                    to = %shipment_id,
                    "Battery moved between shipments"
                );
            }
        }
    }
    battery.attach_to(shipment_id, location, now);
    uow.put(&*battery)?;
    Ok(())
}

impl<KV, TS, AE> ShipmentLifecycleApi for ShipmentLifecycleService<KV, TS, AE>
where
    KV: KeyValueStore,
    TS: TimeSource,
    AE: AlertEvaluationApi,
{
    fn create_shipment(
        &self,
        input: NewShipment,
        actor: Option<EntityId>,
    ) -> Result<Shipment, FleetError> {
        let now = self.time_source.now();
        let shipment = input.into_shipment(new_entity_id(), now, actor)?;

        self.store.transact(|uow| {
            ensure_number_free(uow, &shipment.shipment_number, None)?;
            for mut battery in load_batteries(uow, &shipment.batteries)? {
                claim(uow, &mut battery, shipment.id, &shipment.origin, now)?;
            }
            uow.put(&shipment)?;
            Ok::<_, FleetError>(())
        })?;

        info!(
            shipment_id = %shipment.id,
            shipment_number = %shipment.shipment_number,
            batteries = shipment.battery_count(),
            "Shipment created"
        );
        Ok(shipment)
    }

    fn get_shipment(&self, id: EntityId) -> Result<Shipment, FleetError> {
        self.store
            .get::<Shipment>(&id)?
            .ok_or_else(|| shipment_not_found(id))
    }

    fn list_shipments(&self, query: &ShipmentQuery) -> Result<Page<Shipment>, FleetError> {
        let mut shipments: Vec<Shipment> = self
            .store
            .all::<Shipment>()?
            .into_iter()
            .filter(|s| query.matches(s))
            .collect();
        shipments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::slice(shipments, query.page))
    }

    fn update_shipment(
        &self,
        id: EntityId,
        mut patch: ShipmentPatch,
        actor: Option<EntityId>,
    ) -> Result<ShipmentUpdate, FleetError> {
        let now = self.time_source.now();

        let (shipment, transition) = self.store.transact(|uow| {
            let mut shipment = uow
                .get::<Shipment>(&id)?
                .ok_or_else(|| shipment_not_found(id))?;
            let previous_status = shipment.status;

            if let Some(number) = patch.new_number() {
                if number != shipment.shipment_number {
                    ensure_number_free(uow, number, Some(id))?;
                }
            }

            let requested = patch.batteries.take().map(dedupe);
            if let Some(ids) = &requested {
                load_batteries(uow, ids)?;
            }

            patch.apply_details(&mut shipment);

            let location = patch
                .current_location
                .take()
                .map(|l| l.trim().to_string());
            let transition = patch
                .status
                .filter(|status| *status != shipment.status);

            if let Some(target) = transition {
                self.policy.check(shipment.status, target)?;
                shipment.status = target;
                if let Some(location) = location {
                    shipment.current_location = location;
                }
                if target == ShipmentStatus::Delivered {
                    shipment.actual_arrival = Some(now);
                }
                let notes = patch
                    .status_notes
                    .take()
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| format!("Status changed to {target}"));
                shipment.status_updates.push(StatusUpdate {
                    status: target,
                    timestamp: now,
                    location: shipment.current_location.clone(),
                    notes,
                    updated_by: actor,
                });

                let battery_status = battery_status_for(target);
                for mut battery in members_of(uow, id)? {
                    battery.follow(battery_status, &shipment.current_location, now);
                    uow.put(&battery)?;
                }
            } else if let Some(location) = location.filter(|l| *l != shipment.current_location) {
                shipment.current_location = location;
                for mut battery in members_of(uow, id)? {
                    let status = battery.status;
                    battery.follow(status, &shipment.current_location, now);
                    uow.put(&battery)?;
                }
            }

            if let Some(ids) = requested {
                let change = MembershipChange::between(&shipment.batteries, &ids);
                for battery_id in &change.removed {
                    if let Some(mut battery) = uow.get::<Battery>(battery_id)? {
                        if battery.shipment == Some(id) {
                            battery.detach(&shipment.current_location, now);
                            uow.put(&battery)?;
                        }
                    }
                }
                for mut battery in load_batteries(uow, &change.added)? {
                    claim(uow, &mut battery, id, &shipment.current_location, now)?;
                }
                if !change.is_empty() {
                    debug!(
                        shipment_id = %id,
                        removed = change.removed.len(),
                        added = change.added.len(),
                        "Shipment membership changed"
                    );
                }
                shipment.batteries = ids;
            }

            validate_shipment(&shipment)?;
            shipment.updated_at = now;
            uow.put(&shipment)?;
            Ok::<_, FleetError>((
                shipment,
                transition.map(|to| StatusTransition {
                    from: previous_status,
                    to,
                }),
            ))
        })?;

        match transition {
            Some(StatusTransition { from, to }) => info!(
                shipment_id = %id,
                shipment_number = %shipment.shipment_number,
                from = %from,
                to = %to,
                location = %shipment.current_location,
                "Shipment status changed"
            ),
            None => info!(
                shipment_id = %id,
                shipment_number = %shipment.shipment_number,
                "Shipment updated"
            ),
        }
        Ok(ShipmentUpdate {
            shipment,
            transition,
        })
    }

    fn delete_shipment(&self, id: EntityId) -> Result<Shipment, FleetError> {
        let now = self.time_source.now();

        let (shipment, detached) = self.store.transact(|uow| {
            let shipment = uow
                .delete::<Shipment>(&id)?
                .ok_or_else(|| shipment_not_found(id))?;
            let members = members_of(uow, id)?;
            let detached = members.len();
            for mut battery in members {
                battery.detach(&shipment.current_location, now);
                uow.put(&battery)?;
            }
            Ok::<_, FleetError>((shipment, detached))
        })?;

        info!(
            shipment_id = %id,
            shipment_number = %shipment.shipment_number,
            detached,
            "Shipment removed"
        );
        Ok(shipment)
    }

    fn add_environmental_log(
        &self,
        id: EntityId,
        request: EnvironmentalLogRequest,
    ) -> Result<LoggedReading, FleetError> {
        let (kind, value) = request.validate()?;
        let timestamp = request.timestamp.unwrap_or_else(|| self.time_source.now());
        let now = self.time_source.now();

        let logged = self.store.transact(|uow| {
            let mut shipment = uow
                .get::<Shipment>(&id)?
                .ok_or_else(|| shipment_not_found(id))?;

            let is_alert = self.alerts.evaluate(kind, value);
            let entry = match kind {
                ReadingKind::Temperature => {
                    let reading = SensorReading {
                        value,
                        timestamp,
                        is_alert,
                    };
                    shipment.temperature_logs.push(reading.clone());
                    LogEntry::Reading(reading)
                }
                ReadingKind::Humidity => {
                    let reading = SensorReading {
                        value,
                        timestamp,
                        is_alert,
                    };
                    shipment.humidity_logs.push(reading.clone());
                    LogEntry::Reading(reading)
                }
                ReadingKind::Shock => {
                    let event = ShockEvent {
                        magnitude: value,
                        timestamp,
                        is_alert,
                    };
                    shipment.shock_events.push(event.clone());
                    LogEntry::Shock(event)
                }
            };
            shipment.updated_at = now;
            uow.put(&shipment)?;
            Ok::<_, FleetError>(LoggedReading {
                kind,
                entry,
                is_alert,
            })
        })?;

        debug!(
            shipment_id = %id,
            kind = %kind,
            value,
            is_alert = logged.is_alert,
            "Environmental reading logged"
        );
        Ok(logged)
    }

    fn shipments_with_active_alerts(&self) -> Result<Vec<Shipment>, FleetError> {
        let mut flagged: Vec<Shipment> = self
            .store
            .all::<Shipment>()?
            .into_iter()
            .filter(Shipment::has_active_alert)
            .collect();
        flagged.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(flagged)
    }
}
