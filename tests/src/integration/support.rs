//! Shared fixtures for the integration tests.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use fleet_runtime::{FleetConfig, FleetContainer};
use fleet_types::{Battery, EntityId, ManualTimeSource, Role, Shipment, SystemTimeSource, Timestamp};
use fm_01_battery_lifecycle::NewBattery;
use fm_02_shipment_lifecycle::NewShipment;
use fm_04_access_policy::NewUser;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Monday 3 June 2024, 08:00 UTC.
pub fn epoch() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap()
}

/// A fully wired fleet over an in-memory store and a manual clock.
pub struct TestFleet {
    pub container: FleetContainer,
    pub clock: ManualTimeSource,
    router: Router,
}

impl TestFleet {
    pub fn new() -> Self {
        Self::with_config(FleetConfig::default())
    }

    pub fn with_config(config: FleetConfig) -> Self {
        let clock = ManualTimeSource::new(epoch());
        let container = FleetContainer::in_memory(config, clock.clone());
        let router = container.gateway().unwrap().router();
        Self {
            container,
            clock,
            router,
        }
    }

    // ===== SEEDING =====

    pub fn battery(&self, serial: &str) -> Battery {
        self.container
            .state
            .batteries
            .create_battery(new_battery(serial))
            .unwrap()
    }

    pub fn shipment(&self, number: &str, batteries: &[EntityId]) -> Shipment {
        self.container
            .state
            .shipments
            .create_shipment(new_shipment(number, batteries), None)
            .unwrap()
    }

    /// Register a user with `role` and mint a token for them.
    ///
    /// Tokens are signed against the system clock: the verifier checks
    /// expiry against wall time, not against the fleet's manual clock.
    pub fn login(&self, role: Role) -> (EntityId, String) {
        let user = self
            .container
            .state
            .users
            .create_user(NewUser {
                name: format!("{} user", role.as_str()),
                email: format!("{}-{}@fleet.test", role.as_str(), fleet_types::new_entity_id()),
                role: Some(role),
            })
            .unwrap();
        let token = self
            .container
            .jwt
            .issue(user.id, &user.name, role, &SystemTimeSource)
            .unwrap();
        (user.id, token)
    }

    // ===== HTTP =====

    /// Send one request through the assembled router.
    ///
    /// JSON bodies decode to a [`Value`]; anything else comes back as a
    /// string, and an empty body as `Null`.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }
}

pub fn new_battery(serial: &str) -> NewBattery {
    serde_json::from_value(battery_body(serial)).unwrap()
}

pub fn new_shipment(number: &str, batteries: &[EntityId]) -> NewShipment {
    serde_json::from_value(shipment_body(number, batteries)).unwrap()
}

/// Registration body as a client would send it.
pub fn battery_body(serial: &str) -> Value {
    json!({
        "serialNumber": serial,
        "model": "PowerCell 48",
        "manufacturer": "Voltaic",
        "capacity": 5000.0,
        "voltage": 48.0,
        "chemistry": "Li-ion",
        "manufactureDate": "2022-02-01",
    })
}

pub fn shipment_body(number: &str, batteries: &[EntityId]) -> Value {
    json!({
        "shipmentNumber": number,
        "origin": "Dock A",
        "destination": "Dock B",
        "departureDate": "2024-06-03",
        "estimatedArrival": "2024-06-06",
        "carrier": "Northbound Freight",
        "batteries": batteries,
    })
}
