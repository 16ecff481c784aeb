//! API Gateway service - router assembly and HTTP server.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::{create_cors_layer, AuthLayer, MetricsLayer, TracingLayer};
use crate::routes;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use fleet_types::{Battery, EntityId, FleetError, Shipment, TimeSource, Timestamp, User};
use fm_01_battery_lifecycle::BatteryLifecycleApi;
use fm_02_shipment_lifecycle::ShipmentLifecycleApi;
use fm_04_access_policy::{TokenVerifier, UserDirectoryApi};
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

/// Shared handler state: the inbound ports of every subsystem.
#[derive(Clone)]
pub struct AppState {
    pub batteries: Arc<dyn BatteryLifecycleApi>,
    pub shipments: Arc<dyn ShipmentLifecycleApi>,
    pub users: Arc<dyn UserDirectoryApi>,
    pub clock: Arc<dyn TimeSource>,
}

impl AppState {
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Shipment behind a reference; `None` when it no longer exists.
    pub fn linked_shipment(&self, id: EntityId) -> Result<Option<Shipment>, FleetError> {
        missing_as_none(self.shipments.get_shipment(id))
    }

    pub fn linked_battery(&self, id: EntityId) -> Result<Option<Battery>, FleetError> {
        missing_as_none(self.batteries.get_battery(id))
    }

    pub fn linked_user(&self, id: EntityId) -> Result<Option<User>, FleetError> {
        missing_as_none(self.users.get_user(id))
    }
}

fn missing_as_none<T>(result: Result<T, FleetError>) -> Result<Option<T>, FleetError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(FleetError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Assemble the full router: public endpoints, `/api` behind
/// authentication, and the shared middleware stack.
pub fn build_router(
    config: &GatewayConfig,
    state: AppState,
    verifier: Arc<dyn TokenVerifier>,
) -> Router {
    let api = routes::api_router().layer(AuthLayer::new(verifier));

    let middleware = ServiceBuilder::new()
        .layer(TracingLayer::new())
        .layer(MetricsLayer::new())
        .layer(create_cors_layer(&config.cors))
        .layer(TimeoutLayer::new(config.timeouts.request))
        .layer(DefaultBodyLimit::max(config.limits.max_request_size));

    Router::new()
        .merge(routes::system::router())
        .nest("/api", api)
        .layer(middleware)
        .with_state(state)
}

/// API Gateway service
pub struct ApiGatewayService {
    config: GatewayConfig,
    router: Router,
}

impl ApiGatewayService {
    /// Validate the configuration and build the router.
    pub fn new(
        config: GatewayConfig,
        state: AppState,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let router = build_router(&config, state, verifier);
        Ok(Self { config, router })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until `shutdown` resolves. In-flight requests are
    /// allowed to finish.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(addr = %addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}
