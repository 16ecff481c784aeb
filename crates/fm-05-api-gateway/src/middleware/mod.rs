//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → Tracing → Metrics → CORS → Timeout → Body limit → Auth (`/api`) → Handler

pub mod auth;
pub mod cors;
pub mod metrics;
pub mod tracing;

pub use auth::{AccessRequirement, AdminOnly, AnyRole, AuthLayer, Authorized, ManagerOrAbove};
pub use cors::create_cors_layer;
pub use metrics::MetricsLayer;
pub use tracing::TracingLayer;
