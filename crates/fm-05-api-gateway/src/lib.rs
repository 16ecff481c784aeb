//! # API Gateway (fm-05)
//!
//! The REST surface of the fleet services.
//!
//! ## Layer order
//!
//! Request → Tracing → Metrics → CORS → Timeout → Body limit → (Auth, `/api` only) → Handler
//!
//! `/`, `/health` and `/metrics` are public. Everything under `/api`
//! needs a verified bearer token or `jwt` cookie; handlers then declare
//! the role they need through the [`Authorized`] extractor.
//!
//! ## Errors
//!
//! Every failure is returned as `{"code": "...", "message": "..."}`:
//!
//! | Code | Status |
//! |------|--------|
//! | `NOT_FOUND` | 404 |
//! | `DUPLICATE_KEY` | 409 |
//! | `INVALID_ARGUMENT`, `INVALID_TRANSITION` | 400 |
//! | `UNAUTHENTICATED` | 401 |
//! | `PERMISSION_DENIED` | 403 |
//! | `STORAGE_ERROR`, `INTERNAL_ERROR` | 500 |

pub mod domain;
pub mod middleware;
pub mod routes;
pub mod service;

pub use domain::config::{
    ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig, TimeoutConfig,
};
pub use domain::error::{ApiError, GatewayError};
pub use middleware::auth::{AdminOnly, AnyRole, Authorized, ManagerOrAbove};
pub use service::{build_router, ApiGatewayService, AppState};
