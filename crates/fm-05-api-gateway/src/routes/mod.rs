//! HTTP routes.
//!
//! Handlers stay thin: decode, check the caller's role, call one inbound
//! port and shape the response.

pub mod batteries;
pub mod extract;
pub mod shipments;
pub mod system;
pub mod users;

use crate::service::AppState;
use axum::Router;

/// Everything mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/batteries", batteries::router())
        .nest("/shipments", shipments::router())
        .nest("/users", users::router())
}
