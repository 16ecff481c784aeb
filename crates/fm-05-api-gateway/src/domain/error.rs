//! Gateway error types.
//!
//! Clients match on `code` from `{"code": "NOT_FOUND", "message": "..."}`.
//! Codes never change; messages may be reworded.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fleet_types::FleetError;
use fm_04_access_policy::AuthError;
use thiserror::Error;
use tracing::error;

/// Stable error code constants not already owned by [`FleetError`] or
/// [`AuthError`].
pub mod codes {
    pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Error returned by every handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Body, path or query could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Fleet(e) => e.code(),
            ApiError::Auth(e) => e.code(),
            ApiError::BadRequest(_) => codes::INVALID_ARGUMENT,
            ApiError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Fleet(FleetError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Fleet(FleetError::DuplicateKey { .. }) => StatusCode::CONFLICT,
            ApiError::Fleet(FleetError::InvalidArgument(_))
            | ApiError::Fleet(FleetError::InvalidTransition { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Fleet(FleetError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(AuthError::MissingCredentials)
            | ApiError::Auth(AuthError::InvalidToken(_)) => StatusCode::UNAUTHORIZED,
            ApiError::Auth(AuthError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Errors that stop the gateway from starting or serving.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
