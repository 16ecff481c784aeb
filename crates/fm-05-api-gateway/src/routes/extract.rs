//! Extractors whose rejections use the gateway error body.

use crate::domain::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON body; malformed input becomes `400 INVALID_ARGUMENT`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; a malformed id becomes `400 INVALID_ARGUMENT`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
