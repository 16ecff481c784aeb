//! Authentication middleware and role extractors.
//!
//! [`AuthLayer`] verifies the credential on every `/api` request and puts
//! the resulting [`Caller`] into the request extensions. Handlers then ask
//! for [`Authorized<L>`] with the access level they need; a caller whose
//! role is too low gets `403 PERMISSION_DENIED`.
//!
//! The credential is read from `Authorization: Bearer <token>` first and
//! from the `jwt` cookie second.

use crate::domain::error::ApiError;
use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, Request},
    response::{IntoResponse, Response},
};
use fm_04_access_policy::{authorize, AccessLevel, AuthError, Caller, TokenVerifier};
use std::marker::PhantomData;
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Name of the session cookie set by the dashboard.
pub const SESSION_COOKIE: &str = "jwt";

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    verifier: Arc<dyn TokenVerifier>,
}

impl AuthLayer {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            verifier: Arc::clone(&self.verifier),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    verifier: Arc<dyn TokenVerifier>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let verifier = Arc::clone(&self.verifier);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let verified = match extract_token(&req) {
                Some(token) => verifier.verify(&token),
                None => Err(AuthError::MissingCredentials),
            };

            match verified {
                Ok(caller) => {
                    debug!(user = %caller.user_id, role = %caller.role, "Caller authenticated");
                    req.extensions_mut().insert(caller);
                    inner.call(req).await
                }
                Err(e) => {
                    warn!(path = %req.uri().path(), error = %e, "Authentication rejected");
                    Ok(ApiError::from(e).into_response())
                }
            }
        })
    }
}

/// Bearer token from the Authorization header, else the session cookie.
fn extract_token<B>(req: &Request<B>) -> Option<String> {
    if let Some(auth) = req.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

// =============================================================================
// ROLE EXTRACTORS
// =============================================================================

/// Type-level access level for [`Authorized`].
pub trait AccessRequirement: Send + Sync + 'static {
    const LEVEL: AccessLevel;
}

/// Any verified caller.
pub struct AnyRole;

/// manager or admin.
pub struct ManagerOrAbove;

/// admin only.
pub struct AdminOnly;

impl AccessRequirement for AnyRole {
    const LEVEL: AccessLevel = AccessLevel::Authenticated;
}

impl AccessRequirement for ManagerOrAbove {
    const LEVEL: AccessLevel = AccessLevel::Manager;
}

impl AccessRequirement for AdminOnly {
    const LEVEL: AccessLevel = AccessLevel::Admin;
}

/// The authenticated caller, checked against access level `L`.
pub struct Authorized<L> {
    pub caller: Caller,
    _level: PhantomData<fn() -> L>,
}

impl<L> Authorized<L> {
    pub fn caller(&self) -> &Caller {
        &self.caller
    }
}

#[async_trait]
impl<S, L> FromRequestParts<S> for Authorized<L>
where
    S: Send + Sync,
    L: AccessRequirement,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caller = parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)?;

        if let Err(e) = authorize(&caller, L::LEVEL) {
            warn!(user = %caller.user_id, required = %L::LEVEL, "Access denied");
            return Err(e.into());
        }

        Ok(Self {
            caller,
            _level: PhantomData,
        })
    }
}
