use super::access::AccessLevel;
use fleet_types::Role;
use thiserror::Error;

/// Authentication and authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No bearer token or session cookie was presented.
    #[error("Authentication required")]
    MissingCredentials,

    /// The token failed signature, expiry or claim checks.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Authenticated, but the role is below what the operation needs.
    #[error("Role '{role}' is not permitted; {required} access required")]
    Forbidden { required: AccessLevel, role: Role },

    /// A token could not be signed.
    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl AuthError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => "UNAUTHENTICATED",
            AuthError::Forbidden { .. } => "PERMISSION_DENIED",
            AuthError::Signing(_) => "INTERNAL_ERROR",
        }
    }
}
