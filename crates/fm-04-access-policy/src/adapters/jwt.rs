//! JWT codec: issue and verify fleet tokens.
//!
//! The gateway only needs [`TokenVerifier::verify`]; `issue` serves
//! tooling and tests that need a signed credential.

use crate::domain::caller::{Caller, Claims};
use crate::domain::errors::AuthError;
use crate::ports::inbound::TokenVerifier;
use fleet_types::{EntityId, Role, TimeSource};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Development secret. Rejected by production config validation.
pub const DEV_JWT_SECRET: &str = "fleet-dev-jwt-secret";

/// Token signing and verification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtSettings {
    /// HMAC secret shared by issuer and verifier.
    pub secret: String,
    /// Required `iss` claim, if any.
    pub issuer: Option<String>,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
    /// Lifetime of issued tokens, in seconds.
    pub token_ttl_secs: i64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: DEV_JWT_SECRET.to_string(),
            issuer: None,
            leeway_secs: 60,
            token_ttl_secs: 30 * 24 * 3600,
        }
    }
}

/// HMAC-SHA256 JWT codec.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    ttl_secs: i64,
}

impl JwtCodec {
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::default();
        validation.leeway = settings.leeway_secs;
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            issuer: settings.issuer.clone(),
            ttl_secs: settings.token_ttl_secs,
        }
    }

    /// Sign a token for `user_id` valid from `clock.now()`.
    pub fn issue(
        &self,
        user_id: EntityId,
        name: &str,
        role: Role,
        clock: &impl TimeSource,
    ) -> Result<String, AuthError> {
        let now = clock.now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_secs,
            iss: self.issuer.clone(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

impl TokenVerifier for JwtCodec {
    fn verify(&self, token: &str) -> Result<Caller, AuthError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                AuthError::InvalidToken(e.to_string())
            })?;
        let user_id = EntityId::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;
        Ok(Caller {
            user_id,
            name: claims.name,
            role: claims.role,
        })
    }
}
