//! User directory inputs.

use fleet_types::{FleetError, Role};
use serde::Deserialize;

/// Registration request for a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Partial user update; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Self-service profile edit. Role is not part of it; a `role` key in
/// the body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<ProfilePatch> for UserPatch {
    fn from(patch: ProfilePatch) -> Self {
        Self {
            name: patch.name,
            email: patch.email,
            role: None,
        }
    }
}

/// Trimmed, lowercased email. Rejects values without a local part and domain.
pub fn normalize_email(raw: &str) -> Result<String, FleetError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(FleetError::invalid(format!("'{}' is not a valid email", raw.trim()))),
    }
}

pub fn normalize_name(raw: &str) -> Result<String, FleetError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(FleetError::invalid("name must not be empty"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalized() {
        assert_eq!(
            normalize_email("  Ops.Lead@Fleet.Example ").unwrap(),
            "ops.lead@fleet.example"
        );
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@fleet.example").is_err());
        assert!(normalize_email("a@localhost").is_err());
    }

    #[test]
    fn test_role_defaults_to_none_in_request() {
        let input: NewUser =
            serde_json::from_value(serde_json::json!({"name": "A", "email": "a@b.co"})).unwrap();
        assert_eq!(input.role, None);
    }

    #[test]
    fn test_profile_patch_never_carries_a_role() {
        let patch: ProfilePatch = serde_json::from_value(
            serde_json::json!({"name": "Ada", "role": "admin"}),
        )
        .unwrap();
        let patch = UserPatch::from(patch);
        assert_eq!(patch.name.as_deref(), Some("Ada"));
        assert_eq!(patch.email, None);
        assert_eq!(patch.role, None);
    }
}
