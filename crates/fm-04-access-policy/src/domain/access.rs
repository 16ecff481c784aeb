//! Role requirements.

use super::caller::Caller;
use super::errors::AuthError;
use fleet_types::Role;
use std::fmt;

/// Minimum privilege an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessLevel {
    /// Any verified caller.
    Authenticated,
    /// manager or admin.
    Manager,
    /// admin only.
    Admin,
}

impl AccessLevel {
    /// Lowest role that satisfies this level.
    pub fn minimum_role(&self) -> Role {
        match self {
            AccessLevel::Authenticated => Role::Operator,
            AccessLevel::Manager => Role::Manager,
            AccessLevel::Admin => Role::Admin,
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        role >= self.minimum_role()
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Authenticated => f.write_str("authenticated"),
            AccessLevel::Manager => f.write_str("manager"),
            AccessLevel::Admin => f.write_str("admin"),
        }
    }
}

/// Check `caller` against `level`.
pub fn authorize(caller: &Caller, level: AccessLevel) -> Result<(), AuthError> {
    if level.permits(caller.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            required: level,
            role: caller.role,
        })
    }
}
