//! # Inbound Ports (Driving Ports)

use crate::domain::caller::Caller;
use crate::domain::commands::{NewUser, UserPatch};
use crate::domain::errors::AuthError;
use fleet_types::{EntityId, FleetError, User};

/// Turns a presented credential into a verified caller.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Caller, AuthError>;
}

/// User directory operations.
pub trait UserDirectoryApi: Send + Sync {
    /// Register a user; the email is normalised and must be unique.
    fn create_user(&self, input: NewUser) -> Result<User, FleetError>;

    /// All users, ordered by name.
    fn list_users(&self) -> Result<Vec<User>, FleetError>;

    fn get_user(&self, id: EntityId) -> Result<User, FleetError>;

    fn update_user(&self, id: EntityId, patch: UserPatch) -> Result<User, FleetError>;

    fn delete_user(&self, id: EntityId) -> Result<User, FleetError>;
}
