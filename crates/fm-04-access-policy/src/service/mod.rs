//! # User Directory Service


use crate::domain::commands::{normalize_email, normalize_name, NewUser, UserPatch};
use crate::ports::inbound::UserDirectoryApi;
use fleet_store::{EntityStore, KeyValueStore};
use fleet_types::{new_entity_id, EntityId, EntityKind, FleetError, TimeSource, User};
use std::sync::Arc;
use tracing::info;

/// Dependencies for UserDirectoryService
pub struct UserDirectoryDependencies<KV: KeyValueStore, TS: TimeSource> {
    pub store: Arc<EntityStore<KV>>,
    pub time_source: TS,
}

/// The User Directory Service.
pub struct UserDirectoryService<KV: KeyValueStore, TS: TimeSource> {
    store: Arc<EntityStore<KV>>,
    time_source: TS,
}

impl<KV: KeyValueStore, TS: TimeSource> UserDirectoryService<KV, TS> {
    pub fn new(deps: UserDirectoryDependencies<KV, TS>) -> Self {
        Self {
            store: deps.store,
            time_source: deps.time_source,
        }
    }
}

fn email_taken(email: &str) -> FleetError {
    FleetError::duplicate(EntityKind::User, "email", email)
}

impl<KV: KeyValueStore, TS: TimeSource> UserDirectoryApi for UserDirectoryService<KV, TS> {
    fn create_user(&self, input: NewUser) -> Result<User, FleetError> {
        let now = self.time_source.now();
        let user = User {
            id: new_entity_id(),
            name: normalize_name(&input.name)?,
            email: normalize_email(&input.email)?,
            role: input.role.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.store.transact(|uow| {
            if uow.find_unique::<User>(&user.email)?.is_some() {
                return Err(email_taken(&user.email));
            }
            uow.put(&user)?;
            Ok(())
        })?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    fn list_users(&self) -> Result<Vec<User>, FleetError> {
        let mut users = self.store.all::<User>()?;
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.email.cmp(&b.email)));
        Ok(users)
    }

    fn get_user(&self, id: EntityId) -> Result<User, FleetError> {
        self.store
            .get::<User>(&id)?
            .ok_or_else(|| FleetError::not_found(EntityKind::User, id))
    }

    fn update_user(&self, id: EntityId, patch: UserPatch) -> Result<User, FleetError> {
        let now = self.time_source.now();
        let name = patch.name.as_deref().map(normalize_name).transpose()?;
        let email = patch.email.as_deref().map(normalize_email).transpose()?;

        let user = self.store.transact(|uow| {
            let mut user = uow
                .get::<User>(&id)?
                .ok_or_else(|| FleetError::not_found(EntityKind::User, id))?;
            if let Some(email) = email {
                if email != user.email {
                    if uow.find_unique::<User>(&email)?.is_some() {
                        return Err(email_taken(&email));
                    }
                    user.email = email;
                }
            }
            if let Some(name) = name {
                user.name = name;
            }
            if let Some(role) = patch.role {
                user.role = role;
            }
            user.updated_at = now;
            uow.put(&user)?;
            Ok(user)
        })?;

        info!(user_id = %id, role = %user.role, "User updated");
        Ok(user)
    }

    fn delete_user(&self, id: EntityId) -> Result<User, FleetError> {
        let user = self.store.transact(|uow| {
            uow.delete::<User>(&id)?
                .ok_or_else(|| FleetError::not_found(EntityKind::User, id))
        })?;
        info!(user_id = %id, "User removed");
        Ok(user)
    }
}
