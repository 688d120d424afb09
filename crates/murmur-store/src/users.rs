//! User directory operations on [`EntityStore`].

use murmur_shared::UserId;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::models::User;
use crate::store::EntityStore;

impl EntityStore {
    /// All known users, ordered by id.
    pub fn users(&self) -> Result<Vec<User>> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    pub fn user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    /// Insert or replace a directory entry.
    pub fn upsert_user(&self, user: User) -> Result<()> {
        let mut guard = self.lock()?;
        debug!(user = %user.id, "Upserting user");
        guard.users.insert(user.id.clone(), user);
        Ok(())
    }

    /// Update a user's profile and propagate it to every member list the
    /// user appears in. Returns the updated record.
    pub fn update_user(&self, id: &UserId, update: impl FnOnce(&mut User)) -> Result<User> {
        let mut guard = self.lock()?;
        let user = guard
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))?;
        update(user);
        let updated = user.clone();

        for group in guard.groups.iter_mut() {
            for member in group.members.iter_mut().filter(|m| &m.id == id) {
                *member = updated.clone();
            }
        }

        debug!(user = %id, name = %updated.name, "Updated user profile");
        Ok(updated)
    }
}
