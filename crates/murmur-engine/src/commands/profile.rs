use tracing::info;

use murmur_store::User;

use crate::engine::ChatEngine;
use crate::error::{EngineError, Result};

impl ChatEngine {
    /// Change the local user's display name and avatar. Every group member
    /// list is updated along with the directory entry.
    pub fn update_profile(&self, name: &str, avatar_url: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyDisplayName);
        }

        let user = self.store.update_user(&self.local_user, |user| {
            user.name = name.to_string();
            user.avatar_url = avatar_url.trim().to_string();
        })?;
        info!(user = %user.id, name = %user.name, "Profile updated");
        Ok(user)
    }
}
