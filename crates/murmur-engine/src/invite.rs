use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use murmur_store::{Group, User};

/// An offer to join an existing group, carrying the group as the inviter
/// sees it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invitation {
    pub id: String,
    pub group: Group,
    pub inviter: User,
}

impl Invitation {
    pub fn new(group: Group, inviter: User) -> Self {
        Self {
            id: format!("invite-{}", uuid::Uuid::new_v4()),
            group,
            inviter,
        }
    }

    /// Invite code: the bincode form, base64url without padding, so it
    /// survives copy and paste through chat or a URL.
    pub fn encode(&self) -> Result<String, InviteError> {
        let bytes = bincode::serialize(self).map_err(|_| InviteError::InvalidFormat)?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Parse an invite code. Surrounding whitespace is ignored.
    pub fn decode(code: &str) -> Result<Self, InviteError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(code.trim())
            .map_err(|_| InviteError::Base64Decode)?;
        bincode::deserialize(&bytes).map_err(|_| InviteError::InvalidFormat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InviteError {
    #[error("Invalid invite format")]
    InvalidFormat,

    #[error("Base64 decode error")]
    Base64Decode,
}
