use tracing::{debug, info};

use murmur_store::Group;

use crate::engine::ChatEngine;
use crate::error::{EngineError, Result};
use crate::invite::Invitation;

impl ChatEngine {
    /// Put an invitation into the local inbox. Returns `false` if an
    /// invitation with the same id is already waiting.
    pub fn receive_invitation(&self, invitation: Invitation) -> Result<bool> {
        let mut inbox = self.inbox()?;
        if inbox.iter().any(|i| i.id == invitation.id) {
            debug!(invitation = %invitation.id, "Duplicate invitation ignored");
            return Ok(false);
        }
        info!(
            invitation = %invitation.id,
            group = %invitation.group.name,
            inviter = %invitation.inviter.id,
            "Invitation received"
        );
        inbox.push(invitation);
        Ok(true)
    }

    /// Decode a copiable invite code and put it into the inbox.
    pub fn receive_invite_code(&self, code: &str) -> Result<Invitation> {
        let invitation = Invitation::decode(code)?;
        self.receive_invitation(invitation.clone())?;
        Ok(invitation)
    }

    /// Invitations waiting for an answer, oldest first.
    pub fn pending_invitations(&self) -> Result<Vec<Invitation>> {
        Ok(self.inbox()?.clone())
    }

    /// Join the invited group: the local user is added to its members and
    /// the group is merged into canonical state. The invitation stays in
    /// the inbox if the merge fails.
    pub fn accept_invitation(&self, invitation_id: &str) -> Result<Group> {
        let mut inbox = self.inbox()?;
        let position = inbox
            .iter()
            .position(|i| i.id == invitation_id)
            .ok_or_else(|| EngineError::InvitationNotFound(invitation_id.to_string()))?;

        let mut group = inbox[position].group.clone();
        group.add_member(self.local_user()?);
        self.add_group(group.clone())?;

        inbox.remove(position);
        info!(invitation = invitation_id, group = %group.id, "Invitation accepted");
        Ok(group)
    }

    /// Drop an invitation without joining. Returns `false` if it was not
    /// in the inbox.
    pub fn decline_invitation(&self, invitation_id: &str) -> Result<bool> {
        let mut inbox = self.inbox()?;
        let before = inbox.len();
        inbox.retain(|i| i.id != invitation_id);
        let declined = inbox.len() != before;
        debug!(invitation = invitation_id, declined, "Invitation declined");
        Ok(declined)
    }

    /// Build an invitation to one of our groups, sent by the local user.
    pub fn invite_to_group(&self, group_id: &murmur_shared::GroupId) -> Result<Invitation> {
        let group = self.store.group(group_id)?;
        Ok(Invitation::new(group, self.local_user()?))
    }
}
