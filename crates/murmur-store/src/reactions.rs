use murmur_shared::UserId;

use crate::models::Message;

impl Message {
    /// Flip `user_id`'s reaction with `emoji`. Returns `true` if the
    /// reaction is present afterwards. An emoji left without users is
    /// removed from the map.
    pub fn toggle_reaction(&mut self, user_id: &UserId, emoji: &str) -> bool {
        let users = self.reactions.entry(emoji.to_string()).or_default();

        if users.remove(user_id) {
            if users.is_empty() {
                self.reactions.remove(emoji);
            }
            false
        } else {
            users.insert(user_id.clone());
            true
        }
    }

    pub fn has_reacted(&self, user_id: &UserId, emoji: &str) -> bool {
        self.reactions
            .get(emoji)
            .is_some_and(|users| users.contains(user_id))
    }

    /// Total number of (user, emoji) reactions on this message.
    pub fn reaction_count(&self) -> usize {
        self.reactions.values().map(|users| users.len()).sum()
    }

    /// Drop emoji keys that have no users left. Returns how many went.
    pub fn prune_reactions(&mut self) -> usize {
        let before = self.reactions.len();
        self.reactions.retain(|_, users| !users.is_empty());
        before - self.reactions.len()
    }

    /// Record that `user_id` has seen this message. Returns `true` if the
    /// receipt is new.
    pub fn mark_read(&mut self, user_id: &UserId) -> bool {
        self.read_by.insert(user_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageBody;

    fn message() -> Message {
        Message::new(UserId::from("user-1"), "hi", MessageBody::Text)
    }

    #[test]
    fn test_toggle_twice_drops_key() {
        let mut msg = message();
        let bob = UserId::from("user-2");

        assert!(msg.toggle_reaction(&bob, "👍"));
        assert!(msg.has_reacted(&bob, "👍"));

        assert!(!msg.toggle_reaction(&bob, "👍"));
        assert!(!msg.reactions.contains_key("👍"));
    }

    #[test]
    fn test_toggle_parity_over_many_calls() {
        let mut msg = message();
        let bob = UserId::from("user-2");
        let carol = UserId::from("user-3");
        msg.toggle_reaction(&carol, "🎉");

        for count in 1..=9 {
            msg.toggle_reaction(&bob, "🎉");
            assert_eq!(msg.has_reacted(&bob, "🎉"), count % 2 == 1);
            // Another user's reaction keeps the key alive.
            assert!(msg.reactions.contains_key("🎉"));
        }
        assert_eq!(msg.reaction_count(), 2);
    }

    #[test]
    fn test_reaction_sets_are_per_emoji() {
        let mut msg = message();
        let bob = UserId::from("user-2");
        msg.toggle_reaction(&bob, "👍");
        msg.toggle_reaction(&bob, "❤️");
        assert_eq!(msg.reactions.len(), 2);
        msg.toggle_reaction(&bob, "👍");
        assert_eq!(msg.reactions.keys().collect::<Vec<_>>(), vec!["❤️"]);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut msg = message();
        let bob = UserId::from("user-2");
        assert!(msg.mark_read(&bob));
        assert!(!msg.mark_read(&bob));
        assert_eq!(msg.read_by.len(), 2);
    }
}
