//! Demo data the node starts with: four users, three groups and one
//! pending invitation.

use chrono::{Duration, Utc};

use murmur_engine::{ChatEngine, Invitation};
use murmur_shared::{GroupId, MessageId, UserId};
use murmur_store::{FileInfo, Group, Message, MessageBody, User};

fn avatar(seed: &str) -> String {
    format!("https://picsum.photos/seed/{seed}/100/100")
}

/// Directory of demo users.
pub fn demo_users() -> Vec<User> {
    let mut casey = User::new("user-4", "Casey (Node D1)", avatar("casey"));
    casey.is_online = false;
    vec![
        User::new("user-1", "You (Node 7B)", avatar("you")),
        User::new("user-2", "Alex (Node A4)", avatar("alex")),
        User::new("user-3", "Sam (Node F9)", avatar("sam")),
        casey,
    ]
}

pub fn demo_user(id: &str) -> Option<User> {
    demo_users().into_iter().find(|u| u.id.as_str() == id)
}

fn file(name: &str, size: &str) -> Option<FileInfo> {
    Some(FileInfo {
        file_name: name.to_string(),
        file_size: size.to_string(),
    })
}

/// A message with a fixed id, posted `minutes_ago` and already read by
/// `readers` (the author always is).
fn message(id: &str, author: &str, content: &str, body: MessageBody, minutes_ago: i64, readers: &[&str]) -> Message {
    let mut message = Message::new(UserId::from(author), content, body);
    message.id = MessageId::from(id);
    message.timestamp = Utc::now() - Duration::minutes(minutes_ago);
    message.read_by.extend(readers.iter().map(|r| UserId::from(*r)));
    message
}

fn group(id: &str, name: &str, member_ids: &[&str], messages: Vec<Message>) -> Group {
    let members = member_ids.iter().filter_map(|id| demo_user(id)).collect();
    let mut group = Group::new(name, members, messages);
    group.id = GroupId::from(id);
    group
}

pub fn demo_groups() -> Vec<Group> {
    vec![
        group(
            "group-1",
            "Project Phoenix",
            &["user-1", "user-2", "user-3"],
            vec![
                message(
                    "msg-1-1",
                    "user-2",
                    "Hey everyone, check out the latest design mockups.",
                    MessageBody::Text,
                    95,
                    &["user-1"],
                ),
                message(
                    "msg-1-2",
                    "user-2",
                    "https://picsum.photos/seed/mockup/400/300",
                    MessageBody::Image(file("dashboard-v3.png", "1.2 MB")),
                    94,
                    &[],
                ),
                message(
                    "msg-1-3",
                    "user-3",
                    "Looks great! I especially like the new color palette.",
                    MessageBody::Text,
                    90,
                    &[],
                ),
                message(
                    "msg-1-4",
                    "user-1",
                    "Agreed. I will start implementing the sidebar component.",
                    MessageBody::Text,
                    87,
                    &["user-2"],
                ),
                message(
                    "msg-1-5",
                    "user-3",
                    "",
                    MessageBody::File(file("project-specs.pdf", "856 KB")),
                    60,
                    &[],
                ),
            ],
        ),
        group(
            "group-2",
            "Q3 Marketing",
            &["user-1", "user-2", "user-4"],
            vec![
                message(
                    "msg-2-1",
                    "user-4",
                    "What's the status on the video ad campaign?",
                    MessageBody::Text,
                    24 * 60,
                    &["user-1", "user-2"],
                ),
                message(
                    "msg-2-2",
                    "user-2",
                    "https://picsum.photos/seed/video/400/225",
                    MessageBody::Video(file("campaign-draft-v2.mp4", "15.7 MB")),
                    23 * 60,
                    &["user-1"],
                ),
                message(
                    "msg-2-3",
                    "user-1",
                    "Just reviewed it, adding my feedback now. Great work!",
                    MessageBody::Text,
                    180,
                    &[],
                ),
            ],
        ),
        group(
            "group-3",
            "Weekend Plans",
            &["user-1", "user-3"],
            vec![message(
                "msg-3-1",
                "user-3",
                "Anyone up for a hike this weekend?",
                MessageBody::Text,
                30,
                &[],
            )],
        ),
    ]
}

pub fn demo_invitation() -> Option<Invitation> {
    let sam = demo_user("user-3")?;
    let stealth = group(
        "group-4-stealth",
        "Stealth Ops",
        &["user-3"],
        vec![message(
            "msg-4-1",
            "user-3",
            "Ready for the mission?",
            MessageBody::Text,
            10,
            &[],
        )],
    );
    let mut invitation = Invitation::new(stealth, sam);
    invitation.id = "invite-1".to_string();
    Some(invitation)
}

/// Load the demo users, groups and invitation into `engine`.
pub fn seed_demo(engine: &ChatEngine) -> murmur_engine::Result<()> {
    for user in demo_users() {
        // The local user keeps the profile the engine was built with.
        if &user.id != engine.local_user_id() {
            engine.register_user(user)?;
        }
    }
    for group in demo_groups() {
        engine.add_group(group)?;
    }
    if let Some(invitation) = demo_invitation() {
        engine.receive_invitation(invitation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use murmur_feed::FeedConfig;

    use super::*;

    fn seeded() -> ChatEngine {
        let engine = ChatEngine::with_feed_config(
            demo_user("user-1").unwrap(),
            FeedConfig::default(),
            Some(7),
        )
        .unwrap();
        seed_demo(&engine).unwrap();
        engine
    }

    #[test]
    fn test_demo_unread_counts() {
        let engine = seeded();
        let unread: Vec<(String, usize)> = engine
            .group_summaries()
            .unwrap()
            .into_iter()
            .map(|s| (s.name, s.unread_count))
            .collect();
        assert_eq!(
            unread,
            vec![
                ("Project Phoenix".to_string(), 3),
                ("Q3 Marketing".to_string(), 0),
                ("Weekend Plans".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_demo_directory() {
        let engine = seeded();
        let users = engine.store().users().unwrap();
        assert_eq!(users.len(), 4);
        assert!(!users[3].is_online);
        assert_eq!(engine.pending_invitations().unwrap()[0].id, "invite-1");
    }

    #[test]
    fn test_accept_demo_invitation() {
        let engine = seeded();
        let group = engine.accept_invitation("invite-1").unwrap();
        assert_eq!(group.id, GroupId::from("group-4-stealth"));
        assert_eq!(engine.get_state().unwrap().len(), 4);
    }
}
