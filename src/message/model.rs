use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{admin, group};

use super::Id;

/// How long after creation the sender may still edit or delete a message.
pub const EDIT_WINDOW_SECS: i64 = 5 * 60;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: Id,
    pub group_id: group::Id,
    pub sender: admin::Id,
    pub content: Option<String>,
    pub image: Option<String>,
    /// Insertion sequence within the group, assigned under the group's
    /// write lock; ties on `created_at` are broken by this.
    pub seq: u64,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub is_edited: bool,
    pub is_deleted: bool,
}

impl Message {
    pub fn new(
        group_id: group::Id,
        sender: admin::Id,
        content: Option<String>,
        image: Option<String>,
        seq: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Id::random(),
            group_id,
            sender,
            content,
            image,
            seq,
            created_at,
            edited_at: None,
            is_edited: false,
            is_deleted: false,
        }
    }

    /// Lifecycle guard for the `Edited` self-loop and the terminal
    /// `Deleted` transition: sender-only, within the edit window, and never
    /// once deleted. Ownership is by original sender, not by group role.
    pub fn ensure_mutable(&self, actor: &admin::Id, now: DateTime<Utc>) -> super::Result<()> {
        if self.is_deleted {
            return Err(super::Error::Deleted(self.id));
        }
        if self.sender != *actor {
            return Err(super::Error::NotSender);
        }
        if now.signed_duration_since(self.created_at).num_seconds() >= EDIT_WINDOW_SECS {
            return Err(super::Error::EditWindowElapsed);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MessageDto {
    pub id: Id,
    pub group_id: group::Id,
    pub sender: admin::Id,
    pub content: Option<String>,
    pub image: Option<String>,
    pub seq: u64,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub is_edited: bool,
    pub is_deleted: bool,
}

impl From<Message> for MessageDto {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            group_id: m.group_id,
            sender: m.sender,
            content: m.content,
            image: m.image,
            seq: m.seq,
            created_at: m.created_at,
            edited_at: m.edited_at,
            is_edited: m.is_edited,
            is_deleted: m.is_deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn message(sender: admin::Id, created_at: DateTime<Utc>) -> Message {
        Message::new(
            group::Id::random(),
            sender,
            Some("hello".into()),
            None,
            0,
            created_at,
        )
    }

    #[test]
    fn sender_may_mutate_within_window() {
        let sender = admin::Id::random();
        let now = Utc::now();
        let msg = message(sender, now - Duration::minutes(2));

        assert!(msg.ensure_mutable(&sender, now).is_ok());
    }

    #[test]
    fn mutation_fails_once_window_elapsed() {
        let sender = admin::Id::random();
        let now = Utc::now();
        let msg = message(sender, now - Duration::minutes(6));

        assert!(matches!(
            msg.ensure_mutable(&sender, now),
            Err(crate::message::Error::EditWindowElapsed)
        ));
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let sender = admin::Id::random();
        let now = Utc::now();
        let msg = message(sender, now - Duration::minutes(5));

        assert!(matches!(
            msg.ensure_mutable(&sender, now),
            Err(crate::message::Error::EditWindowElapsed)
        ));
    }

    #[test]
    fn only_the_sender_may_mutate() {
        let sender = admin::Id::random();
        let other = admin::Id::random();
        let now = Utc::now();
        let msg = message(sender, now);

        assert!(matches!(
            msg.ensure_mutable(&other, now),
            Err(crate::message::Error::NotSender)
        ));
    }

    #[test]
    fn deleted_messages_are_terminal() {
        let sender = admin::Id::random();
        let now = Utc::now();
        let mut msg = message(sender, now);
        msg.is_deleted = true;

        assert!(matches!(
            msg.ensure_mutable(&sender, now),
            Err(crate::message::Error::Deleted(_))
        ));
    }
}
