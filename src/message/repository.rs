use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::group;
use crate::group::model::GroupPreview;
use crate::admin;

use super::model::Message;
use super::Id;

struct GroupLog {
    next_seq: u64,
    messages: Vec<Message>,
    preview: Option<GroupPreview>,
}

impl GroupLog {
    fn new() -> Self {
        Self {
            next_seq: 0,
            messages: Vec::new(),
            preview: None,
        }
    }

    /// Preview of the latest non-deleted message, straight from the log.
    fn latest_preview(&self) -> Option<GroupPreview> {
        self.messages
            .iter()
            .rev()
            .find(|m| !m.is_deleted)
            .map(|m| GroupPreview::new(m.content.as_deref(), m.image.is_some(), m.created_at))
    }
}

/// Append-only message log, one per group. Writers to the same group are
/// serialized by that group's write lock, which assigns a strictly
/// increasing `(created_at, seq)` pair and refreshes the denormalized
/// preview in the same critical section; groups stay independent of each
/// other, and readers only take the read side.
pub struct MessageStore {
    logs: RwLock<HashMap<group::Id, Arc<RwLock<GroupLog>>>>,
    index: RwLock<HashMap<Id, group::Id>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
            index: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_log(&self, group_id: group::Id) {
        self.logs
            .write()
            .await
            .entry(group_id)
            .or_insert_with(|| Arc::new(RwLock::new(GroupLog::new())));
    }

    /// Drops the group's whole log. Part of group deletion's cascade.
    pub async fn remove_log(&self, group_id: &group::Id) {
        self.logs.write().await.remove(group_id);
        self.index.write().await.retain(|_, g| g != group_id);
    }

    async fn log_of(&self, group_id: &group::Id) -> super::Result<Arc<RwLock<GroupLog>>> {
        self.logs
            .read()
            .await
            .get(group_id)
            .cloned()
            .ok_or(super::Error::_Group(group::Error::NotFound(Some(*group_id))))
    }

    pub async fn append(
        &self,
        group_id: group::Id,
        sender: admin::Id,
        content: Option<String>,
        image: Option<String>,
    ) -> super::Result<Message> {
        let log = self.log_of(&group_id).await?;
        let message = {
            let mut log = log.write().await;

            // Server-assigned timestamps must stay strictly ascending per
            // group even if the wall clock stalls between two appends.
            let now = Utc::now();
            let created_at = match log.messages.last() {
                Some(last) if last.created_at >= now => {
                    last.created_at + Duration::microseconds(1)
                }
                _ => now,
            };

            let seq = log.next_seq;
            log.next_seq += 1;

            let message = Message::new(group_id, sender, content, image, seq, created_at);
            log.preview = Some(GroupPreview::new(
                message.content.as_deref(),
                message.image.is_some(),
                message.created_at,
            ));
            log.messages.push(message.clone());

            message
        };

        // The group can be deleted while the append is in flight. The index
        // entry is only written while the log is still registered; otherwise
        // `remove_log`'s cleanup has already run and an entry added now
        // would never be dropped.
        {
            let mut index = self.index.write().await;
            if !self.logs.read().await.contains_key(&group_id) {
                return Err(super::Error::_Group(group::Error::NotFound(Some(group_id))));
            }
            index.insert(message.id, group_id);
        }

        Ok(message)
    }

    pub async fn find(&self, id: &Id) -> super::Result<Message> {
        let group_id = self.group_of(id).await?;
        let log = self.log_of(&group_id).await?;
        let log = log.read().await;

        log.messages
            .iter()
            .find(|m| m.id == *id)
            .cloned()
            .ok_or(super::Error::NotFound(Some(*id)))
    }

    /// Edit self-loop: content is replaced, an existing image is left
    /// untouched. Guarded by the sender/window/deleted lifecycle check.
    pub async fn edit(&self, id: &Id, actor: &admin::Id, content: &str) -> super::Result<Message> {
        self.mutate(id, |message| {
            let now = Utc::now();
            message.ensure_mutable(actor, now)?;

            message.content = Some(content.to_string());
            message.is_edited = true;
            message.edited_at = Some(now);
            Ok(())
        })
        .await
    }

    /// Terminal transition: clears content and image, keeps the record as a
    /// tombstone for stable ordering. Never reversible.
    pub async fn delete(&self, id: &Id, actor: &admin::Id) -> super::Result<Message> {
        self.mutate(id, |message| {
            message.ensure_mutable(actor, Utc::now())?;

            message.is_deleted = true;
            message.content = None;
            message.image = None;
            Ok(())
        })
        .await
    }

    async fn mutate(
        &self,
        id: &Id,
        apply: impl FnOnce(&mut Message) -> super::Result<()>,
    ) -> super::Result<Message> {
        let group_id = self.group_of(id).await?;
        let log = self.log_of(&group_id).await?;
        let mut log = log.write().await;

        let idx = log
            .messages
            .iter()
            .position(|m| m.id == *id)
            .ok_or(super::Error::NotFound(Some(*id)))?;

        apply(&mut log.messages[idx])?;
        let updated = log.messages[idx].clone();

        // Edits and deletes can touch the latest message, so the preview is
        // refreshed under the same write lock as the mutation itself.
        let preview = log.latest_preview();
        log.preview = preview;

        Ok(updated)
    }

    /// Full ordered log, tombstones included. The log is built in
    /// `(created_at, seq)` order, so repeated reads are total and stable.
    pub async fn list(&self, group_id: &group::Id) -> super::Result<Vec<Message>> {
        let log = self.log_of(group_id).await?;
        let log = log.read().await;
        Ok(log.messages.clone())
    }

    /// Denormalized last-message preview; recomputed from the log when the
    /// stored projection is missing.
    pub async fn preview(&self, group_id: &group::Id) -> Option<GroupPreview> {
        let log = self.logs.read().await.get(group_id).cloned()?;
        let log = log.read().await;

        if let Some(preview) = &log.preview {
            return Some(preview.clone());
        }

        log.latest_preview()
    }

    async fn group_of(&self, id: &Id) -> super::Result<group::Id> {
        self.index
            .read()
            .await
            .get(id)
            .copied()
            .ok_or(super::Error::NotFound(Some(*id)))
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
