use std::sync::Arc;

use base64::prelude::{Engine, BASE64_STANDARD};
use bytes::Bytes;
use log::info;

use crate::group::service::GroupService;
use crate::{admin, attachment, group};

use super::model::MessageDto;
use super::repository::MessageStore;
use super::{Id, Result};

/// Message lifecycle manager: membership and input validation up front,
/// attachment upload before anything is persisted, then the store applies
/// the append/edit/delete under the group's lock.
#[derive(Clone)]
pub struct MessageService {
    repo: Arc<MessageStore>,
    groups: Arc<GroupService>,
    attachments: attachment::Store,
}

impl MessageService {
    pub fn new(
        repo: Arc<MessageStore>,
        groups: Arc<GroupService>,
        attachments: attachment::Store,
    ) -> Self {
        Self {
            repo,
            groups,
            attachments,
        }
    }
}

impl MessageService {
    pub async fn create(
        &self,
        group_id: &group::Id,
        sender: &admin::Id,
        content: Option<String>,
        image: Option<String>,
    ) -> Result<MessageDto> {
        self.groups.ensure_member(group_id, sender).await?;

        let content = content.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        if content.is_none() && image.is_none() {
            return Err(super::Error::Validation(
                "a message needs content or an image".into(),
            ));
        }

        // The upload is the one failure-prone step; it runs first so a
        // failed upload aborts the create with nothing persisted.
        let image = match image {
            Some(b64) => Some(self.upload_image(&b64).await?),
            None => None,
        };

        let message = self.repo.append(*group_id, *sender, content, image).await?;

        info!("message {} appended to group {group_id}", message.id);
        Ok(message.into())
    }

    pub async fn edit(&self, id: &Id, actor: &admin::Id, content: &str) -> Result<MessageDto> {
        let content = content.trim();
        if content.is_empty() {
            return Err(super::Error::Validation(
                "edited content cannot be empty".into(),
            ));
        }

        let message = self.repo.edit(id, actor, content).await?;
        Ok(message.into())
    }

    pub async fn delete(&self, id: &Id, actor: &admin::Id) -> Result<()> {
        self.repo.delete(id, actor).await?;

        info!("message {id} deleted by its sender");
        Ok(())
    }

    pub async fn list(&self, group_id: &group::Id, actor: &admin::Id) -> Result<Vec<MessageDto>> {
        self.groups.ensure_member(group_id, actor).await?;

        let messages = self.repo.list(group_id).await?;
        Ok(messages.into_iter().map(MessageDto::from).collect())
    }
}

impl MessageService {
    async fn upload_image(&self, b64: &str) -> Result<String> {
        let bytes = BASE64_STANDARD
            .decode(b64)
            .map_err(|e| super::Error::Validation(format!("invalid image encoding: {e}")))?;

        // The size cap is this core's rule, not the blob store's; it holds
        // no matter which store implementation is wired in.
        if bytes.len() > attachment::MAX_BYTES {
            return Err(super::Error::Validation(format!(
                "image of {} bytes exceeds the {} byte limit",
                bytes.len(),
                attachment::MAX_BYTES
            )));
        }

        let url = self.attachments.upload(Bytes::from(bytes)).await?;
        Ok(url)
    }
}
