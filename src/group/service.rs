use std::collections::HashSet;
use std::sync::Arc;

use base64::prelude::{Engine, BASE64_STANDARD};
use bytes::Bytes;
use log::info;

use crate::admin::model::AdminAccount;
use crate::message::repository::MessageStore;
use crate::{admin, attachment};

use super::model::{ChatGroup, CreateGroup, GroupDto, UpdateGroup};
use super::repository::GroupStore;
use super::{Id, Kind, Result};

/// Membership manager: every group/membership mutation goes through here,
/// so the kind-specific invariants and the super_admin gate live in one
/// place.
#[derive(Clone)]
pub struct GroupService {
    repo: Arc<GroupStore>,
    messages: Arc<MessageStore>,
    directory: admin::Directory,
    attachments: attachment::Store,
}

impl GroupService {
    pub fn new(
        repo: Arc<GroupStore>,
        messages: Arc<MessageStore>,
        directory: admin::Directory,
        attachments: attachment::Store,
    ) -> Self {
        Self {
            repo,
            messages,
            directory,
            attachments,
        }
    }

    pub fn general_id(&self) -> Id {
        self.repo.general_id()
    }
}

impl GroupService {
    pub async fn create(&self, creator: &AdminAccount, req: CreateGroup) -> Result<GroupDto> {
        match req.kind {
            Kind::General => Err(super::Error::Validation(
                "the general group already exists and cannot be created".into(),
            )),
            Kind::Individual => self.create_individual(creator, req).await,
            Kind::Group => self.create_group(creator, req).await,
        }
    }

    async fn create_individual(&self, creator: &AdminAccount, req: CreateGroup) -> Result<GroupDto> {
        if req.name.is_some() || req.image.is_some() {
            return Err(super::Error::Validation(
                "individual chats carry no name or image".into(),
            ));
        }

        let [other] = req.member_ids.as_slice() else {
            return Err(super::Error::Validation(
                "an individual chat needs exactly one other member".into(),
            ));
        };
        let other = *other;

        if other == creator.id {
            return Err(super::Error::Validation(
                "cannot start an individual chat with yourself".into(),
            ));
        }

        self.ensure_known_admin(&other).await?;

        // One individual chat per pair: a repeated "start chat" returns the
        // existing group instead of forking the conversation.
        if let Some(existing) = self.repo.find_individual(&creator.id, &other).await {
            let group = self.repo.find(&existing).await?;
            return self.to_dto(group).await;
        }

        let group = ChatGroup::new(Kind::Individual, None, None, creator.id);
        let members = HashSet::from([creator.id, other]);

        let id = self.repo.insert(group.clone(), members).await;
        self.messages.create_log(id).await;

        info!("individual chat {id} created between {} and {other}", creator.id);
        self.to_dto(group).await
    }

    async fn create_group(&self, creator: &AdminAccount, req: CreateGroup) -> Result<GroupDto> {
        let name = req
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| super::Error::Validation("a group chat needs a name".into()))?
            .to_string();

        let mut members: HashSet<admin::Id> = req.member_ids.iter().copied().collect();
        members.remove(&creator.id);
        if members.is_empty() {
            return Err(super::Error::Validation(
                "a group chat needs at least one member besides its creator".into(),
            ));
        }

        for member in &members {
            self.ensure_known_admin(member).await?;
        }

        // Upload before anything is persisted so a failed upload leaves no
        // group behind.
        let image = match req.image {
            Some(b64) => Some(self.upload_image(&b64).await?),
            None => None,
        };

        members.insert(creator.id);
        let group = ChatGroup::new(Kind::Group, Some(name), image, creator.id);

        let id = self.repo.insert(group.clone(), members).await;
        self.messages.create_log(id).await;

        info!("group chat {id} created by {}", creator.id);
        self.to_dto(group).await
    }

    pub async fn update(
        &self,
        id: &Id,
        actor: &AdminAccount,
        req: UpdateGroup,
    ) -> Result<GroupDto> {
        let group = self.repo.find(id).await?;
        Self::ensure_group_kind(&group)?;
        Self::ensure_super_admin(actor)?;

        if let Some(name) = &req.name {
            if name.trim().is_empty() {
                return Err(super::Error::Validation("a group chat needs a name".into()));
            }
        }

        // The whole patch is validated before anything is persisted, so a
        // bad member list cannot leave a half-applied update behind.
        let mut members = self.repo.members(id).await?;
        for member in &req.add_members {
            self.ensure_known_admin(member).await?;
            if !members.insert(*member) {
                return Err(super::Error::AlreadyMember(*member));
            }
        }
        for target in &req.remove_members {
            self.ensure_removable(actor, target).await?;
            if !members.remove(target) {
                return Err(super::Error::NotMember);
            }
        }

        let image = match req.image {
            Some(b64) => Some(self.upload_image(&b64).await?),
            None => None,
        };

        let group = self.repo.update(id, req.name, image).await?;

        for member in req.add_members {
            self.repo.add_member(id, member).await?;
            info!("{member} added to group {id} by {}", actor.id);
        }
        for target in req.remove_members {
            self.repo.remove_member(id, &target).await?;
            info!("{target} removed from group {id} by {}", actor.id);
        }

        self.to_dto(group).await
    }

    pub async fn add_member(
        &self,
        id: &Id,
        actor: &AdminAccount,
        new_admin: admin::Id,
    ) -> Result<()> {
        let group = self.repo.find(id).await?;
        Self::ensure_group_kind(&group)?;
        Self::ensure_super_admin(actor)?;

        self.ensure_known_admin(&new_admin).await?;
        self.repo.add_member(id, new_admin).await?;

        info!("{new_admin} added to group {id} by {}", actor.id);
        Ok(())
    }

    pub async fn remove_member(
        &self,
        id: &Id,
        actor: &AdminAccount,
        target: admin::Id,
    ) -> Result<()> {
        let group = self.repo.find(id).await?;
        Self::ensure_group_kind(&group)?;
        Self::ensure_super_admin(actor)?;

        self.ensure_removable(actor, &target).await?;

        self.repo.remove_member(id, &target).await?;

        info!("{target} removed from group {id} by {}", actor.id);
        Ok(())
    }

    /// Cascade delete: memberships and the whole message log go with the
    /// group. The general group is never deletable.
    pub async fn delete(&self, id: &Id, actor: &AdminAccount) -> Result<()> {
        let group = self.repo.find(id).await?;
        Self::ensure_super_admin(actor)?;

        if group.kind == Kind::General {
            return Err(super::Error::Forbidden(
                "the general group cannot be deleted".into(),
            ));
        }

        self.repo.remove(id).await?;
        self.messages.remove_log(id).await;

        info!("group {id} deleted by {}", actor.id);
        Ok(())
    }

    /// Groups visible to the admin: the general group always comes first,
    /// the rest sorted by most recent activity.
    pub async fn list_for(&self, admin_id: &admin::Id) -> Result<Vec<GroupDto>> {
        let general = self.repo.find(&self.repo.general_id()).await?;
        let mut dtos = vec![self.to_dto(general).await?];

        let mut rest = Vec::new();
        for group in self.repo.find_for(admin_id).await {
            let created_at = group.created_at;
            let dto = self.to_dto(group).await?;
            let activity = dto
                .last_message
                .as_ref()
                .map(|p| p.sent_at)
                .unwrap_or(created_at);
            rest.push((activity, dto));
        }
        rest.sort_by_key(|(activity, _)| std::cmp::Reverse(*activity));

        dtos.extend(rest.into_iter().map(|(_, dto)| dto));
        Ok(dtos)
    }

    /// Fails `NotFound` when the group is gone and `NotMember` when the
    /// admin has no access. General group membership is virtual: any account
    /// known to the directory is a member.
    pub async fn ensure_member(&self, id: &Id, admin_id: &admin::Id) -> Result<ChatGroup> {
        let group = self.repo.find(id).await?;

        let is_member = match group.kind {
            Kind::General => self.directory.get_admin(admin_id).await.is_ok(),
            Kind::Group | Kind::Individual => self.repo.has_member(id, admin_id).await,
        };

        if !is_member {
            return Err(super::Error::NotMember);
        }

        Ok(group)
    }
}

impl GroupService {
    fn ensure_super_admin(actor: &AdminAccount) -> Result<()> {
        if !actor.is_super_admin() {
            return Err(super::Error::Forbidden(
                "only the super admin may manage groups".into(),
            ));
        }
        Ok(())
    }

    fn ensure_group_kind(group: &ChatGroup) -> Result<()> {
        if group.kind != Kind::Group {
            return Err(super::Error::Validation(
                "only group chats can be modified".into(),
            ));
        }
        Ok(())
    }

    async fn ensure_removable(&self, actor: &AdminAccount, target: &admin::Id) -> Result<()> {
        if *target == actor.id {
            return Err(super::Error::Forbidden(
                "cannot remove yourself from a group".into(),
            ));
        }
        if let Ok(account) = self.directory.get_admin(target).await {
            if account.is_super_admin() {
                return Err(super::Error::Forbidden(
                    "the super admin cannot be removed from a group".into(),
                ));
            }
        }
        Ok(())
    }

    async fn ensure_known_admin(&self, id: &admin::Id) -> Result<()> {
        self.directory
            .get_admin(id)
            .await
            .map(|_| ())
            .map_err(|_| super::Error::Validation(format!("unknown admin account: {id}")))
    }

    async fn upload_image(&self, b64: &str) -> Result<String> {
        let bytes = BASE64_STANDARD
            .decode(b64)
            .map_err(|e| super::Error::Validation(format!("invalid image encoding: {e}")))?;

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

    async fn to_dto(&self, group: ChatGroup) -> Result<GroupDto> {
        let members = match group.kind {
            // Virtual membership: always the directory's current account
            // set, never stored rows.
            Kind::General => self
                .directory
                .list_admins()
                .await?
                .into_iter()
                .map(|a| a.id)
                .collect(),
            Kind::Group | Kind::Individual => {
                self.repo.members(&group.id).await?.into_iter().collect()
            }
        };

        let name = match group.kind {
            Kind::General => Some("General".to_string()),
            _ => group.name,
        };

        Ok(GroupDto {
            id: group.id,
            kind: group.kind,
            name,
            image: group.image,
            last_message: self.messages.preview(&group.id).await,
            members,
        })
    }
}
