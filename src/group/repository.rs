use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::admin;

use super::model::ChatGroup;
use super::{Id, Kind};

/// Group records plus explicit membership edges. Membership rows exist only
/// for `Group` and `Individual` kinds; the general group's membership is
/// virtual and resolved from the account directory at read time.
pub struct GroupStore {
    groups: RwLock<HashMap<Id, ChatGroup>>,
    members: RwLock<HashMap<Id, HashSet<admin::Id>>>,
    general: Id,
}

impl GroupStore {
    pub fn new() -> Self {
        let general = ChatGroup::general();
        let general_id = general.id;

        let mut groups = HashMap::new();
        groups.insert(general_id, general);

        Self {
            groups: RwLock::new(groups),
            members: RwLock::new(HashMap::new()),
            general: general_id,
        }
    }

    pub fn general_id(&self) -> Id {
        self.general
    }

    pub async fn insert(&self, group: ChatGroup, members: HashSet<admin::Id>) -> Id {
        let id = group.id;
        self.groups.write().await.insert(id, group);
        self.members.write().await.insert(id, members);
        id
    }

    pub async fn find(&self, id: &Id) -> super::Result<ChatGroup> {
        self.groups
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(super::Error::NotFound(Some(*id)))
    }

    pub async fn update(
        &self,
        id: &Id,
        name: Option<String>,
        image: Option<String>,
    ) -> super::Result<ChatGroup> {
        let mut groups = self.groups.write().await;
        let group = groups.get_mut(id).ok_or(super::Error::NotFound(Some(*id)))?;

        if let Some(name) = name {
            group.name = Some(name);
        }
        if let Some(image) = image {
            group.image = Some(image);
        }

        Ok(group.clone())
    }

    /// Removes the group and all of its membership rows.
    pub async fn remove(&self, id: &Id) -> super::Result<()> {
        self.groups
            .write()
            .await
            .remove(id)
            .ok_or(super::Error::NotFound(Some(*id)))?;
        self.members.write().await.remove(id);
        Ok(())
    }

    pub async fn members(&self, id: &Id) -> super::Result<HashSet<admin::Id>> {
        self.groups
            .read()
            .await
            .get(id)
            .ok_or(super::Error::NotFound(Some(*id)))?;

        Ok(self
            .members
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    pub async fn has_member(&self, id: &Id, admin_id: &admin::Id) -> bool {
        self.members
            .read()
            .await
            .get(id)
            .is_some_and(|m| m.contains(admin_id))
    }

    pub async fn add_member(&self, id: &Id, admin_id: admin::Id) -> super::Result<()> {
        let mut members = self.members.write().await;
        let group = members.entry(*id).or_default();

        if !group.insert(admin_id) {
            return Err(super::Error::AlreadyMember(admin_id));
        }

        Ok(())
    }

    pub async fn remove_member(&self, id: &Id, admin_id: &admin::Id) -> super::Result<()> {
        let mut members = self.members.write().await;
        let group = members.get_mut(id).ok_or(super::Error::NotFound(Some(*id)))?;

        if !group.remove(admin_id) {
            return Err(super::Error::NotMember);
        }

        Ok(())
    }

    /// Looks up the individual chat between exactly this pair of admins.
    pub async fn find_individual(&self, a: &admin::Id, b: &admin::Id) -> Option<Id> {
        let groups = self.groups.read().await;
        let members = self.members.read().await;

        members
            .iter()
            .filter(|(id, edges)| {
                edges.len() == 2
                    && edges.contains(a)
                    && edges.contains(b)
                    && groups.get(id).is_some_and(|g| g.kind == Kind::Individual)
            })
            .map(|(id, _)| *id)
            .next()
    }

    /// All groups with an explicit membership row for the admin. The general
    /// group is never part of this result; callers include it themselves.
    pub async fn find_for(&self, admin_id: &admin::Id) -> Vec<ChatGroup> {
        let groups = self.groups.read().await;
        let members = self.members.read().await;

        members
            .iter()
            .filter(|(_, edges)| edges.contains(admin_id))
            .filter_map(|(id, _)| groups.get(id).cloned())
            .collect()
    }
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}
