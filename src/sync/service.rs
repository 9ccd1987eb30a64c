use std::sync::Arc;

use crate::group::model::GroupDto;
use crate::group::service::GroupService;
use crate::message::model::MessageDto;
use crate::message::service::MessageService;
use crate::{admin, group, message};

/// The polling read path. Both calls are pure, idempotent reads returning a
/// full snapshot: no persistent connection, no deltas, no server-side state
/// per client. Clients call `messages` on an interval while a group is open
/// and `group_list` after any mutation; the server's store stays the single
/// source of truth and every response fully reconciles the client's view.
#[derive(Clone)]
pub struct SyncService {
    groups: Arc<GroupService>,
    messages: Arc<MessageService>,
}

impl SyncService {
    pub fn new(groups: Arc<GroupService>, messages: Arc<MessageService>) -> Self {
        Self { groups, messages }
    }

    pub async fn group_list(&self, admin_id: &admin::Id) -> group::Result<Vec<GroupDto>> {
        self.groups.list_for(admin_id).await
    }

    pub async fn messages(
        &self,
        group_id: &group::Id,
        admin_id: &admin::Id,
    ) -> message::Result<Vec<MessageDto>> {
        self.messages.list(group_id, admin_id).await
    }
}
