use std::sync::Arc;

use crate::group::repository::GroupStore;
use crate::group::service::GroupService;
use crate::message::repository::MessageStore;
use crate::message::service::MessageService;
use crate::sync::service::SyncService;
use crate::{admin, attachment};

#[derive(Clone)]
pub struct AppState {
    pub group_service: Arc<GroupService>,
    pub message_service: Arc<MessageService>,
    pub sync_service: SyncService,
    pub directory: admin::Directory,
}

impl AppState {
    pub async fn init(directory: admin::Directory, attachments: attachment::Store) -> Self {
        let group_store = Arc::new(GroupStore::new());
        let message_store = Arc::new(MessageStore::new());

        // The general group exists from the start and needs its log.
        message_store.create_log(group_store.general_id()).await;

        let group_service = Arc::new(GroupService::new(
            group_store,
            Arc::clone(&message_store),
            Arc::clone(&directory),
            Arc::clone(&attachments),
        ));
        let message_service = Arc::new(MessageService::new(
            message_store,
            Arc::clone(&group_service),
            attachments,
        ));
        let sync_service = SyncService::new(
            Arc::clone(&group_service),
            Arc::clone(&message_service),
        );

        Self {
            group_service,
            message_service,
            sync_service,
            directory,
        }
    }
}
