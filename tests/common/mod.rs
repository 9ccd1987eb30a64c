use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use staffchat::admin::directory::InMemoryAccountDirectory;
use staffchat::admin::model::AdminAccount;
use staffchat::admin::{self, Role};
use staffchat::attachment::store::{AttachmentStore, InMemoryAttachmentStore};
use staffchat::attachment;
use staffchat::group::model::CreateGroup;
use staffchat::group::repository::GroupStore;
use staffchat::group::service::GroupService;
use staffchat::group::{self, Kind};
use staffchat::message::repository::MessageStore;
use staffchat::message::service::MessageService;
use staffchat::sync::service::SyncService;

pub struct TestApp {
    pub directory: Arc<InMemoryAccountDirectory>,
    pub groups: Arc<GroupService>,
    pub messages: Arc<MessageService>,
    pub sync: SyncService,
    pub general: group::Id,
    pub owner: AdminAccount,
    pub alice: AdminAccount,
    pub bob: AdminAccount,
    pub mia: AdminAccount,
}

pub async fn app() -> TestApp {
    app_with(Arc::new(InMemoryAttachmentStore::new())).await
}

pub async fn app_with(attachments: attachment::Store) -> TestApp {
    let directory = Arc::new(InMemoryAccountDirectory::new());

    let owner = AdminAccount::new("owner@restaurant.local", "Owner", Role::SuperAdmin);
    let alice = AdminAccount::new("alice@restaurant.local", "Alice", Role::Admin);
    let bob = AdminAccount::new("bob@restaurant.local", "Bob", Role::Admin);
    let mia = AdminAccount::new("mia@restaurant.local", "Mia", Role::Moderator);

    directory.insert(owner.clone()).await;
    directory.insert(alice.clone()).await;
    directory.insert(bob.clone()).await;
    directory.insert(mia.clone()).await;

    let group_store = Arc::new(GroupStore::new());
    let message_store = Arc::new(MessageStore::new());
    let general = group_store.general_id();
    message_store.create_log(general).await;

    let dyn_directory: admin::Directory = directory.clone();
    let groups = Arc::new(GroupService::new(
        group_store,
        Arc::clone(&message_store),
        dyn_directory,
        Arc::clone(&attachments),
    ));
    let messages = Arc::new(MessageService::new(
        message_store,
        Arc::clone(&groups),
        attachments,
    ));
    let sync = SyncService::new(Arc::clone(&groups), Arc::clone(&messages));

    TestApp {
        directory,
        groups,
        messages,
        sync,
        general,
        owner,
        alice,
        bob,
        mia,
    }
}

pub fn group_request(name: &str, members: Vec<admin::Id>) -> CreateGroup {
    CreateGroup {
        kind: Kind::Group,
        name: Some(name.to_string()),
        image: None,
        member_ids: members,
    }
}

pub fn individual_request(other: admin::Id) -> CreateGroup {
    CreateGroup {
        kind: Kind::Individual,
        name: None,
        image: None,
        member_ids: vec![other],
    }
}

/// Stand-in for an unreachable blob store; every upload fails.
pub struct FailingAttachmentStore;

#[async_trait]
impl AttachmentStore for FailingAttachmentStore {
    async fn upload(&self, _data: Bytes) -> Result<String, attachment::Error> {
        Err(attachment::Error::Unavailable("blob store down".into()))
    }
}

/// Blob store with no limit of its own; every upload succeeds.
pub struct LenientAttachmentStore;

#[async_trait]
impl AttachmentStore for LenientAttachmentStore {
    async fn upload(&self, _data: Bytes) -> Result<String, attachment::Error> {
        Ok("attachment://lenient".to_string())
    }
}
