use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::AdminAccount;
use super::Id;

/// Contract with the platform's account service. The single-super_admin
/// invariant is owned by that service; this core only reads accounts to
/// resolve the general group's membership and to authorize role-gated
/// operations.
#[async_trait]
pub trait AccountDirectory {
    async fn list_admins(&self) -> super::Result<Vec<AdminAccount>>;

    async fn get_admin(&self, id: &Id) -> super::Result<AdminAccount>;
}

pub struct InMemoryAccountDirectory {
    accounts: RwLock<HashMap<Id, AdminAccount>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, account: AdminAccount) -> Id {
        let id = account.id;
        self.accounts.write().await.insert(id, account);
        id
    }

    pub async fn remove(&self, id: &Id) {
        self.accounts.write().await.remove(id);
    }
}

impl Default for InMemoryAccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn list_admins(&self) -> super::Result<Vec<AdminAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().cloned().collect())
    }

    async fn get_admin(&self, id: &Id) -> super::Result<AdminAccount> {
        self.accounts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(super::Error::NotFound(*id))
    }
}
