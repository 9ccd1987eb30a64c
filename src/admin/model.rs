use serde::{Deserialize, Serialize};

use super::{Id, Role};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: Id,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub role: Role,
}

impl AdminAccount {
    pub fn new(email: &str, name: &str, role: Role) -> Self {
        Self {
            id: Id::random(),
            email: email.to_string(),
            name: name.to_string(),
            image: None,
            role,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}
