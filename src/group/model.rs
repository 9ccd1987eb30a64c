use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::admin;

use super::{Id, Kind};

/// Longest content snippet carried by a preview; list views never need the
/// full message body.
const SNIPPET_LEN: usize = 120;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatGroup {
    pub id: Id,
    pub kind: Kind,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_by: Option<admin::Id>,
    pub created_at: DateTime<Utc>,
}

impl ChatGroup {
    pub fn general() -> Self {
        Self {
            id: Id::random(),
            kind: Kind::General,
            name: None,
            image: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    pub fn new(kind: Kind, name: Option<String>, image: Option<String>, creator: admin::Id) -> Self {
        Self {
            id: Id::random(),
            kind,
            name,
            image,
            created_by: Some(creator),
            created_at: Utc::now(),
        }
    }
}

/// Denormalized pointer to a group's latest message. Written under the same
/// lock as the message insert; rebuildable from the log if ever missing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupPreview {
    pub snippet: Option<String>,
    pub has_image: bool,
    pub sent_at: DateTime<Utc>,
}

impl GroupPreview {
    pub fn new(content: Option<&str>, has_image: bool, sent_at: DateTime<Utc>) -> Self {
        let snippet = content.map(|c| {
            if c.chars().count() > SNIPPET_LEN {
                c.chars().take(SNIPPET_LEN).collect()
            } else {
                c.to_string()
            }
        });

        Self {
            snippet,
            has_image,
            sent_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGroup {
    pub kind: Kind,
    pub name: Option<String>,
    /// Base64-encoded image payload, uploaded before the group is persisted.
    pub image: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<admin::Id>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub add_members: Vec<admin::Id>,
    #[serde(default)]
    pub remove_members: Vec<admin::Id>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GroupDto {
    pub id: Id,
    pub kind: Kind,
    pub name: Option<String>,
    pub image: Option<String>,
    pub last_message: Option<GroupPreview>,
    pub members: Vec<admin::Id>,
}
