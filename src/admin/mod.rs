use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::{Deserialize, Serialize};

pub mod directory;
pub mod middleware;
pub mod model;

type Result<T> = std::result::Result<T, Error>;

/// Handle to the platform's staff identity provider. The messaging core
/// only ever reads from it.
pub type Directory = Arc<dyn directory::AccountDirectory + Send + Sync>;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Id(pub uuid::Uuid);

impl Id {
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Moderator,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("admin account not found: {0}")]
    NotFound(Id),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self}");

        let status = match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}
