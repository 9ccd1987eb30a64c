use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, patch, post};
use axum::Router;
use log::error;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::{attachment, group};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub type Result<T> = std::result::Result<T, Error>;

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

pub fn api<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/chat/groups/{id}/messages", post(handler::create))
        .route("/chat/messages/{id}", patch(handler::edit))
        .route("/chat/messages/{id}", delete(handler::delete))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("message not found: {0:?}")]
    NotFound(Option<Id>),
    #[error("only the sender may modify a message")]
    NotSender,
    #[error("the edit window for this message has elapsed")]
    EditWindowElapsed,
    #[error("message {0} is deleted")]
    Deleted(Id),
    #[error("invalid message request: {0}")]
    Validation(String),

    #[error(transparent)]
    _Group(#[from] group::Error),

    #[error(transparent)]
    _Attachment(#[from] attachment::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self}");

        let (status, message) = match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::NotSender | Self::EditWindowElapsed | Self::Deleted(_) => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            Self::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            Self::_Group(e) => return e.into_response(),
            Self::_Attachment(e) => return e.into_response(),
        };

        (status, message).into_response()
    }
}
