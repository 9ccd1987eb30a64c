use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, patch, post};
use axum::Router;
use log::error;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::{admin, attachment};

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

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    General,
    Group,
    Individual,
}

pub fn api<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/chat/groups", post(handler::create))
        .route("/chat/groups/{id}", patch(handler::update))
        .route("/chat/groups/{id}", delete(handler::delete))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("group not found: {0:?}")]
    NotFound(Option<Id>),
    #[error("admin is not a member of the group")]
    NotMember,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid group request: {0}")]
    Validation(String),
    #[error("admin {0} is already a member")]
    AlreadyMember(admin::Id),

    #[error(transparent)]
    _Admin(#[from] admin::Error),

    #[error(transparent)]
    _Attachment(#[from] attachment::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self}");

        let (status, message) = match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::NotMember | Self::Forbidden(_) => (StatusCode::FORBIDDEN, self.to_string()),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::AlreadyMember(_) => (StatusCode::CONFLICT, self.to_string()),

            Self::_Admin(e) => return e.into_response(),
            Self::_Attachment(e) => return e.into_response(),
        };

        (status, message).into_response()
    }
}
