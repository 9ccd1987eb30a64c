use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;

use crate::{admin, attachment, group, message};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("authentication required")]
    Unauthorized,

    #[error(transparent)]
    _Admin(#[from] admin::Error),

    #[error(transparent)]
    _Group(#[from] group::Error),

    #[error(transparent)]
    _Message(#[from] message::Error),

    #[error(transparent)]
    _Attachment(#[from] attachment::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => {
                error!("{self}");
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }

            Self::_Admin(e) => e.into_response(),
            Self::_Group(e) => e.into_response(),
            Self::_Message(e) => e.into_response(),
            Self::_Attachment(e) => e.into_response(),
        }
    }
}
