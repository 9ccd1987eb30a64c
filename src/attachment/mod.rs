use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;

pub mod store;

type Result<T> = std::result::Result<T, Error>;

pub type Store = Arc<dyn store::AttachmentStore + Send + Sync>;

/// Hard cap on a single uploaded image.
pub const MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("attachment of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    #[error("attachment store unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self}");

        let status = match self {
            Self::TooLarge { .. } => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
        };

        (status, self.to_string()).into_response()
    }
}
