use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::admin::model::AdminAccount;
use crate::group;
use crate::state::AppState;

use super::model::MessageDto;
use super::Id;

#[derive(Deserialize)]
pub struct CreateMessage {
    pub content: Option<String>,
    /// Base64-encoded image payload.
    pub image: Option<String>,
}

pub async fn create(
    Extension(actor): Extension<AdminAccount>,
    State(state): State<AppState>,
    Path(group_id): Path<group::Id>,
    Json(req): Json<CreateMessage>,
) -> crate::Result<(StatusCode, Json<MessageDto>)> {
    let message = state
        .message_service
        .create(&group_id, &actor.id, req.content, req.image)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Deserialize)]
pub struct EditMessage {
    pub content: String,
}

pub async fn edit(
    Extension(actor): Extension<AdminAccount>,
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(req): Json<EditMessage>,
) -> crate::Result<Json<MessageDto>> {
    let message = state
        .message_service
        .edit(&id, &actor.id, &req.content)
        .await?;

    Ok(Json(message))
}

pub async fn delete(
    Extension(actor): Extension<AdminAccount>,
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> crate::Result<StatusCode> {
    state.message_service.delete(&id, &actor.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
