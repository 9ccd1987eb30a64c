use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;

use crate::admin::model::AdminAccount;
use crate::group;
use crate::group::model::GroupDto;
use crate::message::model::MessageDto;
use crate::state::AppState;

pub async fn groups(
    Extension(actor): Extension<AdminAccount>,
    State(state): State<AppState>,
) -> crate::Result<Json<Vec<GroupDto>>> {
    let groups = state.sync_service.group_list(&actor.id).await?;
    Ok(Json(groups))
}

#[derive(Serialize)]
pub struct MessageLog {
    pub messages: Vec<MessageDto>,
}

pub async fn messages(
    Extension(actor): Extension<AdminAccount>,
    State(state): State<AppState>,
    Path(group_id): Path<group::Id>,
) -> crate::Result<Json<MessageLog>> {
    let messages = state.sync_service.messages(&group_id, &actor.id).await?;
    Ok(Json(MessageLog { messages }))
}
