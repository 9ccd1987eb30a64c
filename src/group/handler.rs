use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::admin::model::AdminAccount;
use crate::state::AppState;

use super::model::{CreateGroup, GroupDto, UpdateGroup};
use super::Id;

pub async fn create(
    Extension(actor): Extension<AdminAccount>,
    State(state): State<AppState>,
    Json(req): Json<CreateGroup>,
) -> crate::Result<(StatusCode, Json<GroupDto>)> {
    let group = state.group_service.create(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn update(
    Extension(actor): Extension<AdminAccount>,
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(req): Json<UpdateGroup>,
) -> crate::Result<Json<GroupDto>> {
    let group = state.group_service.update(&id, &actor, req).await?;
    Ok(Json(group))
}

pub async fn delete(
    Extension(actor): Extension<AdminAccount>,
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> crate::Result<StatusCode> {
    state.group_service.delete(&id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
