//! Category group endpoints.

use api_types::group::{GroupNew, GroupUpdate, GroupView};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::GroupPatch;
use uuid::Uuid;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<GroupView>>, ServerError> {
    let groups = state.engine.groups(user.id).await?;
    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<GroupNew>, JsonRejection>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let Json(payload) = payload?;
    let group = state
        .engine
        .create_group(user.id, &payload.group_name)
        .await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<GroupUpdate>, JsonRejection>,
) -> Result<Json<GroupView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = GroupPatch {
        name: payload.group_name,
    };
    let group = state.engine.update_group(user.id, id, patch).await?;
    Ok(Json(group.into()))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(id) = id?;
    state.engine.delete_group(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
