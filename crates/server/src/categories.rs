use api_types::{
    category::{CategoryNew, CategoryUpdate, CategoryView},
    transaction::TransactionView,
};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{CategoryPatch, NewCategory};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.categories(user.id).await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<CategoryNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;
    let mut cmd = NewCategory::new(user.id, payload.category_name);
    if let Some(budget) = payload.budget {
        cmd = cmd.budget(budget);
    }
    if let Some(group_id) = payload.group_id {
        cmd = cmd.group_id(group_id);
    }
    let category = state.engine.create_category(cmd).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<CategoryView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = CategoryPatch {
        name: payload.category_name,
        budget: payload.budget,
        group_id: payload.group_id,
    };
    let category = state.engine.update_category(user.id, id, patch).await?;
    Ok(Json(category.into()))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(id) = id?;
    state.engine.delete_category(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transactions(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let Path(id) = id?;
    let transactions = state.engine.category_transactions(user.id, id).await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}
