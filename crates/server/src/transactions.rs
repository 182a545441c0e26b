//! Transactions API endpoints.

use api_types::transaction::{TransactionNew, TransactionUpdate, TransactionView};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{NewTransaction, TransactionPatch};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state.engine.transactions(user.id).await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let Json(payload) = payload?;
    let mut cmd = NewTransaction::new(
        user.id,
        payload.account_id,
        payload.amount,
        payload.tx_description,
        payload.tx_date,
    )
    .posted(payload.posted);
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    let transaction = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction.into())))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = TransactionPatch {
        amount: payload.amount,
        description: payload.tx_description,
        date: payload.tx_date,
        posted: payload.posted,
        account_id: payload.account_id,
        category_id: payload.category_id,
    };
    let transaction = state.engine.update_transaction(user.id, id, patch).await?;
    Ok(Json(transaction.into()))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(id) = id?;
    state.engine.delete_transaction(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
