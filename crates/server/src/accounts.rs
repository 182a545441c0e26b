//! Accounts API endpoints.

use api_types::{
    account::{AccountNew, AccountUpdate, AccountView},
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
use engine::{AccountPatch, NewAccount};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let accounts = state.engine.accounts(user.id).await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<AccountNew>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let Json(payload) = payload?;
    let mut cmd = NewAccount::new(user.id, payload.account_name, payload.account_type);
    if let Some(balance) = payload.initial_balance {
        cmd = cmd.initial_balance(balance);
    }
    let account = state.engine.create_account(cmd).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AccountUpdate>, JsonRejection>,
) -> Result<Json<AccountView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = AccountPatch {
        name: payload.account_name,
        account_type: payload.account_type,
    };
    let account = state.engine.update_account(user.id, id, patch).await?;
    Ok(Json(account.into()))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(id) = id?;
    state.engine.delete_account(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transactions(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let Path(id) = id?;
    let transactions = state.engine.account_transactions(user.id, id).await?;
    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}
