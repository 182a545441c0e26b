use std::time::Duration;

use api_types::{
    ErrorResponse,
    account::{AccountNew, AccountUpdate, AccountView},
    budget::BudgetOverview,
    category::{CategoryNew, CategoryUpdate, CategoryView},
    group::{GroupNew, GroupUpdate, GroupView},
    transaction::{TransactionNew, TransactionUpdate, TransactionView},
    user::{Credentials, LoginResponse, UserView},
};
use reqwest::{Method, RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Failure of a single API call, already reduced to something a screen can
/// show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("server unreachable: {0}")]
    Transport(String),
}

type ClientResult<T> = std::result::Result<T, ClientError>;

/// Maps a non-2xx status and its `{ "error": ... }` body to a [`ClientError`].
fn status_error(status: u16, body: String) -> ClientError {
    match status {
        400 => ClientError::Validation(body),
        401 => ClientError::Unauthorized(body),
        403 => ClientError::Forbidden(body),
        404 => ClientError::NotFound(body),
        409 => ClientError::Conflict(body),
        _ => ClientError::Server(body),
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self> {
        // `Url::join` replaces the last segment unless the base ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|err| AppError::BaseUrl {
            url: normalized.clone(),
            reason: err.to_string(),
        })?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            token,
        })
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let builder = self.http.request(method, self.endpoint(path)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn execute(&self, builder: RequestBuilder) -> ClientResult<reqwest::Response> {
        let res = builder
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status().as_u16();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::debug!(status, error = %body, "request failed");
        Err(status_error(status, body))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        self.execute(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)?).await
    }

    async fn with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.request(method, path)?.json(body)).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        self.with_body(Method::POST, "login", credentials).await
    }

    pub async fn signup(&self, credentials: &Credentials) -> ClientResult<UserView> {
        self.with_body(Method::POST, "users", credentials).await
    }

    pub async fn accounts(&self) -> ClientResult<Vec<AccountView>> {
        self.get("accounts").await
    }

    pub async fn create_account(&self, payload: &AccountNew) -> ClientResult<AccountView> {
        self.with_body(Method::POST, "accounts", payload).await
    }

    pub async fn update_account(
        &self,
        id: Uuid,
        payload: &AccountUpdate,
    ) -> ClientResult<AccountView> {
        self.with_body(Method::PUT, &format!("accounts/{id}"), payload)
            .await
    }

    pub async fn delete_account(&self, id: Uuid) -> ClientResult<()> {
        self.delete(&format!("accounts/{id}")).await
    }

    pub async fn account_transactions(&self, id: Uuid) -> ClientResult<Vec<TransactionView>> {
        self.get(&format!("accounts/{id}/transactions")).await
    }

    pub async fn groups(&self) -> ClientResult<Vec<GroupView>> {
        self.get("groups").await
    }

    pub async fn create_group(&self, payload: &GroupNew) -> ClientResult<GroupView> {
        self.with_body(Method::POST, "groups", payload).await
    }

    pub async fn update_group(&self, id: Uuid, payload: &GroupUpdate) -> ClientResult<GroupView> {
        self.with_body(Method::PUT, &format!("groups/{id}"), payload)
            .await
    }

    pub async fn delete_group(&self, id: Uuid) -> ClientResult<()> {
        self.delete(&format!("groups/{id}")).await
    }

    pub async fn categories(&self) -> ClientResult<Vec<CategoryView>> {
        self.get("categories").await
    }

    pub async fn create_category(&self, payload: &CategoryNew) -> ClientResult<CategoryView> {
        self.with_body(Method::POST, "categories", payload).await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        payload: &CategoryUpdate,
    ) -> ClientResult<CategoryView> {
        self.with_body(Method::PUT, &format!("categories/{id}"), payload)
            .await
    }

    pub async fn delete_category(&self, id: Uuid) -> ClientResult<()> {
        self.delete(&format!("categories/{id}")).await
    }

    pub async fn category_transactions(&self, id: Uuid) -> ClientResult<Vec<TransactionView>> {
        self.get(&format!("categories/{id}/transactions")).await
    }

    pub async fn transactions(&self) -> ClientResult<Vec<TransactionView>> {
        self.get("transactions").await
    }

    pub async fn create_transaction(
        &self,
        payload: &TransactionNew,
    ) -> ClientResult<TransactionView> {
        self.with_body(Method::POST, "transactions", payload).await
    }

    pub async fn update_transaction(
        &self,
        id: Uuid,
        payload: &TransactionUpdate,
    ) -> ClientResult<TransactionView> {
        self.with_body(Method::PUT, &format!("transactions/{id}"), payload)
            .await
    }

    pub async fn delete_transaction(&self, id: Uuid) -> ClientResult<()> {
        self.delete(&format!("transactions/{id}")).await
    }

    pub async fn budget(&self) -> ClientResult<BudgetOverview> {
        self.get("budget").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_error_kinds() {
        let body = || "boom".to_string();
        assert_eq!(status_error(400, body()), ClientError::Validation(body()));
        assert_eq!(status_error(401, body()), ClientError::Unauthorized(body()));
        assert_eq!(status_error(403, body()), ClientError::Forbidden(body()));
        assert_eq!(status_error(404, body()), ClientError::NotFound(body()));
        assert_eq!(status_error(409, body()), ClientError::Conflict(body()));
        assert_eq!(status_error(500, body()), ClientError::Server(body()));
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_prefix() {
        let client = Client::new(
            "http://127.0.0.1:8080/api/v1",
            Duration::from_secs(1),
            None,
        )
        .unwrap();
        let url = client.endpoint("accounts").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/v1/accounts");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(Client::new("not a url", Duration::from_secs(1), None).is_err());
    }
}
