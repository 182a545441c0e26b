use super::requests::{ApiCall, ApiResult, Target};
use crate::client::{Client, ClientError};

/// Runs one call against the backend.
pub async fn execute(client: &Client, call: ApiCall) -> Result<ApiResult, ClientError> {
    let result = match call {
        ApiCall::Login(credentials) => ApiResult::LoggedIn(client.login(&credentials).await?),
        ApiCall::Signup(credentials) => {
            let user = client.signup(&credentials).await?;
            tracing::info!(user_id = %user.id, "signed up");
            ApiResult::LoggedIn(client.login(&credentials).await?)
        }
        ApiCall::List(target) => match target {
            Target::Budget => ApiResult::Budget(client.budget().await?),
            Target::Accounts => ApiResult::Accounts(client.accounts().await?),
            Target::Groups => ApiResult::Groups(client.groups().await?),
            Target::Categories => ApiResult::Categories(client.categories().await?),
            Target::Transactions => ApiResult::Transactions(client.transactions().await?),
            Target::Session => {
                return Err(ClientError::Validation("nothing to list".to_string()));
            }
        },
        ApiCall::Detail(target, id) => match target {
            Target::Accounts => ApiResult::Detail(id, client.account_transactions(id).await?),
            Target::Categories => {
                ApiResult::Detail(id, client.category_transactions(id).await?)
            }
            _ => return Err(ClientError::Validation("no details to fetch".to_string())),
        },
        ApiCall::Delete(target, id) => {
            match target {
                Target::Accounts => client.delete_account(id).await?,
                Target::Groups => client.delete_group(id).await?,
                Target::Categories => client.delete_category(id).await?,
                Target::Transactions => client.delete_transaction(id).await?,
                Target::Session | Target::Budget => {
                    return Err(ClientError::Validation("nothing to delete".to_string()));
                }
            }
            ApiResult::Deleted(id)
        }
        ApiCall::CreateAccount(payload) => {
            client.create_account(&payload).await?;
            ApiResult::Saved
        }
        ApiCall::UpdateAccount(id, payload) => {
            client.update_account(id, &payload).await?;
            ApiResult::Saved
        }
        ApiCall::CreateGroup(payload) => {
            client.create_group(&payload).await?;
            ApiResult::Saved
        }
        ApiCall::UpdateGroup(id, payload) => {
            client.update_group(id, &payload).await?;
            ApiResult::Saved
        }
        ApiCall::CreateCategory(payload) => {
            client.create_category(&payload).await?;
            ApiResult::Saved
        }
        ApiCall::UpdateCategory(id, payload) => {
            client.update_category(id, &payload).await?;
            ApiResult::Saved
        }
        ApiCall::CreateTransaction(payload) => {
            client.create_transaction(&payload).await?;
            ApiResult::Saved
        }
        ApiCall::UpdateTransaction(id, payload) => {
            client.update_transaction(id, &payload).await?;
            ApiResult::Saved
        }
    };
    Ok(result)
}
