use chrono::Utc;
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Account, AccountPatch, NewAccount, ResultEngine, Transaction, accounts, transactions,
};

use super::{Engine, normalize_optional_name, normalize_required_name, with_tx};

impl Engine {
    /// Every account of the user, by name then id.
    pub async fn accounts(&self, user_id: Uuid) -> ResultEngine<Vec<Account>> {
        with_tx!(self, |db_tx| {
            let models = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id))
                .order_by_asc(accounts::Column::AccountName)
                .order_by_asc(accounts::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn account(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, user_id, account_id).await?;
            Account::try_from(model)
        })
    }

    /// Opens an account. The balance starts at `initial_balance` and is
    /// never recomputed from transactions.
    pub async fn create_account(&self, cmd: NewAccount) -> ResultEngine<Account> {
        let name = normalize_required_name(&cmd.name, "account")?;
        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let model = accounts::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(cmd.user_id),
                account_name: ActiveValue::Set(name),
                account_type: ActiveValue::Set(cmd.account_type.as_str().to_string()),
                balance_minor: ActiveValue::Set(cmd.initial_balance.cents()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(account_id = %model.id, user_id = %cmd.user_id, "account created");
            Account::try_from(model)
        })
    }

    pub async fn update_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        patch: AccountPatch,
    ) -> ResultEngine<Account> {
        let name = normalize_optional_name(patch.name.as_deref(), "account")?;
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, user_id, account_id).await?;
            let mut active: accounts::ActiveModel = model.into();
            if let Some(name) = name {
                active.account_name = ActiveValue::Set(name);
            }
            if let Some(kind) = patch.account_type {
                active.account_type = ActiveValue::Set(kind.as_str().to_string());
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            tracing::debug!(%account_id, "account updated");
            Account::try_from(model)
        })
    }

    /// Deletes the account together with its transactions.
    pub async fn delete_account(&self, user_id: Uuid, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;
            let removed = transactions::Entity::delete_many()
                .filter(transactions::Column::AccountId.eq(account_id))
                .exec(&db_tx)
                .await?;
            accounts::Entity::delete_by_id(account_id)
                .exec(&db_tx)
                .await?;
            tracing::debug!(
                %account_id,
                transactions = removed.rows_affected,
                "account deleted"
            );
            Ok(())
        })
    }

    /// Transactions booked against one account, newest first.
    pub async fn account_transactions(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, user_id, account_id).await?;
            self.transaction_list(
                &db_tx,
                user_id,
                Condition::all().add(transactions::Column::AccountId.eq(account_id)),
            )
            .await
        })
    }
}
