use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, NewTransaction, ResultEngine, Transaction, TransactionPatch, accounts,
    categories, transactions,
};

use super::{Engine, with_tx};

fn normalize_description(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(
            "tx_description must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn require_non_zero(amount: crate::Money) -> ResultEngine<crate::Money> {
    if amount.is_zero() {
        return Err(EngineError::InvalidAmount(
            "amount must not be zero".to_string(),
        ));
    }
    Ok(amount)
}

impl Engine {
    /// Every transaction on the user's accounts, newest `tx_date` first.
    pub async fn transactions(&self, user_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.transaction_list(&db_tx, user_id, Condition::all())
                .await
        })
    }

    pub async fn transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let (model, account) = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            self.transaction_view(&db_tx, model, account).await
        })
    }

    /// Books a transaction. The account and the optional category must both
    /// belong to the user; the account balance is left untouched.
    pub async fn create_transaction(&self, cmd: NewTransaction) -> ResultEngine<Transaction> {
        let amount = require_non_zero(cmd.amount)?;
        let description = normalize_description(&cmd.description)?;
        with_tx!(self, |db_tx| {
            let account = self
                .require_account(&db_tx, cmd.user_id, cmd.account_id)
                .await?;
            let category = self
                .optional_category(&db_tx, cmd.user_id, cmd.category_id)
                .await?;
            let now = Utc::now();
            let model = transactions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                amount_minor: ActiveValue::Set(amount.cents()),
                tx_description: ActiveValue::Set(description),
                tx_date: ActiveValue::Set(cmd.date),
                posted: ActiveValue::Set(cmd.posted),
                account_id: ActiveValue::Set(account.id),
                category_id: ActiveValue::Set(cmd.category_id),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(
                transaction_id = %model.id,
                account_id = %account.id,
                "transaction created"
            );
            Ok(Transaction::from_model(
                model,
                account.account_name,
                category.map(|c| c.category_name),
            ))
        })
    }

    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        let amount = patch.amount.map(require_non_zero).transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(normalize_description)
            .transpose()?;
        with_tx!(self, |db_tx| {
            let (model, mut account) = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let mut active: transactions::ActiveModel = model.into();
            if let Some(amount) = amount {
                active.amount_minor = ActiveValue::Set(amount.cents());
            }
            if let Some(description) = description {
                active.tx_description = ActiveValue::Set(description);
            }
            if let Some(date) = patch.date {
                active.tx_date = ActiveValue::Set(date);
            }
            if let Some(posted) = patch.posted {
                active.posted = ActiveValue::Set(posted);
            }
            if let Some(account_id) = patch.account_id {
                account = self.require_account(&db_tx, user_id, account_id).await?;
                active.account_id = ActiveValue::Set(account_id);
            }
            if let Some(category_id) = patch.category_id {
                self.optional_category(&db_tx, user_id, category_id).await?;
                active.category_id = ActiveValue::Set(category_id);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            tracing::debug!(%transaction_id, "transaction updated");
            self.transaction_view(&db_tx, model, account).await
        })
    }

    pub async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            transactions::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;
            tracing::debug!(%transaction_id, "transaction deleted");
            Ok(())
        })
    }

    /// Loads the user's transactions matching `condition`, with account and
    /// category names resolved.
    pub(super) async fn transaction_list(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        condition: Condition,
    ) -> ResultEngine<Vec<Transaction>> {
        let account_names: HashMap<Uuid, String> = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|account| (account.id, account.account_name))
            .collect();
        if account_names.is_empty() {
            return Ok(Vec::new());
        }

        let rows = transactions::Entity::find()
            .filter(transactions::Column::AccountId.is_in(account_names.keys().copied()))
            .filter(condition)
            .find_also_related(categories::Entity)
            .order_by_desc(transactions::Column::TxDate)
            .order_by_asc(transactions::Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, category)| {
                let account_name = account_names
                    .get(&model.account_id)
                    .cloned()
                    .unwrap_or_default();
                Transaction::from_model(model, account_name, category.map(|c| c.category_name))
            })
            .collect())
    }

    async fn transaction_view(
        &self,
        db: &DatabaseTransaction,
        model: transactions::Model,
        account: accounts::Model,
    ) -> ResultEngine<Transaction> {
        let category_name = match model.category_id {
            Some(category_id) => categories::Entity::find_by_id(category_id)
                .one(db)
                .await?
                .map(|c| c.category_name),
            None => None,
        };
        Ok(Transaction::from_model(model, account.account_name, category_name))
    }
}
