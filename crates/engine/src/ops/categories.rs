use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Category, CategoryPatch, NewCategory, ResultEngine, Transaction, categories, groups,
    transactions,
};

use super::{Engine, normalize_optional_name, normalize_required_name, with_tx};

impl Engine {
    /// Every category of the user with its group name, by name then id.
    pub async fn categories(&self, user_id: Uuid) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| self.category_list(&db_tx, user_id).await)
    }

    pub async fn category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            self.category_view(&db_tx, model).await
        })
    }

    /// Creates a category. A `group_id` must name a group of the same user.
    pub async fn create_category(&self, cmd: NewCategory) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "category")?;
        with_tx!(self, |db_tx| {
            let group = self.optional_group(&db_tx, cmd.user_id, cmd.group_id).await?;
            let now = Utc::now();
            let model = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(cmd.user_id),
                category_name: ActiveValue::Set(name),
                budget_minor: ActiveValue::Set(cmd.budget.cents()),
                group_id: ActiveValue::Set(cmd.group_id),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(category_id = %model.id, user_id = %cmd.user_id, "category created");
            Ok(Category::from_model(model, group.as_ref()))
        })
    }

    pub async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        patch: CategoryPatch,
    ) -> ResultEngine<Category> {
        let name = normalize_optional_name(patch.name.as_deref(), "category")?;
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            let mut active: categories::ActiveModel = model.into();
            if let Some(name) = name {
                active.category_name = ActiveValue::Set(name);
            }
            if let Some(budget) = patch.budget {
                active.budget_minor = ActiveValue::Set(budget.cents());
            }
            if let Some(group_id) = patch.group_id {
                self.optional_group(&db_tx, user_id, group_id).await?;
                active.group_id = ActiveValue::Set(group_id);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            tracing::debug!(%category_id, "category updated");
            self.category_view(&db_tx, model).await
        })
    }

    /// Deletes the category together with its transactions.
    pub async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id).await?;
            let removed = transactions::Entity::delete_many()
                .filter(transactions::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            tracing::debug!(
                %category_id,
                transactions = removed.rows_affected,
                "category deleted"
            );
            Ok(())
        })
    }

    /// Transactions booked against one category, newest first.
    pub async fn category_transactions(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id).await?;
            self.transaction_list(
                &db_tx,
                user_id,
                Condition::all().add(transactions::Column::CategoryId.eq(category_id)),
            )
            .await
        })
    }

    pub(super) async fn category_list(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Category>> {
        let rows = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .find_also_related(groups::Entity)
            .order_by_asc(categories::Column::CategoryName)
            .order_by_asc(categories::Column::Id)
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(model, group)| Category::from_model(model, group.as_ref()))
            .collect())
    }

    async fn category_view(
        &self,
        db: &DatabaseTransaction,
        model: categories::Model,
    ) -> ResultEngine<Category> {
        let group = match model.group_id {
            Some(group_id) => groups::Entity::find_by_id(group_id).one(db).await?,
            None => None,
        };
        Ok(Category::from_model(model, group.as_ref()))
    }
}
