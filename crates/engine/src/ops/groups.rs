use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{Group, GroupPatch, ResultEngine, categories, groups};

use super::{Engine, normalize_optional_name, normalize_required_name, with_tx};

impl Engine {
    /// Every group of the user, by name then id.
    pub async fn groups(&self, user_id: Uuid) -> ResultEngine<Vec<Group>> {
        with_tx!(self, |db_tx| {
            let models = groups::Entity::find()
                .filter(groups::Column::UserId.eq(user_id))
                .order_by_asc(groups::Column::GroupName)
                .order_by_asc(groups::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Group::from).collect::<Vec<_>>())
        })
    }

    pub async fn create_group(&self, user_id: Uuid, name: &str) -> ResultEngine<Group> {
        let name = normalize_required_name(name, "group")?;
        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let model = groups::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id),
                group_name: ActiveValue::Set(name),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(group_id = %model.id, %user_id, "group created");
            Ok(Group::from(model))
        })
    }

    pub async fn update_group(
        &self,
        user_id: Uuid,
        group_id: Uuid,
        patch: GroupPatch,
    ) -> ResultEngine<Group> {
        let name = normalize_optional_name(patch.name.as_deref(), "group")?;
        with_tx!(self, |db_tx| {
            let model = self.require_group(&db_tx, user_id, group_id).await?;
            let mut active: groups::ActiveModel = model.into();
            if let Some(name) = name {
                active.group_name = ActiveValue::Set(name);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active.update(&db_tx).await?;
            tracing::debug!(%group_id, "group updated");
            Ok(Group::from(model))
        })
    }

    /// Deletes the group. Its categories stay, ungrouped.
    pub async fn delete_group(&self, user_id: Uuid, group_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, user_id, group_id).await?;
            let ungrouped = categories::Entity::update_many()
                .col_expr(categories::Column::GroupId, Expr::value(Option::<Uuid>::None))
                .col_expr(categories::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(categories::Column::GroupId.eq(group_id))
                .exec(&db_tx)
                .await?;
            groups::Entity::delete_by_id(group_id).exec(&db_tx).await?;
            tracing::debug!(
                %group_id,
                categories = ungrouped.rows_affected,
                "group deleted"
            );
            Ok(())
        })
    }
}
