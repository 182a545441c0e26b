//! Budget categories.

use api_types::Money;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// A budget line with its own per-period budget, optionally inside a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub budget: Money,
    pub group_id: Option<Uuid>,
    /// Resolved name of `group_id`, when grouped.
    pub group_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_name: String,
    pub budget_minor: i64,
    pub group_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Group,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Category {
    pub(crate) fn from_model(model: Model, group: Option<&super::groups::Model>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.category_name,
            budget: Money::new(model.budget_minor),
            group_id: model.group_id,
            group_name: group.map(|g| g.group_name.clone()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Category> for api_types::category::CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            user_id: category.user_id,
            category_name: category.name,
            budget: category.budget,
            group_id: category.group_id,
            group_name: category.group_name,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
