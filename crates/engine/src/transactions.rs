//! The module contains the `Transaction` struct and its table.

use api_types::Money;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// A dated amount booked against an account.
///
/// Transactions carry no user id: ownership is the owning account's user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Money,
    pub description: String,
    pub date: DateTime<Utc>,
    pub posted: bool,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub account_name: String,
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub amount_minor: i64,
    pub tx_description: String,
    pub tx_date: DateTimeUtc,
    pub posted: bool,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Transaction {
    pub(crate) fn from_model(
        model: Model,
        account_name: String,
        category_name: Option<String>,
    ) -> Self {
        Self {
            id: model.id,
            amount: Money::new(model.amount_minor),
            description: model.tx_description,
            date: model.tx_date,
            posted: model.posted,
            account_id: model.account_id,
            category_id: model.category_id,
            account_name,
            category_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Transaction> for api_types::transaction::TransactionView {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            amount: tx.amount,
            tx_description: tx.description,
            tx_date: tx.date,
            posted: tx.posted,
            account_id: tx.account_id,
            category_id: tx.category_id,
            account_name: tx.account_name,
            category_name: tx.category_name,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}
