//! The module contains the `Account` struct and its table.

use api_types::{Money, account::AccountType};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// A place where money is kept: a bank account, a card, an investment.
///
/// `balance` is maintained by hand and is not recomputed from transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub account_type: AccountType,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_name: String,
    pub account_type: String,
    pub balance_minor: i64,
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
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let account_type = model
            .account_type
            .parse::<AccountType>()
            .map_err(EngineError::InvalidInput)?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.account_name,
            account_type,
            balance: Money::new(model.balance_minor),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<Account> for api_types::account::AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            user_id: account.user_id,
            account_name: account.name,
            account_type: account.account_type,
            balance: account.balance,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}
