//! Command structs for engine write operations.
//!
//! Creation commands carry the owner and every required field. Patch structs
//! hold one `Option` per updatable field: `None` keeps the stored value.
//! Nullable references use `Option<Option<Uuid>>`, where `Some(None)` clears
//! the reference.

use api_types::{Money, account::AccountType};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Create an account.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub user_id: Uuid,
    pub name: String,
    pub account_type: AccountType,
    pub initial_balance: Money,
}

impl NewAccount {
    #[must_use]
    pub fn new(user_id: Uuid, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            user_id,
            name: name.into(),
            account_type,
            initial_balance: Money::ZERO,
        }
    }

    #[must_use]
    pub fn initial_balance(mut self, balance: Money) -> Self {
        self.initial_balance = balance;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
}

#[derive(Clone, Debug, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
}

/// Create a category, ungrouped and with a zero budget unless set.
#[derive(Clone, Debug)]
pub struct NewCategory {
    pub user_id: Uuid,
    pub name: String,
    pub budget: Money,
    pub group_id: Option<Uuid>,
}

impl NewCategory {
    #[must_use]
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            budget: Money::ZERO,
            group_id: None,
        }
    }

    #[must_use]
    pub fn budget(mut self, budget: Money) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn group_id(mut self, group_id: Uuid) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub budget: Option<Money>,
    pub group_id: Option<Option<Uuid>>,
}

/// Book an amount against an account.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub amount: Money,
    pub description: String,
    pub date: DateTime<Utc>,
    pub posted: bool,
    pub category_id: Option<Uuid>,
}

impl NewTransaction {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        account_id: Uuid,
        amount: Money,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            account_id,
            amount,
            description: description.into(),
            date,
            posted: false,
            category_id: None,
        }
    }

    #[must_use]
    pub fn posted(mut self, posted: bool) -> Self {
        self.posted = posted;
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub posted: Option<bool>,
    pub account_id: Option<Uuid>,
    pub category_id: Option<Option<Uuid>>,
}
