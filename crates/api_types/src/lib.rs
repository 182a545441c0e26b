use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub use money::{Money, MoneyParseError};

mod money;

/// Deserializes a field that distinguishes "absent" from "null".
///
/// Use together with `#[serde(default)]`: a missing key stays `None`, an
/// explicit `null` becomes `Some(None)`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod user {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub username: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Login answer: the user record plus a bearer token.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LoginResponse {
        #[serde(flatten)]
        pub user: UserView,
        pub token: String,
    }
}

pub mod account {
    use std::{fmt, str::FromStr};

    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum AccountType {
        #[default]
        Checking,
        Savings,
        #[serde(rename = "Credit Card")]
        CreditCard,
        Investing,
    }

    impl AccountType {
        pub const ALL: [AccountType; 4] = [
            Self::Checking,
            Self::Savings,
            Self::CreditCard,
            Self::Investing,
        ];

        /// Canonical label, also used as the stored value.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Checking => "Checking",
                Self::Savings => "Savings",
                Self::CreditCard => "Credit Card",
                Self::Investing => "Investing",
            }
        }
    }

    impl fmt::Display for AccountType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for AccountType {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::ALL
                .into_iter()
                .find(|kind| kind.as_str() == s)
                .ok_or_else(|| format!("invalid account type: {s}"))
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub account_name: String,
        pub account_type: AccountType,
        pub balance: Money,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AccountNew {
        pub account_name: String,
        pub account_type: AccountType,
        #[serde(default)]
        pub initial_balance: Option<Money>,
    }

    /// Partial update: absent fields keep their current value.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct AccountUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub account_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub account_type: Option<AccountType>,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub group_name: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GroupNew {
        pub group_name: String,
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct GroupUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub group_name: Option<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub category_name: String,
        pub budget: Money,
        pub group_id: Option<Uuid>,
        pub group_name: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub category_name: String,
        #[serde(default)]
        pub budget: Option<Money>,
        #[serde(default)]
        pub group_id: Option<Uuid>,
    }

    /// Partial update.
    ///
    /// `group_id` is tri-state: absent keeps the group, `null` ungroups the
    /// category, a value moves it.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub budget: Option<Money>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "double_option"
        )]
        pub group_id: Option<Option<Uuid>>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub amount: Money,
        pub tx_description: String,
        pub tx_date: DateTime<Utc>,
        pub posted: bool,
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub account_name: String,
        pub category_name: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub amount: Money,
        pub tx_description: String,
        pub tx_date: DateTime<Utc>,
        #[serde(default)]
        pub posted: bool,
        pub account_id: Uuid,
        #[serde(default)]
        pub category_id: Option<Uuid>,
    }

    /// Partial update; `category_id` is tri-state like
    /// [`CategoryUpdate::group_id`](crate::category::CategoryUpdate).
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount: Option<Money>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tx_description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub tx_date: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub posted: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub account_id: Option<Uuid>,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "double_option"
        )]
        pub category_id: Option<Option<Uuid>>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BudgetCategory {
        pub category_id: Uuid,
        pub category_name: String,
        pub budget: Money,
        pub total_spent: Money,
        pub remaining: Money,
        pub is_overspent: bool,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BudgetGroup {
        pub group_id: Uuid,
        pub group_name: String,
        pub categories: Vec<BudgetCategory>,
        pub total_budget: Money,
        pub total_spent: Money,
        pub total_remaining: Money,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BudgetOverview {
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
        pub groups: Vec<BudgetGroup>,
        pub ungrouped_categories: Vec<BudgetCategory>,
        pub grand_total_budget: Money,
        pub grand_total_spent: Money,
        pub grand_total_remaining: Money,
    }
}

#[cfg(test)]
mod tests {
    use super::{account::AccountType, category::CategoryUpdate, transaction::TransactionUpdate};

    #[test]
    fn account_type_uses_display_labels() {
        let json = serde_json::to_string(&AccountType::CreditCard).unwrap();
        assert_eq!(json, "\"Credit Card\"");
        let parsed: AccountType = serde_json::from_str("\"Investing\"").unwrap();
        assert_eq!(parsed, AccountType::Investing);
        assert_eq!("Savings".parse::<AccountType>(), Ok(AccountType::Savings));
        assert!("Cash".parse::<AccountType>().is_err());
    }

    #[test]
    fn group_id_absent_null_and_value_are_distinct() {
        let absent: CategoryUpdate = serde_json::from_str(r#"{"category_name":"Food"}"#).unwrap();
        assert_eq!(absent.group_id, None);

        let cleared: CategoryUpdate = serde_json::from_str(r#"{"group_id":null}"#).unwrap();
        assert_eq!(cleared.group_id, Some(None));

        let id = uuid::Uuid::new_v4();
        let set: CategoryUpdate =
            serde_json::from_str(&format!(r#"{{"group_id":"{id}"}}"#)).unwrap();
        assert_eq!(set.group_id, Some(Some(id)));
    }

    #[test]
    fn empty_transaction_update_changes_nothing() {
        let update: TransactionUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.amount.is_none());
        assert!(update.tx_description.is_none());
        assert!(update.posted.is_none());
        assert!(update.category_id.is_none());
    }

    #[test]
    fn cleared_reference_serializes_as_null() {
        let update = TransactionUpdate {
            category_id: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"category_id":null}"#);
    }
}
