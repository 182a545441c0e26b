//! Storage-backed business operations for the budget backend.
//!
//! [`Engine`] owns the database connection. Every public operation takes the
//! acting user's id and checks ownership before reading or writing.

pub use accounts::Account;
pub use api_types::Money;
pub use budget::{BudgetRow, BudgetWindow, aggregate};
pub use categories::Category;
pub use commands::{
    AccountPatch, CategoryPatch, GroupPatch, NewAccount, NewCategory, NewTransaction,
    TransactionPatch,
};
pub use error::EngineError;
pub use groups::Group;
pub use ops::{Engine, EngineBuilder};
pub use sea_orm::DbErr;
pub use transactions::Transaction;
pub use users::User;

mod accounts;
pub mod budget;
mod categories;
mod commands;
mod error;
mod groups;
mod ops;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
