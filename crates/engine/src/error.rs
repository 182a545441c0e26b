//! The module contains the error the engine can throw.
//!
//! - [`KeyNotFound`] thrown when an item does not exist.
//! - [`Forbidden`] thrown when an item exists but belongs to another user.
//! - [`InvalidInput`] / [`InvalidAmount`] thrown when a request fails validation.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`InvalidAmount`]: EngineError::InvalidAmount
use api_types::MoneyParseError;
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<MoneyParseError> for EngineError {
    fn from(value: MoneyParseError) -> Self {
        Self::InvalidAmount(value.to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
