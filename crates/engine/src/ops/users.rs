use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, users};

use super::{Engine, with_tx};

impl Engine {
    /// Registers a user. `hashed_password` is stored as given.
    pub async fn create_user(&self, username: &str, hashed_password: &str) -> ResultEngine<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(EngineError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username.to_string()));
            }

            let now = Utc::now();
            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                username: ActiveValue::Set(username.to_string()),
                hashed_password: ActiveValue::Set(hashed_password.to_string()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(user_id = %model.id, "user created");
            Ok(User::from(model))
        })
    }

    pub async fn user_by_username(&self, username: &str) -> ResultEngine<User> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username.trim()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user".to_string()))?;
        Ok(model.into())
    }
}
