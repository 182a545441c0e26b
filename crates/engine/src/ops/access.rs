use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, categories, groups, transactions};

use super::Engine;

/// Generates a `require_*` lookup that loads a user-owned row by id.
///
/// Absent rows answer `KeyNotFound`, rows of another user `Forbidden`.
macro_rules! impl_owned_lookup {
    ($require_fn:ident, $entity:path, $model:path, $label:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: Uuid,
            id: Uuid,
        ) -> ResultEngine<$model> {
            let model = <$entity>::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($label.to_string()))?;
            if model.user_id != user_id {
                return Err(EngineError::Forbidden(format!(
                    "{} belongs to another user",
                    $label
                )));
            }
            Ok(model)
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        require_account,
        accounts::Entity,
        accounts::Model,
        "account"
    );

    impl_owned_lookup!(require_group, groups::Entity, groups::Model, "group");

    impl_owned_lookup!(
        require_category,
        categories::Entity,
        categories::Model,
        "category"
    );

    /// Transactions are owned through their account.
    pub(super) async fn require_transaction(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        id: Uuid,
    ) -> ResultEngine<(transactions::Model, accounts::Model)> {
        let (model, account) = transactions::Entity::find_by_id(id)
            .find_also_related(accounts::Entity)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction".to_string()))?;
        let account =
            account.ok_or_else(|| EngineError::KeyNotFound("account".to_string()))?;
        if account.user_id != user_id {
            return Err(EngineError::Forbidden(
                "transaction belongs to another user".to_string(),
            ));
        }
        Ok((model, account))
    }

    /// Resolves an optional group reference, checking ownership.
    pub(super) async fn optional_group(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        group_id: Option<Uuid>,
    ) -> ResultEngine<Option<groups::Model>> {
        match group_id {
            Some(id) => self.require_group(db, user_id, id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Resolves an optional category reference, checking ownership.
    pub(super) async fn optional_category(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Option<categories::Model>> {
        match category_id {
            Some(id) => self.require_category(db, user_id, id).await.map(Some),
            None => Ok(None),
        }
    }
}
