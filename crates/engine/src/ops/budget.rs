use std::collections::HashMap;

use api_types::budget::BudgetOverview;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    BudgetRow, BudgetWindow, EngineError, Money, ResultEngine, budget::aggregate, transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Budget overview of every category of the user over `window`.
    ///
    /// Spent is the sum of transaction amounts with `start <= tx_date < end`.
    pub async fn budget_overview(
        &self,
        user_id: Uuid,
        window: BudgetWindow,
    ) -> ResultEngine<BudgetOverview> {
        with_tx!(self, |db_tx| {
            let categories = self.category_list(&db_tx, user_id).await?;
            if categories.is_empty() {
                return aggregate(window, Vec::new());
            }

            let mut spent: HashMap<Uuid, Money> = HashMap::new();
            let in_window = transactions::Entity::find()
                .filter(
                    transactions::Column::CategoryId
                        .is_in(categories.iter().map(|c| c.id)),
                )
                .filter(transactions::Column::TxDate.gte(window.start))
                .filter(transactions::Column::TxDate.lt(window.end))
                .all(&db_tx)
                .await?;
            for tx in in_window {
                if let Some(category_id) = tx.category_id {
                    let total = spent.entry(category_id).or_default();
                    *total = total.checked_add(Money::new(tx.amount_minor)).ok_or_else(|| {
                        EngineError::InvalidAmount(
                            "category spending exceeds the representable range".to_string(),
                        )
                    })?;
                }
            }

            let rows = categories.into_iter().map(|category| BudgetRow {
                total_spent: spent.get(&category.id).copied().unwrap_or_default(),
                category_id: category.id,
                budget: category.budget,
                group: category
                    .group_id
                    .zip(category.group_name),
                category_name: category.name,
            });
            aggregate(window, rows)
        })
    }
}
