//! Budget overview aggregation.
//!
//! [`aggregate`] folds flat per-category rows into the nested
//! [`BudgetOverview`]. It does no I/O; the engine builds the rows in
//! `Engine::budget_overview`.

use std::collections::HashMap;

use api_types::{
    Money,
    budget::{BudgetCategory, BudgetGroup, BudgetOverview},
};
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// One category with what was spent against it inside the window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetRow {
    pub category_id: Uuid,
    pub category_name: String,
    pub budget: Money,
    /// `(group_id, group_name)` when the category is grouped.
    pub group: Option<(Uuid, String)>,
    pub total_spent: Money,
}

/// Half-open `[start, end)` interval of UTC instants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BudgetWindow {
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The UTC calendar month containing `instant`.
    #[must_use]
    pub fn month_of(instant: DateTime<Utc>) -> Self {
        let date = instant.date_naive();
        let first = date - TimeDelta::days(i64::from(date.day0()));
        let next = first
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start: first.and_time(NaiveTime::MIN).and_utc(),
            end: next.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("budget totals exceed the representable range".to_string())
}

fn add(a: Money, b: Money) -> ResultEngine<Money> {
    a.checked_add(b).ok_or_else(overflow)
}

fn sub(a: Money, b: Money) -> ResultEngine<Money> {
    a.checked_sub(b).ok_or_else(overflow)
}

fn category_line(row: BudgetRow) -> ResultEngine<BudgetCategory> {
    let remaining = sub(row.budget, row.total_spent)?;
    Ok(BudgetCategory {
        category_id: row.category_id,
        category_name: row.category_name,
        budget: row.budget,
        total_spent: row.total_spent,
        remaining,
        is_overspent: remaining.is_negative(),
    })
}

/// Builds the overview for `window` out of `rows`.
///
/// Groups appear in the order their first row arrives; categories keep
/// arrival order inside their bucket and in the ungrouped list. Fails with
/// [`EngineError::InvalidAmount`] when a total leaves the `i64` cents range.
pub fn aggregate(
    window: BudgetWindow,
    rows: impl IntoIterator<Item = BudgetRow>,
) -> ResultEngine<BudgetOverview> {
    let mut groups: Vec<BudgetGroup> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut ungrouped = Vec::new();
    let mut grand_total_budget = Money::ZERO;
    let mut grand_total_spent = Money::ZERO;

    for mut row in rows {
        grand_total_budget = add(grand_total_budget, row.budget)?;
        grand_total_spent = add(grand_total_spent, row.total_spent)?;
        match row.group.take() {
            None => ungrouped.push(category_line(row)?),
            Some((group_id, group_name)) => {
                let slot = *index.entry(group_id).or_insert_with(|| {
                    groups.push(BudgetGroup {
                        group_id,
                        group_name,
                        categories: Vec::new(),
                        total_budget: Money::ZERO,
                        total_spent: Money::ZERO,
                        total_remaining: Money::ZERO,
                    });
                    groups.len() - 1
                });
                let bucket = &mut groups[slot];
                bucket.total_budget = add(bucket.total_budget, row.budget)?;
                bucket.total_spent = add(bucket.total_spent, row.total_spent)?;
                bucket.categories.push(category_line(row)?);
            }
        }
    }

    for bucket in &mut groups {
        bucket.total_remaining = sub(bucket.total_budget, bucket.total_spent)?;
    }

    Ok(BudgetOverview {
        start_date: window.start,
        end_date: window.end,
        groups,
        ungrouped_categories: ungrouped,
        grand_total_budget,
        grand_total_spent,
        grand_total_remaining: sub(grand_total_budget, grand_total_spent)?,
    })
}
