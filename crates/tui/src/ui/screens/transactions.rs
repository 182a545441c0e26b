use api_types::transaction::TransactionView;
use chrono_tz::Tz;
use ratatui::{Frame, layout::Rect};

use super::resource::{self, ResourceView};
use crate::app::{AppState, form::Lookups, transactions::DATE_FORMAT};

/// One-line summary, dated in the configured timezone.
pub fn transaction_row(tx: &TransactionView, timezone: Tz) -> String {
    let date = tx.tx_date.with_timezone(&timezone).format(DATE_FORMAT);
    let posted = if tx.posted { '✓' } else { ' ' };
    format!(
        "{date}  {posted} {:>11}  {:<28} {:<16} {}",
        tx.amount.to_string(),
        tx.tx_description,
        tx.account_name,
        tx.category_name.as_deref().unwrap_or("-")
    )
}

fn row(tx: &TransactionView, state: &AppState) -> String {
    transaction_row(tx, state.timezone)
}

fn details(tx: &TransactionView, state: &AppState) -> Vec<(&'static str, String)> {
    vec![
        (
            "Date",
            tx.tx_date
                .with_timezone(&state.timezone)
                .format("%Y-%m-%d %H:%M %Z")
                .to_string(),
        ),
        ("Amount", tx.amount.to_string()),
        ("Description", tx.tx_description.clone()),
        ("Posted", (if tx.posted { "yes" } else { "no" }).to_string()),
        ("Account", tx.account_name.clone()),
        (
            "Category",
            tx.category_name.clone().unwrap_or_else(|| "None".to_string()),
        ),
    ]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, focused: bool) {
    let view = ResourceView {
        title: "Transactions",
        model: &state.transactions,
        lookups: Lookups {
            accounts: &state.accounts.items,
            groups: &state.groups.items,
            categories: &state.categories.items,
        },
        row,
        details,
    };
    resource::render(frame, area, state, &view, focused);
}

#[cfg(test)]
mod tests {
    use api_types::Money;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn row_uses_local_date() {
        let now = Utc::now();
        let tx = TransactionView {
            id: Uuid::new_v4(),
            amount: Money::new(-4_550),
            tx_description: "Dinner".to_string(),
            tx_date: Utc.with_ymd_and_hms(2026, 3, 1, 3, 0, 0).unwrap(),
            posted: true,
            account_id: Uuid::new_v4(),
            category_id: None,
            account_name: "Checking".to_string(),
            category_name: None,
            created_at: now,
            updated_at: now,
        };
        let utc = transaction_row(&tx, Tz::UTC);
        assert!(utc.starts_with("2026-03-01"), "{utc}");
        let local = transaction_row(&tx, Tz::America__New_York);
        assert!(local.starts_with("2026-02-28"), "{local}");
        assert!(local.contains("-45.50"));
    }
}
