use api_types::account::AccountView;
use ratatui::{Frame, layout::Rect};

use super::resource::{self, ResourceView};
use crate::app::{AppState, form::Lookups};

fn row(account: &AccountView, _state: &AppState) -> String {
    format!(
        "{:<24} {:<12} {:>12}",
        account.account_name,
        account.account_type.as_str(),
        account.balance.to_string()
    )
}

fn details(account: &AccountView, _state: &AppState) -> Vec<(&'static str, String)> {
    vec![
        ("Name", account.account_name.clone()),
        ("Type", account.account_type.to_string()),
        ("Balance", account.balance.to_string()),
    ]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, focused: bool) {
    let view = ResourceView {
        title: "Accounts",
        model: &state.accounts,
        lookups: Lookups::default(),
        row,
        details,
    };
    resource::render(frame, area, state, &view, focused);
}
