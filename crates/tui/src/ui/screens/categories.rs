use api_types::category::CategoryView;
use ratatui::{Frame, layout::Rect};

use super::resource::{self, ResourceView};
use crate::app::{AppState, form::Lookups};

fn row(category: &CategoryView, _state: &AppState) -> String {
    format!(
        "{:<24} {:<18} {:>12}",
        category.category_name,
        category.group_name.as_deref().unwrap_or("-"),
        category.budget.to_string()
    )
}

fn details(category: &CategoryView, _state: &AppState) -> Vec<(&'static str, String)> {
    vec![
        ("Name", category.category_name.clone()),
        ("Budget", category.budget.to_string()),
        (
            "Group",
            category.group_name.clone().unwrap_or_else(|| "None".to_string()),
        ),
    ]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, focused: bool) {
    let view = ResourceView {
        title: "Categories",
        model: &state.categories,
        lookups: Lookups {
            groups: &state.groups.items,
            ..Lookups::default()
        },
        row,
        details,
    };
    resource::render(frame, area, state, &view, focused);
}
