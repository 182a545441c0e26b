use api_types::group::GroupView;
use ratatui::{Frame, layout::Rect};

use super::resource::{self, ResourceView};
use crate::app::{AppState, form::Lookups};

fn categories_in(group: &GroupView, state: &AppState) -> Vec<String> {
    state
        .categories
        .items
        .iter()
        .filter(|category| category.group_id == Some(group.id))
        .map(|category| category.category_name.clone())
        .collect()
}

fn row(group: &GroupView, state: &AppState) -> String {
    let count = categories_in(group, state).len();
    format!("{:<24} {count} categories", group.group_name)
}

fn details(group: &GroupView, state: &AppState) -> Vec<(&'static str, String)> {
    let categories = categories_in(group, state);
    vec![
        ("Name", group.group_name.clone()),
        (
            "Categories",
            if categories.is_empty() {
                "-".to_string()
            } else {
                categories.join(", ")
            },
        ),
    ]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, focused: bool) {
    let view = ResourceView {
        title: "Category Groups",
        model: &state.groups,
        lookups: Lookups::default(),
        row,
        details,
    };
    resource::render(frame, area, state, &view, focused);
}
