use api_types::{Money, budget::BudgetOverview};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use super::resource::render_status;
use crate::{
    app::{
        AppState,
        budget::{BudgetLine, BudgetMode},
    },
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, focused: bool) {
    let theme = Theme::default();
    let model = &state.budget;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_status(frame, layout[0], model.error.as_deref(), &theme);

    let Some(overview) = &model.overview else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Loading budget...",
                Style::default().fg(theme.text_muted),
            ))
            .alignment(Alignment::Center),
            layout[2],
        );
        return;
    };

    render_totals(frame, layout[1], state, overview, &theme);

    match model.mode {
        BudgetMode::List => render_lines(frame, layout[2], state, focused, &theme),
        BudgetMode::Details => render_details(frame, layout[2], state, &theme),
    }
}

fn render_totals(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    overview: &BudgetOverview,
    theme: &Theme,
) {
    let start = overview.start_date.with_timezone(&state.timezone);
    let overspent = overview.grand_total_remaining.is_negative();
    let line = Line::from(vec![
        Span::styled(start.format("%B %Y  ").to_string(), Style::default().fg(theme.accent)),
        Span::styled("Budget ", Style::default().fg(theme.text_muted)),
        Span::raw(format!("{}  ", overview.grand_total_budget)),
        Span::styled("Spent ", Style::default().fg(theme.text_muted)),
        Span::raw(format!("{}  ", overview.grand_total_spent)),
        Span::styled("Remaining ", Style::default().fg(theme.text_muted)),
        Span::styled(
            overview.grand_total_remaining.to_string(),
            theme.remaining(overspent),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_for(false));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn amounts(budget: Money, spent: Money, remaining: Money) -> String {
    format!("{:>12} {:>12} {:>12}", budget.to_string(), spent.to_string(), remaining.to_string())
}

fn render_lines(frame: &mut Frame<'_>, area: Rect, state: &AppState, focused: bool, theme: &Theme) {
    let lines = state.budget.lines();
    let items: Vec<ListItem<'_>> = lines
        .iter()
        .map(|line| match line {
            BudgetLine::Group(group) => ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<26}", group.group_name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    amounts(group.total_budget, group.total_spent, group.total_remaining),
                    theme.remaining(group.total_remaining.is_negative()),
                ),
            ])),
            BudgetLine::Category(category) => ListItem::new(Line::from(vec![
                Span::raw(format!("  {:<24}", category.category_name)),
                Span::styled(
                    amounts(category.budget, category.total_spent, category.remaining),
                    theme.remaining(category.is_overspent),
                ),
            ])),
        })
        .collect();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(state.budget.cursor));
    }

    let header = format!(" {:<26}{:>12} {:>12} {:>12} ", "Budget", "budgeted", "spent", "left");
    let list = List::new(items)
        .block(
            Block::default()
                .title(header)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme.border_for(focused)),
        )
        .highlight_style(theme.highlight())
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_details(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(line) = state.budget.selected() else {
        return;
    };
    let label = |text: &'static str| Span::styled(format!("{text:<12}"), Style::default().fg(theme.text_muted));

    let (title, mut lines) = match line {
        BudgetLine::Group(group) => (
            group.group_name.clone(),
            vec![
                Line::from(vec![label("Budget"), Span::raw(group.total_budget.to_string())]),
                Line::from(vec![label("Spent"), Span::raw(group.total_spent.to_string())]),
                Line::from(vec![
                    label("Remaining"),
                    Span::styled(
                        group.total_remaining.to_string(),
                        theme.remaining(group.total_remaining.is_negative()),
                    ),
                ]),
                Line::from(vec![
                    label("Categories"),
                    Span::raw(group.categories.len().to_string()),
                ]),
            ],
        ),
        BudgetLine::Category(category) => (
            category.category_name.clone(),
            vec![
                Line::from(vec![label("Budget"), Span::raw(category.budget.to_string())]),
                Line::from(vec![label("Spent"), Span::raw(category.total_spent.to_string())]),
                Line::from(vec![
                    label("Remaining"),
                    Span::styled(
                        category.remaining.to_string(),
                        theme.remaining(category.is_overspent),
                    ),
                ]),
            ],
        ),
    };
    if let BudgetLine::Category(category) = line
        && category.is_overspent
    {
        lines.push(Line::from(Span::styled(
            "Overspent",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )));
    }

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_for(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
