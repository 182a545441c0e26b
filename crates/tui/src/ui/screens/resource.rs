//! Rendering shared by every CRUD screen.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use super::{centered_box, transactions::transaction_row};
use crate::{
    app::{
        AppState,
        form::{FieldKind, FormFields, FormState, Lookups},
        screen::{Confirm, Mode, Resource, ScreenModel},
    },
    ui::theme::Theme,
};

/// How one resource fills the shared layout.
pub struct ResourceView<'a, R: Resource> {
    pub title: &'static str,
    pub model: &'a ScreenModel<R>,
    pub lookups: Lookups<'a>,
    pub row: fn(&R::Item, &AppState) -> String,
    pub details: fn(&R::Item, &AppState) -> Vec<(&'static str, String)>,
}

pub fn render<R: Resource>(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    view: &ResourceView<'_, R>,
    focused: bool,
) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_status(frame, layout[0], view.model.error.as_deref(), &theme);

    match &view.model.mode {
        Mode::List => render_list(frame, layout[1], state, view, focused, &theme),
        Mode::Details { .. } => render_details(frame, layout[1], state, view, &theme),
        Mode::FormNew(form) => {
            let title = format!("New {}", view.title);
            render_form(frame, layout[1], &title, form, &view.lookups, &theme);
        }
        Mode::FormEdit { form, .. } => {
            let title = format!("Edit {}", view.title);
            render_form(frame, layout[1], &title, form, &view.lookups, &theme);
        }
        Mode::ConfirmDelete { choice, .. } => {
            render_list(frame, layout[1], state, view, false, &theme);
            render_confirm(frame, layout[1], *choice, &theme);
        }
    }
}

pub fn render_status(frame: &mut Frame<'_>, area: Rect, error: Option<&str>, theme: &Theme) {
    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Span::styled(error, Style::default().fg(theme.error))),
            area,
        );
    }
}

fn render_list<R: Resource>(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    view: &ResourceView<'_, R>,
    focused: bool,
    theme: &Theme,
) {
    let items: Vec<ListItem<'_>> = view
        .model
        .items
        .iter()
        .map(|item| ListItem::new(Line::from((view.row)(item, state))))
        .collect();

    let empty = items.is_empty();
    let mut list_state = ListState::default();
    if !empty {
        list_state.select(Some(view.model.cursor));
    }

    let block = Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_for(focused));

    if empty {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nothing here yet. Press n to add one.",
                Style::default().fg(theme.text_muted),
            ))
            .alignment(Alignment::Center)
            .block(block),
            area,
        );
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.highlight())
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_details<R: Resource>(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    view: &ResourceView<'_, R>,
    theme: &Theme,
) {
    let Some(item) = view.model.detail_item() else {
        return;
    };
    let fields = (view.details)(item, state);
    let header_height = fields.len() as u16 + 2;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header_height), Constraint::Min(0)])
        .split(area);

    let lines: Vec<Line<'_>> = fields
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<12}"), Style::default().fg(theme.text_muted)),
                Span::raw(value),
            ])
        })
        .collect();
    let block = Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_for(true));
    frame.render_widget(Paragraph::new(lines).block(block), layout[0]);

    if R::FETCH_DETAIL {
        let rows: Vec<ListItem<'_>> = view
            .model
            .detail
            .iter()
            .map(|tx| ListItem::new(Line::from(transaction_row(tx, state.timezone))))
            .collect();
        let block = Block::default()
            .title(format!(" Transactions ({}) ", rows.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border_for(false));
        frame.render_widget(List::new(rows).block(block), layout[1]);
    }
}

fn render_form<F: FormFields>(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    form: &FormState<F>,
    lookups: &Lookups<'_>,
    theme: &Theme,
) {
    let lines: Vec<Line<'_>> = form
        .fields
        .layout()
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let focused = index == form.focus;
            let style = if focused {
                theme.highlight()
            } else {
                Style::default().fg(theme.text)
            };
            if F::kind(*field) == FieldKind::Save {
                return Line::from(Span::styled(format!("  [ {} ]", F::label(*field)), style));
            }
            let mut value = form.fields.display(*field, lookups);
            if focused && form.editing {
                value.push('│');
            }
            let hint = match F::kind(*field) {
                FieldKind::Choice if focused => "  ‹ h/l ›",
                FieldKind::Toggle if focused => "  (enter)",
                _ => "",
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<12}", F::label(*field)),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(value, style),
                Span::styled(hint, Style::default().fg(theme.text_muted)),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_for(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, choice: Confirm, theme: &Theme) {
    let dialog = centered_box(30, 6, area);
    frame.render_widget(Clear, dialog);

    let option = |label: &'static str, selected: bool| {
        let style = if selected {
            theme.highlight()
        } else {
            Style::default().fg(theme.text)
        };
        Line::from(Span::styled(format!("  {label}"), style))
    };
    let lines = vec![
        Line::from(Span::styled(
            "Delete this item?",
            Style::default().fg(theme.error),
        )),
        option("Yes", choice == Confirm::Delete),
        option("Cancel", choice == Confirm::Cancel),
    ];
    let block = Block::default()
        .title(" confirm ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error));
    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}
