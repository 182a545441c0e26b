pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{
    AppState, Focus, Screen, Section,
    budget::BudgetMode,
    requests::{Kind, Target},
    screen::Mode,
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.screen {
        Screen::Login => screens::login::render(frame, area, state),
        Screen::Main => render_shell(frame, area, state),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(0)])
        .split(layout[1]);

    render_nav(frame, body[0], state, &theme);

    let focused = state.focus == Focus::Main;
    match state.section {
        Section::Budget => screens::budget::render(frame, body[1], state, focused),
        Section::Categories => screens::categories::render(frame, body[1], state, focused),
        Section::Groups => screens::groups::render(frame, body[1], state, focused),
        Section::Accounts => screens::accounts::render(frame, body[1], state, focused),
        Section::Transactions => screens::transactions::render(frame, body[1], state, focused),
    }

    render_bottom_bar(frame, layout[2], state, &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state.user.as_deref().unwrap_or("token");
    let loading = [
        Target::Budget,
        Target::Accounts,
        Target::Groups,
        Target::Categories,
        Target::Transactions,
    ]
    .into_iter()
    .any(|target| state.is_pending(target, Kind::List));

    let mut parts = vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("TZ", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.timezone.name())),
    ];
    if loading {
        parts.push(Span::styled("loading...", Style::default().fg(theme.accent)));
    }
    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn render_nav(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let items: Vec<ListItem<'_>> = Section::ALL
        .iter()
        .map(|section| ListItem::new(Line::from(section.label())))
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Section::ALL.iter().position(|section| *section == state.section));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme.border_for(state.focus == Focus::Nav)),
        )
        .highlight_style(theme.highlight())
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn key_hint(key: &'static str, label: &'static str, theme: &Theme) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(theme.accent)),
        Span::raw(label),
    ]
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints: &[(&'static str, &'static str)] = if state.focus == Focus::Nav {
        &[("j/k", " section  "), ("enter", " open  ")]
    } else {
        context_hints(state)
    };

    let mut parts: Vec<Span<'static>> = hints
        .iter()
        .flat_map(|&(key, label)| key_hint(key, label, theme))
        .collect();

    parts.push(Span::styled("│  ", Style::default().fg(theme.border)));
    if !state.is_editing() {
        parts.extend(key_hint("tab", " focus  ", theme));
        parts.extend(key_hint("q", " quit", theme));
    } else {
        parts.extend(key_hint("ctrl+c", " quit", theme));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn mode_hints<F>(mode: &Mode<F>, editing: bool, fetches: bool) -> &'static [(&'static str, &'static str)] {
    match mode {
        Mode::List if fetches => &[
            ("j/k", " move  "),
            ("enter", " transactions  "),
            ("n", " new  "),
            ("d", " delete  "),
            ("r", " reload  "),
        ],
        Mode::List => &[
            ("j/k", " move  "),
            ("enter", " details  "),
            ("n", " new  "),
            ("d", " delete  "),
            ("r", " reload  "),
        ],
        Mode::Details { .. } => &[("e", " edit  "), ("d", " delete  "), ("esc", " back  ")],
        Mode::FormNew(_) | Mode::FormEdit { .. } if editing => &[("esc", " done  ")],
        Mode::FormNew(_) | Mode::FormEdit { .. } => &[
            ("j/k", " field  "),
            ("enter", " edit/save  "),
            ("h/l", " choose  "),
            ("esc", " cancel  "),
        ],
        Mode::ConfirmDelete { .. } => &[("j/k", " choose  "), ("enter", " confirm  "), ("esc", " cancel  ")],
    }
}

fn context_hints(state: &AppState) -> &'static [(&'static str, &'static str)] {
    match state.section {
        Section::Budget => match state.budget.mode {
            BudgetMode::List => &[("j/k", " move  "), ("enter", " details  "), ("r", " reload  ")],
            BudgetMode::Details => &[("esc", " back  "), ("r", " reload  ")],
        },
        Section::Accounts => mode_hints(&state.accounts.mode, state.accounts.is_editing(), true),
        Section::Categories => {
            mode_hints(&state.categories.mode, state.categories.is_editing(), true)
        }
        Section::Groups => mode_hints(&state.groups.mode, state.groups.is_editing(), false),
        Section::Transactions => {
            mode_hints(&state.transactions.mode, state.transactions.is_editing(), false)
        }
    }
}
