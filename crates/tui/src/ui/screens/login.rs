use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::centered_box;
use crate::{
    app::{
        AppState, LoginField,
        requests::{Kind, Target},
    },
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let box_width = 36;
    let box_height = 6;
    let card_area = centered_box(box_width, box_height, area);

    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" budget ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .split(inner);

    let login = &state.login;

    let username_focused = login.focus == LoginField::Username;
    render_input(frame, rows[0], "user", &login.username, false, username_focused, &theme);

    let password_focused = login.focus == LoginField::Password;
    render_input(frame, rows[2], "pass", &login.password, true, password_focused, &theme);

    let (text, style) = match &login.message {
        Some(message) => (message.as_str(), Style::default().fg(theme.error)),
        None if state.is_pending(Target::Session, Kind::Login) => {
            ("signing in...", Style::default().fg(theme.text_muted))
        }
        None => (
            "enter login · ctrl+n sign up · ctrl+c quit",
            Style::default().fg(theme.text_muted),
        ),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(text, style)).alignment(Alignment::Center),
        Rect {
            x: card_area.x,
            y: card_area.y + card_area.height + 1,
            width: card_area.width,
            height: 1,
        }
        .intersection(area),
    );
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    is_password: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };

    let display = if is_password {
        format!("{label} {}{cursor}", mask_password(value))
    } else {
        format!("{label} {value}{cursor}")
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    frame.render_widget(Paragraph::new(Span::styled(display, style)), area);
}

/// One bullet per character.
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}

#[cfg(test)]
mod tests {
    use super::mask_password;

    #[test]
    fn mask_counts_characters_not_bytes() {
        assert_eq!(mask_password(""), "");
        assert_eq!(mask_password("pä$"), "•••");
    }
}
