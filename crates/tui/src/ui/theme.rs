use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
    pub accent: Color,
    pub positive: Color,
    pub error: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(140, 140, 140),
            border: Color::Rgb(70, 80, 90),
            accent: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(110, 180, 110),
            error: Color::Rgb(200, 80, 80),
            selection: Color::Rgb(35, 50, 60),
        }
    }
}

impl Theme {
    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_for(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.border })
    }

    /// Red when overspent, green otherwise.
    pub fn remaining(&self, overspent: bool) -> Style {
        Style::default().fg(if overspent { self.error } else { self.positive })
    }
}
