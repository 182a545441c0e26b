use api_types::{Money, account::AccountView, category::CategoryView, group::GroupView};
use uuid::Uuid;

/// How a form row reacts to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice,
    Toggle,
    Save,
}

/// Loaded entities the selectors pick from.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lookups<'a> {
    pub accounts: &'a [AccountView],
    pub groups: &'a [GroupView],
    pub categories: &'a [CategoryView],
}

impl Lookups<'_> {
    pub fn account_name(&self, id: Uuid) -> Option<&str> {
        self.accounts
            .iter()
            .find(|account| account.id == id)
            .map(|account| account.account_name.as_str())
    }

    pub fn group_name(&self, id: Uuid) -> Option<&str> {
        self.groups
            .iter()
            .find(|group| group.id == id)
            .map(|group| group.group_name.as_str())
    }

    pub fn category_name(&self, id: Uuid) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.category_name.as_str())
    }
}

/// The value side of a form: its rows and how each one is edited.
pub trait FormFields {
    type Field: Copy + Eq + std::fmt::Debug + 'static;

    fn layout(&self) -> &'static [Self::Field];
    fn label(field: Self::Field) -> &'static str;
    fn kind(field: Self::Field) -> FieldKind;
    fn text_mut(&mut self, field: Self::Field) -> Option<&mut String>;
    /// Steps a choice or flips a toggle.
    fn cycle(&mut self, field: Self::Field, forward: bool, lookups: &Lookups<'_>);
    fn display(&self, field: Self::Field, lookups: &Lookups<'_>) -> String;
}

#[derive(Debug, Clone)]
pub struct FormState<F> {
    pub fields: F,
    pub focus: usize,
    pub editing: bool,
}

impl<F: FormFields> FormState<F> {
    pub fn new(fields: F) -> Self {
        Self {
            fields,
            focus: 0,
            editing: false,
        }
    }

    pub fn current(&self) -> Option<F::Field> {
        self.fields.layout().get(self.focus).copied()
    }

    pub fn current_kind(&self) -> Option<FieldKind> {
        self.current().map(F::kind)
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    pub fn focus_next(&mut self) {
        let last = self.fields.layout().len().saturating_sub(1);
        self.focus = (self.focus + 1).min(last);
    }

    pub fn cycle_current(&mut self, forward: bool, lookups: &Lookups<'_>) {
        if let Some(field) = self.current() {
            self.fields.cycle(field, forward, lookups);
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if let Some(field) = self.current()
            && let Some(text) = self.fields.text_mut(field)
        {
            text.push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.current()
            && let Some(text) = self.fields.text_mut(field)
        {
            text.pop();
        }
    }
}

/// Parses a required amount, naming the field in the error.
pub fn parse_money(input: &str, what: &str) -> Result<Money, String> {
    input
        .parse::<Money>()
        .map_err(|err| format!("invalid {what}: {err}"))
}

/// Like [`parse_money`], but blank input means "not given".
pub fn parse_optional_money(input: &str, what: &str) -> Result<Option<Money>, String> {
    if input.trim().is_empty() {
        Ok(None)
    } else {
        parse_money(input, what).map(Some)
    }
}

/// Trimmed, non-empty text or the given error.
pub fn required_text(input: &str, error: &str) -> Result<String, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(error.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Steps an optional selection through `[None, ids...]`.
pub fn cycle_optional(current: Option<Uuid>, ids: &[Uuid], forward: bool) -> Option<Uuid> {
    let slots = ids.len() + 1;
    let index = match current {
        None => 0,
        Some(id) => ids.iter().position(|other| *other == id).map_or(0, |i| i + 1),
    };
    let next = if forward {
        (index + 1) % slots
    } else {
        (index + slots - 1) % slots
    };
    if next == 0 { None } else { Some(ids[next - 1]) }
}

/// Steps a required selection through `ids`; stays `None` when empty.
pub fn cycle_required(current: Option<Uuid>, ids: &[Uuid], forward: bool) -> Option<Uuid> {
    if ids.is_empty() {
        return None;
    }
    let next = match current.and_then(|id| ids.iter().position(|other| *other == id)) {
        None => 0,
        Some(index) if forward => (index + 1) % ids.len(),
        Some(index) => (index + ids.len() - 1) % ids.len(),
    };
    Some(ids[next])
}

/// Steps through a fixed list of values, wrapping around.
pub fn cycle_index(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_selector_wraps_through_none() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = [a, b];
        assert_eq!(cycle_optional(None, &ids, true), Some(a));
        assert_eq!(cycle_optional(Some(a), &ids, true), Some(b));
        assert_eq!(cycle_optional(Some(b), &ids, true), None);
        assert_eq!(cycle_optional(None, &ids, false), Some(b));
        assert_eq!(cycle_optional(None, &[], true), None);
    }

    #[test]
    fn required_selector_never_yields_none_with_choices() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = [a, b];
        assert_eq!(cycle_required(None, &ids, true), Some(a));
        assert_eq!(cycle_required(Some(b), &ids, true), Some(a));
        assert_eq!(cycle_required(Some(a), &ids, false), Some(b));
        assert_eq!(cycle_required(Some(a), &[], true), None);
    }

    #[test]
    fn money_errors_name_the_field() {
        assert_eq!(parse_money("12.5", "amount"), Ok(Money::new(1250)));
        assert_eq!(
            parse_money("abc", "amount"),
            Err("invalid amount: not a decimal number".to_string())
        );
        assert_eq!(
            parse_money("1.234", "budget"),
            Err("invalid budget: too many decimals".to_string())
        );
        assert_eq!(parse_optional_money("  ", "balance"), Ok(None));
        assert!(required_text("   ", "name is required").is_err());
        assert_eq!(required_text(" rent ", "x"), Ok("rent".to_string()));
    }

    #[test]
    fn index_cycle_wraps() {
        assert_eq!(cycle_index(3, 4, true), 0);
        assert_eq!(cycle_index(0, 4, false), 3);
        assert_eq!(cycle_index(0, 0, true), 0);
    }

    #[test]
    fn focus_walks_the_layout_and_stops_at_save() {
        let mut form = FormState::new(crate::app::groups::GroupForm::default());
        assert_eq!(form.current_kind(), Some(FieldKind::Text));
        form.push_char('x');
        assert_eq!(form.fields.name, "x");
        form.focus_next();
        form.focus_next();
        assert_eq!(form.current_kind(), Some(FieldKind::Save));
        form.push_char('y');
        assert_eq!(form.fields.name, "x");
        form.focus_prev();
        form.pop_char();
        assert!(form.fields.name.is_empty());
    }
}
