//! The list / details / form / confirm machine shared by every CRUD screen.

use api_types::transaction::TransactionView;
use uuid::Uuid;

use super::{
    form::{FieldKind, FormFields, FormState, Lookups},
    requests::{ApiCall, Target},
};
use crate::ui::keymap::AppAction;

/// What a CRUD screen needs to know about the entity it manages.
pub trait Resource {
    type Item: Clone;
    type Form: FormFields + Clone;

    const TARGET: Target;
    /// Entering an item first fetches its transactions.
    const FETCH_DETAIL: bool;

    fn id(item: &Self::Item) -> Uuid;
    fn new_form(lookups: &Lookups<'_>) -> Self::Form;
    fn edit_form(item: &Self::Item) -> Self::Form;
    fn create(form: &Self::Form) -> Result<ApiCall, String>;
    fn update(id: Uuid, form: &Self::Form) -> Result<ApiCall, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Delete,
    Cancel,
}

impl Confirm {
    fn toggled(self) -> Self {
        match self {
            Self::Delete => Self::Cancel,
            Self::Cancel => Self::Delete,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Mode<F> {
    List,
    Details { id: Uuid },
    FormNew(FormState<F>),
    FormEdit { id: Uuid, form: FormState<F> },
    ConfirmDelete { id: Uuid, choice: Confirm },
}

/// The mutation the current mode dispatched and still waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Awaiting {
    Save,
    Delete(Uuid),
}

enum FormStep {
    Stay,
    Close,
    Submit(Result<ApiCall, String>),
}

pub struct ScreenModel<R: Resource> {
    pub items: Vec<R::Item>,
    pub cursor: usize,
    pub mode: Mode<R::Form>,
    pub error: Option<String>,
    /// Transactions fetched for the item shown in Details.
    pub detail: Vec<TransactionView>,
    awaiting: Option<Awaiting>,
}

impl<R: Resource> Default for ScreenModel<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            mode: Mode::List,
            error: None,
            detail: Vec::new(),
            awaiting: None,
        }
    }
}

/// Cursor position after the list shrank to `len` items.
pub fn clamp_cursor(cursor: usize, len: usize) -> usize {
    if len <= 1 {
        0
    } else if cursor >= len {
        len - 1
    } else {
        cursor
    }
}

impl<R: Resource> ScreenModel<R> {
    pub fn selected(&self) -> Option<&R::Item> {
        self.items.get(self.cursor)
    }

    fn find(&self, id: Uuid) -> Option<&R::Item> {
        self.items.iter().find(|item| R::id(item) == id)
    }

    /// The item Details was opened for, independent of the cursor.
    pub fn detail_item(&self) -> Option<&R::Item> {
        match self.mode {
            Mode::Details { id } => self.find(id),
            _ => None,
        }
    }

    /// Mode changes driven by keys forget any mutation the old mode sent.
    fn enter(&mut self, mode: Mode<R::Form>) {
        self.awaiting = None;
        self.mode = mode;
    }

    /// A form field is capturing text, so printable keys belong to it.
    pub fn is_editing(&self) -> bool {
        match &self.mode {
            Mode::FormNew(form) | Mode::FormEdit { form, .. } => form.editing,
            _ => false,
        }
    }

    pub fn form(&self) -> Option<&FormState<R::Form>> {
        match &self.mode {
            Mode::FormNew(form) | Mode::FormEdit { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn handle(&mut self, action: AppAction, lookups: &Lookups<'_>) -> Option<ApiCall> {
        let step = match &mut self.mode {
            Mode::List => return self.on_list(action, lookups),
            Mode::Details { id } => {
                let id = *id;
                return self.on_details(id, action);
            }
            Mode::ConfirmDelete { id, choice } => {
                let (id, choice) = (*id, *choice);
                return self.on_confirm(id, choice, action);
            }
            Mode::FormNew(form) => form_step::<R>(form, None, action, lookups),
            Mode::FormEdit { id, form } => form_step::<R>(form, Some(*id), action, lookups),
        };

        match step {
            FormStep::Stay => None,
            FormStep::Close => {
                self.enter(Mode::List);
                None
            }
            FormStep::Submit(Ok(call)) => {
                self.awaiting = Some(Awaiting::Save);
                Some(call)
            }
            FormStep::Submit(Err(message)) => {
                self.error = Some(message);
                None
            }
        }
    }

    fn on_list(&mut self, action: AppAction, lookups: &Lookups<'_>) -> Option<ApiCall> {
        match action {
            AppAction::Up | AppAction::Input('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppAction::Down | AppAction::Input('j') => {
                self.cursor = (self.cursor + 1).min(self.items.len().saturating_sub(1));
            }
            AppAction::Submit => {
                let id = self.selected().map(R::id)?;
                if R::FETCH_DETAIL {
                    return Some(ApiCall::Detail(R::TARGET, id));
                }
                self.detail.clear();
                self.error = None;
                self.enter(Mode::Details { id });
            }
            AppAction::Input('n') => {
                self.error = None;
                self.enter(Mode::FormNew(FormState::new(R::new_form(lookups))));
            }
            AppAction::Input('d') => {
                let id = self.selected().map(R::id)?;
                self.enter(Mode::ConfirmDelete {
                    id,
                    choice: Confirm::Cancel,
                });
            }
            AppAction::Input('r') => return Some(ApiCall::List(R::TARGET)),
            _ => {}
        }
        None
    }

    fn on_details(&mut self, id: Uuid, action: AppAction) -> Option<ApiCall> {
        match action {
            AppAction::Cancel => self.enter(Mode::List),
            AppAction::Input('e') => {
                let form = FormState::new(R::edit_form(self.find(id)?));
                self.error = None;
                self.enter(Mode::FormEdit { id, form });
            }
            AppAction::Input('d') => {
                self.find(id)?;
                self.enter(Mode::ConfirmDelete {
                    id,
                    choice: Confirm::Cancel,
                });
            }
            _ => {}
        }
        None
    }

    fn on_confirm(&mut self, id: Uuid, choice: Confirm, action: AppAction) -> Option<ApiCall> {
        match action {
            AppAction::Up | AppAction::Down | AppAction::Input('j') | AppAction::Input('k') => {
                self.mode = Mode::ConfirmDelete {
                    id,
                    choice: choice.toggled(),
                };
            }
            AppAction::Submit if choice == Confirm::Delete => {
                self.awaiting = Some(Awaiting::Delete(id));
                return Some(ApiCall::Delete(R::TARGET, id));
            }
            AppAction::Submit | AppAction::Cancel => self.enter(Mode::List),
            _ => {}
        }
        None
    }

    pub fn loaded(&mut self, items: Vec<R::Item>) {
        self.items = items;
        self.cursor = 0;
    }

    /// Opens Details for `id` unless the user moved on since asking.
    pub fn show_detail(&mut self, id: Uuid, transactions: Vec<TransactionView>) {
        if !matches!(self.mode, Mode::List) || self.find(id).is_none() {
            return;
        }
        self.detail = transactions;
        self.error = None;
        self.enter(Mode::Details { id });
    }

    /// A save landed. Only the form that sent it closes.
    pub fn saved(&mut self) {
        let from_form = matches!(self.mode, Mode::FormNew(_) | Mode::FormEdit { .. });
        if from_form && self.awaiting == Some(Awaiting::Save) {
            self.error = None;
            self.enter(Mode::List);
        }
    }

    pub fn deleted(&mut self, id: Uuid) {
        self.items.retain(|item| R::id(item) != id);
        self.cursor = clamp_cursor(self.cursor, self.items.len());
        let closes = match &self.mode {
            Mode::ConfirmDelete { .. } => self.awaiting == Some(Awaiting::Delete(id)),
            Mode::Details { id: shown } | Mode::FormEdit { id: shown, .. } => *shown == id,
            Mode::List | Mode::FormNew(_) => false,
        };
        if closes {
            self.error = None;
            self.enter(Mode::List);
        }
    }

    pub fn failed(&mut self, message: String) {
        self.error = Some(message);
    }
}

fn form_step<R: Resource>(
    form: &mut FormState<R::Form>,
    id: Option<Uuid>,
    action: AppAction,
    lookups: &Lookups<'_>,
) -> FormStep {
    if form.editing {
        match action {
            AppAction::Input(ch) => form.push_char(ch),
            AppAction::Backspace => form.pop_char(),
            AppAction::Submit | AppAction::Cancel => form.editing = false,
            _ => {}
        }
        return FormStep::Stay;
    }

    match action {
        AppAction::Up | AppAction::Input('k') => form.focus_prev(),
        AppAction::Down | AppAction::Input('j') => form.focus_next(),
        AppAction::Left | AppAction::Input('h') => form.cycle_current(false, lookups),
        AppAction::Right | AppAction::Input('l') => form.cycle_current(true, lookups),
        AppAction::Cancel => return FormStep::Close,
        AppAction::Submit => match form.current_kind() {
            Some(FieldKind::Text) => form.editing = true,
            Some(FieldKind::Choice | FieldKind::Toggle) => form.cycle_current(true, lookups),
            Some(FieldKind::Save) => {
                return FormStep::Submit(match id {
                    None => R::create(&form.fields),
                    Some(id) => R::update(id, &form.fields),
                });
            }
            None => {}
        },
        _ => {}
    }
    FormStep::Stay
}

#[cfg(test)]
mod tests {
    use api_types::group::{GroupNew, GroupUpdate};

    use super::*;

    #[derive(Clone, Debug)]
    struct Tag {
        id: Uuid,
        name: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum TagField {
        Name,
        Save,
    }

    #[derive(Clone, Debug, Default)]
    struct TagForm {
        name: String,
    }

    impl FormFields for TagForm {
        type Field = TagField;

        fn layout(&self) -> &'static [TagField] {
            &[TagField::Name, TagField::Save]
        }

        fn label(field: TagField) -> &'static str {
            match field {
                TagField::Name => "Name",
                TagField::Save => "Save",
            }
        }

        fn kind(field: TagField) -> FieldKind {
            match field {
                TagField::Name => FieldKind::Text,
                TagField::Save => FieldKind::Save,
            }
        }

        fn text_mut(&mut self, field: TagField) -> Option<&mut String> {
            (field == TagField::Name).then_some(&mut self.name)
        }

        fn cycle(&mut self, _field: TagField, _forward: bool, _lookups: &Lookups<'_>) {}

        fn display(&self, field: TagField, _lookups: &Lookups<'_>) -> String {
            match field {
                TagField::Name => self.name.clone(),
                TagField::Save => String::new(),
            }
        }
    }

    struct Tags;

    impl Resource for Tags {
        type Item = Tag;
        type Form = TagForm;

        const TARGET: Target = Target::Groups;
        const FETCH_DETAIL: bool = false;

        fn id(item: &Tag) -> Uuid {
            item.id
        }

        fn new_form(_lookups: &Lookups<'_>) -> TagForm {
            TagForm::default()
        }

        fn edit_form(item: &Tag) -> TagForm {
            TagForm {
                name: item.name.clone(),
            }
        }

        fn create(form: &TagForm) -> Result<ApiCall, String> {
            if form.name.trim().is_empty() {
                return Err("name is required".to_string());
            }
            Ok(ApiCall::CreateGroup(GroupNew {
                group_name: form.name.clone(),
            }))
        }

        fn update(id: Uuid, form: &TagForm) -> Result<ApiCall, String> {
            Ok(ApiCall::UpdateGroup(
                id,
                GroupUpdate {
                    group_name: Some(form.name.clone()),
                },
            ))
        }
    }

    fn tag(name: &str) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    fn model(names: &[&str]) -> ScreenModel<Tags> {
        let mut model = ScreenModel::<Tags>::default();
        model.loaded(names.iter().map(|name| tag(name)).collect());
        model
    }

    fn press(model: &mut ScreenModel<Tags>, actions: &[AppAction]) -> Option<ApiCall> {
        let lookups = Lookups::default();
        let mut last = None;
        for action in actions {
            last = model.handle(*action, &lookups);
        }
        last
    }

    #[test]
    fn cursor_is_clamped_to_list_bounds() {
        let mut model = model(&["a", "b"]);
        press(&mut model, &[AppAction::Up]);
        assert_eq!(model.cursor, 0);
        press(&mut model, &[AppAction::Down, AppAction::Down, AppAction::Down]);
        assert_eq!(model.cursor, 1);
    }

    #[test]
    fn delete_needs_items_and_defaults_to_cancel() {
        let mut empty = model(&[]);
        press(&mut empty, &[AppAction::Input('d')]);
        assert!(matches!(empty.mode, Mode::List));

        let mut model = model(&["a"]);
        press(&mut model, &[AppAction::Input('d')]);
        assert!(matches!(
            model.mode,
            Mode::ConfirmDelete {
                choice: Confirm::Cancel,
                ..
            }
        ));
        assert!(press(&mut model, &[AppAction::Submit]).is_none());
        assert!(matches!(model.mode, Mode::List));
    }

    #[test]
    fn confirming_delete_dispatches_for_selected_id() {
        let mut model = model(&["a", "b"]);
        let id = model.items[1].id;
        let call = press(
            &mut model,
            &[
                AppAction::Down,
                AppAction::Input('d'),
                AppAction::Down,
                AppAction::Submit,
            ],
        );
        assert!(matches!(call, Some(ApiCall::Delete(Target::Groups, del)) if del == id));
    }

    #[test]
    fn deleting_last_of_two_resets_cursor() {
        let mut model = model(&["a", "b"]);
        model.cursor = 1;
        let id = model.items[1].id;
        model.deleted(id);
        assert_eq!(model.items.len(), 1);
        assert_eq!(model.items[0].name, "a");
        assert_eq!(model.cursor, 0);
        assert!(matches!(model.mode, Mode::List));
    }

    #[test]
    fn cursor_clamp_rules() {
        assert_eq!(clamp_cursor(0, 0), 0);
        assert_eq!(clamp_cursor(3, 1), 0);
        assert_eq!(clamp_cursor(3, 3), 2);
        assert_eq!(clamp_cursor(1, 3), 1);
    }

    #[test]
    fn text_edit_captures_keys_until_esc() {
        let mut model = model(&[]);
        press(
            &mut model,
            &[
                AppAction::Input('n'),
                AppAction::Submit,
                AppAction::Input('q'),
                AppAction::Input('j'),
                AppAction::Input('x'),
                AppAction::Backspace,
            ],
        );
        assert!(model.is_editing());
        let form = model.form().unwrap();
        assert_eq!(form.fields.name, "qj");
        assert_eq!(form.focus, 0);

        press(&mut model, &[AppAction::Cancel]);
        assert!(!model.is_editing());
        assert!(matches!(model.mode, Mode::FormNew(_)));

        press(&mut model, &[AppAction::Cancel]);
        assert!(matches!(model.mode, Mode::List));
    }

    #[test]
    fn invalid_form_keeps_input_and_sends_nothing() {
        let mut model = model(&[]);
        let call = press(
            &mut model,
            &[AppAction::Input('n'), AppAction::Down, AppAction::Submit],
        );
        assert!(call.is_none());
        assert_eq!(model.error.as_deref(), Some("name is required"));
        assert!(matches!(model.mode, Mode::FormNew(_)));
    }

    #[test]
    fn edit_form_is_prefilled_and_submits_update() {
        let mut model = model(&["rent"]);
        let id = model.items[0].id;
        press(&mut model, &[AppAction::Submit]);
        assert!(matches!(model.mode, Mode::Details { id: shown } if shown == id));
        press(&mut model, &[AppAction::Input('e')]);
        assert_eq!(model.form().unwrap().fields.name, "rent");

        let call = press(&mut model, &[AppAction::Down, AppAction::Submit]);
        match call {
            Some(ApiCall::UpdateGroup(updated, payload)) => {
                assert_eq!(updated, id);
                assert_eq!(payload.group_name.as_deref(), Some("rent"));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn failure_keeps_mode_and_success_returns_to_list() {
        let mut model = model(&["rent"]);
        let call = press(
            &mut model,
            &[
                AppAction::Submit,
                AppAction::Input('e'),
                AppAction::Down,
                AppAction::Submit,
            ],
        );
        assert!(call.is_some());
        model.failed("forbidden: group belongs to another user".to_string());
        assert!(matches!(model.mode, Mode::FormEdit { .. }));
        assert_eq!(model.form().unwrap().fields.name, "rent");

        press(&mut model, &[AppAction::Submit]);
        model.saved();
        assert!(matches!(model.mode, Mode::List));
        assert!(model.error.is_none());
    }

    #[test]
    fn late_save_leaves_a_form_opened_afterwards() {
        let mut model = model(&[]);
        let call = press(
            &mut model,
            &[
                AppAction::Input('n'),
                AppAction::Submit,
                AppAction::Input('a'),
                AppAction::Cancel,
                AppAction::Down,
                AppAction::Submit,
            ],
        );
        assert!(call.is_some());
        press(
            &mut model,
            &[
                AppAction::Cancel,
                AppAction::Input('n'),
                AppAction::Submit,
                AppAction::Input('b'),
            ],
        );

        model.saved();
        assert_eq!(model.form().unwrap().fields.name, "b");
    }

    #[test]
    fn detail_result_is_ignored_once_the_user_moved_on() {
        let mut model = model(&["a", "b"]);
        let a = model.items[0].id;
        press(
            &mut model,
            &[AppAction::Input('n'), AppAction::Submit, AppAction::Input('x')],
        );

        model.show_detail(a, Vec::new());
        assert_eq!(model.form().unwrap().fields.name, "x");
        assert!(model.detail_item().is_none());
    }

    #[test]
    fn details_follow_the_fetched_id_not_the_cursor() {
        let mut model = model(&["a", "b"]);
        let a = model.items[0].id;
        model.cursor = 1;

        model.show_detail(a, Vec::new());
        assert!(matches!(model.mode, Mode::Details { id } if id == a));
        assert_eq!(model.detail_item().unwrap().name, "a");

        press(&mut model, &[AppAction::Input('e')]);
        assert_eq!(model.form().unwrap().fields.name, "a");
    }

    #[test]
    fn an_earlier_delete_removes_its_item_without_closing_a_newer_confirm() {
        let mut model = model(&["a", "b", "c"]);
        let a = model.items[0].id;
        let b = model.items[1].id;
        press(
            &mut model,
            &[AppAction::Input('d'), AppAction::Down, AppAction::Submit],
        );
        press(
            &mut model,
            &[
                AppAction::Cancel,
                AppAction::Down,
                AppAction::Input('d'),
                AppAction::Down,
                AppAction::Submit,
            ],
        );
        assert!(matches!(model.mode, Mode::ConfirmDelete { id, .. } if id == b));

        model.deleted(a);
        let names: Vec<_> = model.items.iter().map(|tag| tag.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
        assert!(matches!(model.mode, Mode::ConfirmDelete { .. }));

        model.deleted(b);
        assert!(matches!(model.mode, Mode::List));
    }

    #[test]
    fn reload_resets_cursor() {
        let mut model = model(&["a", "b", "c"]);
        model.cursor = 2;
        model.loaded(vec![tag("x"), tag("y"), tag("z")]);
        assert_eq!(model.cursor, 0);
    }
}
