use api_types::group::{GroupNew, GroupUpdate, GroupView};
use uuid::Uuid;

use super::{
    form::{FieldKind, FormFields, Lookups, required_text},
    requests::{ApiCall, Target},
    screen::Resource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Name,
    Save,
}

#[derive(Debug, Clone, Default)]
pub struct GroupForm {
    pub name: String,
}

impl FormFields for GroupForm {
    type Field = GroupField;

    fn layout(&self) -> &'static [GroupField] {
        &[GroupField::Name, GroupField::Save]
    }

    fn label(field: GroupField) -> &'static str {
        match field {
            GroupField::Name => "Name",
            GroupField::Save => "Save",
        }
    }

    fn kind(field: GroupField) -> FieldKind {
        match field {
            GroupField::Name => FieldKind::Text,
            GroupField::Save => FieldKind::Save,
        }
    }

    fn text_mut(&mut self, field: GroupField) -> Option<&mut String> {
        (field == GroupField::Name).then_some(&mut self.name)
    }

    fn cycle(&mut self, _field: GroupField, _forward: bool, _lookups: &Lookups<'_>) {}

    fn display(&self, field: GroupField, _lookups: &Lookups<'_>) -> String {
        match field {
            GroupField::Name => self.name.clone(),
            GroupField::Save => String::new(),
        }
    }
}

pub struct Groups;

impl Resource for Groups {
    type Item = GroupView;
    type Form = GroupForm;

    const TARGET: Target = Target::Groups;
    const FETCH_DETAIL: bool = false;

    fn id(item: &GroupView) -> Uuid {
        item.id
    }

    fn new_form(_lookups: &Lookups<'_>) -> GroupForm {
        GroupForm::default()
    }

    fn edit_form(item: &GroupView) -> GroupForm {
        GroupForm {
            name: item.group_name.clone(),
        }
    }

    fn create(form: &GroupForm) -> Result<ApiCall, String> {
        let group_name = required_text(&form.name, "name is required")?;
        Ok(ApiCall::CreateGroup(GroupNew { group_name }))
    }

    fn update(id: Uuid, form: &GroupForm) -> Result<ApiCall, String> {
        let group_name = required_text(&form.name, "name is required")?;
        Ok(ApiCall::UpdateGroup(
            id,
            GroupUpdate {
                group_name: Some(group_name),
            },
        ))
    }
}
