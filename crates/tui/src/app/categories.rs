use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
use uuid::Uuid;

use super::{
    form::{
        FieldKind, FormFields, Lookups, cycle_optional, parse_optional_money, required_text,
    },
    requests::{ApiCall, Target},
    screen::Resource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Budget,
    Group,
    Save,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryForm {
    pub name: String,
    pub budget: String,
    pub group: Option<Uuid>,
}

impl FormFields for CategoryForm {
    type Field = CategoryField;

    fn layout(&self) -> &'static [CategoryField] {
        &[
            CategoryField::Name,
            CategoryField::Budget,
            CategoryField::Group,
            CategoryField::Save,
        ]
    }

    fn label(field: CategoryField) -> &'static str {
        match field {
            CategoryField::Name => "Name",
            CategoryField::Budget => "Budget",
            CategoryField::Group => "Group",
            CategoryField::Save => "Save",
        }
    }

    fn kind(field: CategoryField) -> FieldKind {
        match field {
            CategoryField::Name | CategoryField::Budget => FieldKind::Text,
            CategoryField::Group => FieldKind::Choice,
            CategoryField::Save => FieldKind::Save,
        }
    }

    fn text_mut(&mut self, field: CategoryField) -> Option<&mut String> {
        match field {
            CategoryField::Name => Some(&mut self.name),
            CategoryField::Budget => Some(&mut self.budget),
            _ => None,
        }
    }

    fn cycle(&mut self, field: CategoryField, forward: bool, lookups: &Lookups<'_>) {
        if field == CategoryField::Group {
            let ids: Vec<Uuid> = lookups.groups.iter().map(|group| group.id).collect();
            self.group = cycle_optional(self.group, &ids, forward);
        }
    }

    fn display(&self, field: CategoryField, lookups: &Lookups<'_>) -> String {
        match field {
            CategoryField::Name => self.name.clone(),
            CategoryField::Budget => self.budget.clone(),
            CategoryField::Group => match self.group {
                None => "None".to_string(),
                Some(id) => lookups.group_name(id).unwrap_or("?").to_string(),
            },
            CategoryField::Save => String::new(),
        }
    }
}

pub struct Categories;

impl Resource for Categories {
    type Item = CategoryView;
    type Form = CategoryForm;

    const TARGET: Target = Target::Categories;
    const FETCH_DETAIL: bool = true;

    fn id(item: &CategoryView) -> Uuid {
        item.id
    }

    fn new_form(_lookups: &Lookups<'_>) -> CategoryForm {
        CategoryForm::default()
    }

    fn edit_form(item: &CategoryView) -> CategoryForm {
        CategoryForm {
            name: item.category_name.clone(),
            budget: item.budget.to_string(),
            group: item.group_id,
        }
    }

    fn create(form: &CategoryForm) -> Result<ApiCall, String> {
        let category_name = required_text(&form.name, "name is required")?;
        let budget = parse_optional_money(&form.budget, "budget")?;
        Ok(ApiCall::CreateCategory(CategoryNew {
            category_name,
            budget,
            group_id: form.group,
        }))
    }

    fn update(id: Uuid, form: &CategoryForm) -> Result<ApiCall, String> {
        let category_name = required_text(&form.name, "name is required")?;
        let budget = parse_optional_money(&form.budget, "budget")?;
        Ok(ApiCall::UpdateCategory(
            id,
            CategoryUpdate {
                category_name: Some(category_name),
                budget,
                // Always sent, so picking "None" ungroups.
                group_id: Some(form.group),
            },
        ))
    }
}
