use api_types::account::{AccountNew, AccountType, AccountUpdate, AccountView};
use uuid::Uuid;

use super::{
    form::{FieldKind, FormFields, Lookups, cycle_index, parse_optional_money, required_text},
    requests::{ApiCall, Target},
    screen::Resource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Name,
    Type,
    Balance,
    Save,
}

const NEW_LAYOUT: &[AccountField] = &[
    AccountField::Name,
    AccountField::Type,
    AccountField::Balance,
    AccountField::Save,
];
// The balance is only set at creation.
const EDIT_LAYOUT: &[AccountField] = &[AccountField::Name, AccountField::Type, AccountField::Save];

#[derive(Debug, Clone)]
pub struct AccountForm {
    pub name: String,
    pub account_type: AccountType,
    pub balance: String,
    is_new: bool,
}

impl FormFields for AccountForm {
    type Field = AccountField;

    fn layout(&self) -> &'static [AccountField] {
        if self.is_new { NEW_LAYOUT } else { EDIT_LAYOUT }
    }

    fn label(field: AccountField) -> &'static str {
        match field {
            AccountField::Name => "Name",
            AccountField::Type => "Type",
            AccountField::Balance => "Balance",
            AccountField::Save => "Save",
        }
    }

    fn kind(field: AccountField) -> FieldKind {
        match field {
            AccountField::Name | AccountField::Balance => FieldKind::Text,
            AccountField::Type => FieldKind::Choice,
            AccountField::Save => FieldKind::Save,
        }
    }

    fn text_mut(&mut self, field: AccountField) -> Option<&mut String> {
        match field {
            AccountField::Name => Some(&mut self.name),
            AccountField::Balance => Some(&mut self.balance),
            _ => None,
        }
    }

    fn cycle(&mut self, field: AccountField, forward: bool, _lookups: &Lookups<'_>) {
        if field == AccountField::Type {
            let index = AccountType::ALL
                .iter()
                .position(|kind| *kind == self.account_type)
                .unwrap_or(0);
            let next = cycle_index(index, AccountType::ALL.len(), forward);
            self.account_type = AccountType::ALL[next];
        }
    }

    fn display(&self, field: AccountField, _lookups: &Lookups<'_>) -> String {
        match field {
            AccountField::Name => self.name.clone(),
            AccountField::Type => self.account_type.to_string(),
            AccountField::Balance => self.balance.clone(),
            AccountField::Save => String::new(),
        }
    }
}

pub struct Accounts;

impl Resource for Accounts {
    type Item = AccountView;
    type Form = AccountForm;

    const TARGET: Target = Target::Accounts;
    const FETCH_DETAIL: bool = true;

    fn id(item: &AccountView) -> Uuid {
        item.id
    }

    fn new_form(_lookups: &Lookups<'_>) -> AccountForm {
        AccountForm {
            name: String::new(),
            account_type: AccountType::default(),
            balance: String::new(),
            is_new: true,
        }
    }

    fn edit_form(item: &AccountView) -> AccountForm {
        AccountForm {
            name: item.account_name.clone(),
            account_type: item.account_type,
            balance: item.balance.to_string(),
            is_new: false,
        }
    }

    fn create(form: &AccountForm) -> Result<ApiCall, String> {
        let account_name = required_text(&form.name, "name is required")?;
        let initial_balance = parse_optional_money(&form.balance, "balance")?;
        Ok(ApiCall::CreateAccount(AccountNew {
            account_name,
            account_type: form.account_type,
            initial_balance,
        }))
    }

    fn update(id: Uuid, form: &AccountForm) -> Result<ApiCall, String> {
        let account_name = required_text(&form.name, "name is required")?;
        Ok(ApiCall::UpdateAccount(
            id,
            AccountUpdate {
                account_name: Some(account_name),
                account_type: Some(form.account_type),
            },
        ))
    }
}
