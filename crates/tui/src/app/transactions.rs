use api_types::transaction::{TransactionNew, TransactionUpdate, TransactionView};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use super::{
    form::{
        FieldKind, FormFields, Lookups, cycle_optional, cycle_required, parse_money,
        required_text,
    },
    requests::{ApiCall, Target},
    screen::Resource,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Amount,
    Description,
    Date,
    Posted,
    Account,
    Category,
    Save,
}

#[derive(Debug, Clone)]
pub struct TransactionForm {
    pub amount: String,
    pub description: String,
    pub date: String,
    pub posted: bool,
    pub account: Option<Uuid>,
    pub category: Option<Uuid>,
    /// Date text the edit form opened with. Keeping it unchanged keeps the
    /// stored instant, time of day included.
    original_date: Option<String>,
}

/// `YYYY-MM-DD` at midnight UTC.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("invalid date: {input}"))
}

impl FormFields for TransactionForm {
    type Field = TransactionField;

    fn layout(&self) -> &'static [TransactionField] {
        &[
            TransactionField::Amount,
            TransactionField::Description,
            TransactionField::Date,
            TransactionField::Posted,
            TransactionField::Account,
            TransactionField::Category,
            TransactionField::Save,
        ]
    }

    fn label(field: TransactionField) -> &'static str {
        match field {
            TransactionField::Amount => "Amount",
            TransactionField::Description => "Description",
            TransactionField::Date => "Date",
            TransactionField::Posted => "Posted",
            TransactionField::Account => "Account",
            TransactionField::Category => "Category",
            TransactionField::Save => "Save",
        }
    }

    fn kind(field: TransactionField) -> FieldKind {
        match field {
            TransactionField::Amount | TransactionField::Description | TransactionField::Date => {
                FieldKind::Text
            }
            TransactionField::Posted => FieldKind::Toggle,
            TransactionField::Account | TransactionField::Category => FieldKind::Choice,
            TransactionField::Save => FieldKind::Save,
        }
    }

    fn text_mut(&mut self, field: TransactionField) -> Option<&mut String> {
        match field {
            TransactionField::Amount => Some(&mut self.amount),
            TransactionField::Description => Some(&mut self.description),
            TransactionField::Date => Some(&mut self.date),
            _ => None,
        }
    }

    fn cycle(&mut self, field: TransactionField, forward: bool, lookups: &Lookups<'_>) {
        match field {
            TransactionField::Posted => self.posted = !self.posted,
            TransactionField::Account => {
                let ids: Vec<Uuid> = lookups.accounts.iter().map(|account| account.id).collect();
                self.account = cycle_required(self.account, &ids, forward);
            }
            TransactionField::Category => {
                let ids: Vec<Uuid> = lookups
                    .categories
                    .iter()
                    .map(|category| category.id)
                    .collect();
                self.category = cycle_optional(self.category, &ids, forward);
            }
            _ => {}
        }
    }

    fn display(&self, field: TransactionField, lookups: &Lookups<'_>) -> String {
        match field {
            TransactionField::Amount => self.amount.clone(),
            TransactionField::Description => self.description.clone(),
            TransactionField::Date => self.date.clone(),
            TransactionField::Posted => (if self.posted { "[x]" } else { "[ ]" }).to_string(),
            TransactionField::Account => match self.account {
                None => "-".to_string(),
                Some(id) => lookups.account_name(id).unwrap_or("?").to_string(),
            },
            TransactionField::Category => match self.category {
                None => "None".to_string(),
                Some(id) => lookups.category_name(id).unwrap_or("?").to_string(),
            },
            TransactionField::Save => String::new(),
        }
    }
}

struct Validated {
    amount: api_types::Money,
    description: String,
    date: DateTime<Utc>,
    account_id: Uuid,
}

fn validate(form: &TransactionForm) -> Result<Validated, String> {
    let amount = parse_money(&form.amount, "amount")?;
    let description = required_text(&form.description, "description is required")?;
    let date = parse_date(&form.date)?;
    let account_id = form.account.ok_or_else(|| "account is required".to_string())?;
    Ok(Validated {
        amount,
        description,
        date,
        account_id,
    })
}

pub struct Transactions;

impl Resource for Transactions {
    type Item = TransactionView;
    type Form = TransactionForm;

    const TARGET: Target = Target::Transactions;
    const FETCH_DETAIL: bool = false;

    fn id(item: &TransactionView) -> Uuid {
        item.id
    }

    fn new_form(lookups: &Lookups<'_>) -> TransactionForm {
        TransactionForm {
            amount: String::new(),
            description: String::new(),
            date: Utc::now().format(DATE_FORMAT).to_string(),
            posted: false,
            account: lookups.accounts.first().map(|account| account.id),
            category: None,
            original_date: None,
        }
    }

    fn edit_form(item: &TransactionView) -> TransactionForm {
        let date = item.tx_date.format(DATE_FORMAT).to_string();
        TransactionForm {
            amount: item.amount.to_string(),
            description: item.tx_description.clone(),
            original_date: Some(date.clone()),
            date,
            posted: item.posted,
            account: Some(item.account_id),
            category: item.category_id,
        }
    }

    fn create(form: &TransactionForm) -> Result<ApiCall, String> {
        let valid = validate(form)?;
        Ok(ApiCall::CreateTransaction(TransactionNew {
            amount: valid.amount,
            tx_description: valid.description,
            tx_date: valid.date,
            posted: form.posted,
            account_id: valid.account_id,
            category_id: form.category,
        }))
    }

    fn update(id: Uuid, form: &TransactionForm) -> Result<ApiCall, String> {
        let valid = validate(form)?;
        Ok(ApiCall::UpdateTransaction(
            id,
            TransactionUpdate {
                amount: Some(valid.amount),
                tx_description: Some(valid.description),
                tx_date: (form.original_date.as_deref() != Some(form.date.trim()))
                    .then_some(valid.date),
                posted: Some(form.posted),
                account_id: Some(valid.account_id),
                category_id: Some(form.category),
            },
        ))
    }
}
