use api_types::budget::{BudgetCategory, BudgetGroup, BudgetOverview};

use super::requests::{ApiCall, Target};
use crate::ui::keymap::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetMode {
    List,
    Details,
}

/// One selectable row of the overview.
#[derive(Debug, Clone, Copy)]
pub enum BudgetLine<'a> {
    Group(&'a BudgetGroup),
    Category(&'a BudgetCategory),
}

#[derive(Debug)]
pub struct BudgetModel {
    pub overview: Option<BudgetOverview>,
    pub cursor: usize,
    pub mode: BudgetMode,
    pub error: Option<String>,
}

impl Default for BudgetModel {
    fn default() -> Self {
        Self {
            overview: None,
            cursor: 0,
            mode: BudgetMode::List,
            error: None,
        }
    }
}

impl BudgetModel {
    /// Groups each followed by their categories, then the ungrouped ones.
    pub fn lines(&self) -> Vec<BudgetLine<'_>> {
        let Some(overview) = &self.overview else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        for group in &overview.groups {
            lines.push(BudgetLine::Group(group));
            lines.extend(group.categories.iter().map(BudgetLine::Category));
        }
        lines.extend(overview.ungrouped_categories.iter().map(BudgetLine::Category));
        lines
    }

    pub fn selected(&self) -> Option<BudgetLine<'_>> {
        self.lines().get(self.cursor).copied()
    }

    pub fn handle(&mut self, action: AppAction) -> Option<ApiCall> {
        if action == AppAction::Input('r') {
            return Some(ApiCall::List(Target::Budget));
        }
        match self.mode {
            BudgetMode::List => match action {
                AppAction::Up | AppAction::Input('k') => {
                    self.cursor = self.cursor.saturating_sub(1);
                }
                AppAction::Down | AppAction::Input('j') => {
                    let last = self.lines().len().saturating_sub(1);
                    self.cursor = (self.cursor + 1).min(last);
                }
                AppAction::Submit if self.selected().is_some() => {
                    self.mode = BudgetMode::Details;
                }
                _ => {}
            },
            BudgetMode::Details => {
                if action == AppAction::Cancel {
                    self.mode = BudgetMode::List;
                }
            }
        }
        None
    }

    pub fn loaded(&mut self, overview: BudgetOverview) {
        self.overview = Some(overview);
        self.cursor = 0;
        self.mode = BudgetMode::List;
        self.error = None;
    }

    pub fn failed(&mut self, message: String) {
        self.error = Some(message);
    }
}
