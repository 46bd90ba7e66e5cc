use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::soft_delete::{SoftDelete, TrashState};

/// an institute expense, attributed to the staff member who spent it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    /// the team member the expense was made by
    pub expense_by: Uuid,
    pub amount: Money,
    pub remarks: Option<String>,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub trash: TrashState,
}

impl Expense {
    pub fn new(
        name: impl Into<String>,
        expense_by: Uuid,
        amount: Money,
        remarks: Option<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            expense_by,
            amount,
            remarks,
            date,
            trash: TrashState::active(),
        }
    }
}

impl SoftDelete for Expense {
    fn trash_state(&self) -> &TrashState {
        &self.trash
    }

    fn trash_state_mut(&mut self) -> &mut TrashState {
        &mut self.trash
    }
}
