use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::soft_delete::{SoftDelete, TrashState};
use crate::types::{CourseId, DurationUnit};

/// a course offered by the institute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub fee: Money,
    pub duration: u32,
    pub duration_unit: DurationUnit,
    #[serde(flatten)]
    pub trash: TrashState,
}

impl Course {
    pub fn new(name: impl Into<String>, fee: Money, duration: u32, duration_unit: DurationUnit) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            fee,
            duration,
            duration_unit,
            trash: TrashState::active(),
        }
    }

    /// completion date for a course started on the given day
    pub fn end_date(&self, start: NaiveDate) -> NaiveDate {
        match self.duration_unit {
            DurationUnit::Months => start + chrono::Months::new(self.duration),
            DurationUnit::Weeks => start + chrono::Duration::weeks(i64::from(self.duration)),
        }
    }
}

impl SoftDelete for Course {
    fn trash_state(&self) -> &TrashState {
        &self.trash
    }

    fn trash_state_mut(&mut self) -> &mut TrashState {
        &mut self.trash
    }
}
