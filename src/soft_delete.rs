use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// trash flag + timestamp carried by every soft-deletable record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashState {
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TrashState {
    pub fn active() -> Self {
        Self::default()
    }
}

/// soft-delete capability: records are moved to trash and restored,
/// never physically removed
pub trait SoftDelete {
    fn trash_state(&self) -> &TrashState;
    fn trash_state_mut(&mut self) -> &mut TrashState;

    fn is_trashed(&self) -> bool {
        self.trash_state().is_deleted
    }

    fn trash(&mut self, now: DateTime<Utc>) {
        let state = self.trash_state_mut();
        state.is_deleted = true;
        state.deleted_at = Some(now);
    }

    fn restore(&mut self) {
        let state = self.trash_state_mut();
        state.is_deleted = false;
        state.deleted_at = None;
    }
}
