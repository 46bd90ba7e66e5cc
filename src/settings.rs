use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// singleton institute settings
///
/// the default admission fee is charged on every new enrollment unless the
/// enrollment overrides it explicitly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstituteSettings {
    pub default_admission_fee: Money,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InstituteSettings {
    pub fn new(default_admission_fee: Money) -> Self {
        Self {
            default_admission_fee,
            updated_at: None,
        }
    }

    pub fn set_admission_fee(&mut self, fee: Money, now: DateTime<Utc>) {
        self.default_admission_fee = fee;
        self.updated_at = Some(now);
    }
}

impl Default for InstituteSettings {
    fn default() -> Self {
        Self::new(Money::ZERO)
    }
}
