use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{EnrollmentId, FeeCategory, PaymentId, PaymentMode, PaymentStatus};

/// one payment applied against an enrollment's admission or course fee
///
/// the status here is fixed when the row is written and is independent of
/// the enrollment-level aggregate status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub enrollment_id: EnrollmentId,
    pub payment_date: NaiveDate,
    pub amount: Money,
    pub amount_paid: Money,
    pub payment_mode: PaymentMode,
    pub category: FeeCategory,
    pub status: PaymentStatus,
}

impl Payment {
    pub fn new(
        enrollment_id: EnrollmentId,
        category: FeeCategory,
        amount: Money,
        payment_mode: PaymentMode,
        payment_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            enrollment_id,
            payment_date,
            amount,
            amount_paid: amount,
            payment_mode,
            category,
            status: PaymentStatus::Paid,
        }
    }
}
