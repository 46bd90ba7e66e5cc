use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::ids::{CertificateNumber, StudentId, TransactionId};
use crate::settlement::Settlement;
use crate::soft_delete::{SoftDelete, TrashState};
use crate::student::StudentSnapshot;
use crate::types::{CourseId, EnrollmentId, EnrollmentStatus, PaymentMethod, PaymentStatus};

/// a student's enrollment in one course
///
/// the financial fields below the marker comment are derived by the fee
/// settlement engine; callers read them and never write them directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub transaction_id: TransactionId,
    pub certificate_number: Option<CertificateNumber>,

    pub enrollment_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: EnrollmentStatus,
    pub batch_time: Option<NaiveTime>,
    pub notes: Option<String>,

    /// student profile as of the enrollment day
    pub snapshot: StudentSnapshot,

    // financial configuration
    pub discount: Money,
    pub admission_fee: Money,
    pub payment_method: PaymentMethod,
    pub total_installments: Option<u32>,

    // derived settlement fields
    pub final_amount: Money,
    pub amount_remaining: Money,
    pub amount_due: Money,
    pub payment_status: PaymentStatus,

    #[serde(flatten)]
    pub trash: TrashState,
}

impl Enrollment {
    /// overwrite the derived fields from a freshly computed settlement
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        self.final_amount = settlement.final_amount;
        self.amount_remaining = settlement.amount_remaining;
        self.amount_due = settlement.amount_due;
        self.payment_status = settlement.payment_status;
    }

    pub fn is_settled(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

impl SoftDelete for Enrollment {
    fn trash_state(&self) -> &TrashState {
        &self.trash
    }

    fn trash_state_mut(&mut self) -> &mut TrashState {
        &mut self.trash
    }
}
