use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::StudentId;
use crate::soft_delete::{SoftDelete, TrashState};
use crate::types::{Gender, ReferralSource};

/// the mutable profile of a student, shared between the live record and
/// point-in-time snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetails {
    pub full_name: String,
    pub father_name: String,
    pub gender: Gender,
    pub email: String,
    pub dob: NaiveDate,
    pub contact: String,
    pub emergency_contact_number: Option<String>,
    pub address: String,
    pub state: String,
    pub city: String,
    pub pincode: String,
    pub referral_source: Option<ReferralSource>,
    pub referred_by: Option<StudentId>,
    pub referred_by_name: Option<String>,
}

/// a registered student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub student_id: StudentId,
    #[serde(flatten)]
    pub details: StudentDetails,
    #[serde(flatten)]
    pub trash: TrashState,
}

impl Student {
    pub fn new(student_id: StudentId, details: StudentDetails) -> Self {
        Self {
            student_id,
            details,
            trash: TrashState::active(),
        }
    }
}

impl SoftDelete for Student {
    fn trash_state(&self) -> &TrashState {
        &self.trash
    }

    fn trash_state_mut(&mut self) -> &mut TrashState {
        &mut self.trash
    }
}

/// a copy of the student profile frozen at enrollment time
///
/// enrollments keep this snapshot so receipts and certificates show the
/// details as they were on the enrollment day; the live record is read
/// through the ledger's student registry instead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSnapshot {
    pub student_id: StudentId,
    #[serde(flatten)]
    pub details: StudentDetails,
    pub captured_on: NaiveDate,
}

impl StudentSnapshot {
    pub fn capture(student: &Student, captured_on: NaiveDate) -> Self {
        Self {
            student_id: student.student_id,
            details: student.details.clone(),
            captured_on,
        }
    }
}
