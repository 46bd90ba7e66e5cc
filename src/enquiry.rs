use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::StudentId;
use crate::soft_delete::{SoftDelete, TrashState};
use crate::types::{CourseId, ReferralSource};

/// a walk-in or online enquiry about a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub state: String,
    pub city: String,
    pub course_id: CourseId,
    pub referral_source: Option<ReferralSource>,
    /// reference by student registration number, if any
    pub reference_registration_number: Option<StudentId>,
    /// reference by name, if not by registration number
    pub reference_name: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub trash: TrashState,
}

/// enquiry form fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEnquiry {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub state: String,
    pub city: String,
    pub course_id: CourseId,
    pub referral_source: Option<ReferralSource>,
    pub reference_registration_number: Option<StudentId>,
    pub reference_name: Option<String>,
    pub message: Option<String>,
}

impl Enquiry {
    pub fn new(details: NewEnquiry, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: details.name,
            email: details.email,
            phone: details.phone,
            address: details.address,
            pincode: details.pincode,
            state: details.state,
            city: details.city,
            course_id: details.course_id,
            referral_source: details.referral_source,
            reference_registration_number: details.reference_registration_number,
            reference_name: details.reference_name,
            message: details.message,
            created_at,
            trash: TrashState::active(),
        }
    }
}

impl SoftDelete for Enquiry {
    fn trash_state(&self) -> &TrashState {
        &self.trash
    }

    fn trash_state_mut(&mut self) -> &mut TrashState {
        &mut self.trash
    }
}
