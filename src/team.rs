use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::EmployeeCode;
use crate::soft_delete::{SoftDelete, TrashState};

/// a staff member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub phone: String,
    pub email: String,
    pub employee_code: EmployeeCode,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(flatten)]
    pub trash: TrashState,
}

/// staff details supplied at hire time, before a code is assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeamMember {
    pub name: String,
    pub designation: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl TeamMember {
    pub fn new(details: NewTeamMember, employee_code: EmployeeCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: details.name,
            designation: details.designation,
            phone: details.phone,
            email: details.email,
            employee_code,
            city: details.city,
            state: details.state,
            pincode: details.pincode,
            trash: TrashState::active(),
        }
    }
}

impl SoftDelete for TeamMember {
    fn trash_state(&self) -> &TrashState {
        &self.trash
    }

    fn trash_state_mut(&mut self) -> &mut TrashState {
        &mut self.trash
    }
}
