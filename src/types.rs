use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for an enrollment
pub type EnrollmentId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// unique identifier for a course
pub type CourseId = Uuid;

/// how the course fee is paid off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// full discounted course fee due at once
    OneTime,
    /// course fee spread across the course duration
    Monthly,
    /// course fee split into a fixed number of equal dues
    Installment,
}

/// payment channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Online,
}

/// aggregate settlement status of an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// nothing outstanding
    Paid,
    /// at least one payment recorded, balance remains
    Partial,
    /// no payment recorded yet
    Due,
}

/// which fee bucket a payment settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeCategory {
    AdmissionFee,
    CourseFee,
}

impl fmt::Display for FeeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeCategory::AdmissionFee => write!(f, "Admission Fee"),
            FeeCategory::CourseFee => write!(f, "Course Fee"),
        }
    }
}

/// course duration unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Weeks,
    Months,
}

/// enrollment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Deactive,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// how a student or enquirer found the institute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralSource {
    Instagram,
    Facebook,
    Friend,
    Relative,
    Newspaper,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_category_display_matches_payment_tags() {
        assert_eq!(FeeCategory::AdmissionFee.to_string(), "Admission Fee");
        assert_eq!(FeeCategory::CourseFee.to_string(), "Course Fee");
    }

    #[test]
    fn test_snake_case_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::OneTime).unwrap(),
            "\"one_time\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMode::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
        let status: PaymentStatus = serde_json::from_str("\"partial\"").unwrap();
        assert_eq!(status, PaymentStatus::Partial);
    }
}
