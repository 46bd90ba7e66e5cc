use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::FeeCategory;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("{category} already settled")]
    CategorySettled {
        category: FeeCategory,
    },

    #[error("amount exceeds due {category} of {outstanding}: requested {requested}")]
    ExceedsOutstanding {
        category: FeeCategory,
        outstanding: Money,
        requested: Money,
    },

    #[error("enrollment not found: {id}")]
    EnrollmentNotFound {
        id: Uuid,
    },

    #[error("enrollment is in trash: {id}")]
    EnrollmentTrashed {
        id: Uuid,
    },

    #[error("student not found: {student_id}")]
    StudentNotFound {
        student_id: String,
    },

    #[error("student is in trash: {student_id}")]
    StudentTrashed {
        student_id: String,
    },

    #[error("course not found: {id}")]
    CourseNotFound {
        id: Uuid,
    },

    #[error("team member not found: {id}")]
    TeamMemberNotFound {
        id: Uuid,
    },

    #[error("expense not found: {id}")]
    ExpenseNotFound {
        id: Uuid,
    },

    #[error("enquiry not found: {id}")]
    EnquiryNotFound {
        id: Uuid,
    },

    #[error("student {student_id} is already enrolled in course {course_id}")]
    DuplicateEnrollment {
        student_id: String,
        course_id: Uuid,
    },

    #[error("duplicate {field}: {value}")]
    DuplicateValue {
        field: &'static str,
        value: String,
    },

    #[error("total installments required for installment payment method")]
    MissingInstallments,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("not in trash: {message}")]
    NotTrashed {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
