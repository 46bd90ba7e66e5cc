pub mod course;
pub mod decimal;
pub mod enquiry;
pub mod enrollment;
pub mod errors;
pub mod events;
pub mod expense;
pub mod ids;
pub mod ledger;
pub mod payment;
pub mod reports;
pub mod settings;
pub mod settlement;
pub mod soft_delete;
pub mod student;
pub mod team;
pub mod types;

// re-export key types
pub use decimal::Money;
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use ids::{CertificateNumber, EmployeeCode, IdGenerator, StudentId, TransactionId};
pub use ledger::{Certificate, InstituteLedger, NewEnrollment};
pub use settings::InstituteSettings;
pub use settlement::{Settlement, SettlementInputs};
pub use soft_delete::SoftDelete;
pub use types::{
    DurationUnit, EnrollmentId, EnrollmentStatus, FeeCategory, PaymentId, PaymentMethod,
    PaymentMode, PaymentStatus,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
