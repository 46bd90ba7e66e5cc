//! Sequential human-readable identifiers.
//!
//! The institute hands out four counter-backed identifier families:
//! transaction ids (`E0001`), certificate numbers (`CP-CN-001`), student
//! registration numbers (`25010001`, counting up) and employee codes
//! (`CP-0724-01`). Each family draws from a dedicated atomic sequence, so
//! concurrent assignment can never hand out the same number twice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Macro to define a formatted sequential identifier type.
///
/// Generates a newtype around the sequence number with `Display`/`FromStr`
/// against the institute's printed format, and string-based serde.
macro_rules! seq_id_type {
    ($name:ident, $prefix:expr, $width:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(u64);

        impl $name {
            pub const fn from_number(n: u64) -> Self {
                Self(n)
            }

            pub const fn number(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{:0width$}", $prefix, self.0, width = $width)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.strip_prefix($prefix).ok_or(IdError::BadFormat)?;
                let n = digits.parse::<u64>().map_err(|_| IdError::BadFormat)?;
                Ok(Self(n))
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }
    };
}

seq_id_type!(TransactionId, "E", 4, "Enrollment transaction id, printed as `E0001`.");
seq_id_type!(CertificateNumber, "CP-CN-", 3, "Certificate number, printed as `CP-CN-001`.");
seq_id_type!(EmployeeCode, "CP-0724-", 2, "Staff employee code, printed as `CP-0724-01`.");
seq_id_type!(StudentId, "", 8, "Student registration number, a bare sequence starting at 25010001.");

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input does not match the identifier's printed format.
    #[error("identifier does not match the expected format")]
    BadFormat,
}

/// A monotonic identifier sequence.
///
/// `next` hands out the current value and advances; `observe` bumps the
/// sequence past an externally loaded identifier so that re-seeding from
/// pre-existing records can never replay a number.
#[derive(Debug)]
pub struct Sequence {
    next: AtomicU64,
}

impl Sequence {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// register an already-assigned number without handing anything out
    pub fn observe(&self, assigned: u64) {
        self.next.fetch_max(assigned + 1, Ordering::SeqCst);
    }

    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl Clone for Sequence {
    fn clone(&self) -> Self {
        Self::starting_at(self.peek())
    }
}

impl Serialize for Sequence {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.peek().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Sequence::starting_at(u64::deserialize(deserializer)?))
    }
}

/// the four institute id sequences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGenerator {
    transactions: Sequence,
    certificates: Sequence,
    students: Sequence,
    employees: Sequence,
}

/// first student registration number ever issued
pub const FIRST_STUDENT_NUMBER: u64 = 25_010_001;

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            transactions: Sequence::starting_at(1),
            certificates: Sequence::starting_at(1),
            students: Sequence::starting_at(FIRST_STUDENT_NUMBER),
            employees: Sequence::starting_at(1),
        }
    }

    pub fn next_transaction_id(&self) -> TransactionId {
        TransactionId::from_number(self.transactions.next())
    }

    pub fn next_certificate_number(&self) -> CertificateNumber {
        CertificateNumber::from_number(self.certificates.next())
    }

    pub fn next_student_id(&self) -> StudentId {
        StudentId::from_number(self.students.next())
    }

    pub fn next_employee_code(&self) -> EmployeeCode {
        EmployeeCode::from_number(self.employees.next())
    }

    /// seed the sequences from identifiers loaded out of pre-existing records
    pub fn observe_transaction_id(&self, id: TransactionId) {
        self.transactions.observe(id.number());
    }

    pub fn observe_certificate_number(&self, n: CertificateNumber) {
        self.certificates.observe(n.number());
    }

    pub fn observe_student_id(&self, id: StudentId) {
        self.students.observe(id.number());
    }

    pub fn observe_employee_code(&self, code: EmployeeCode) {
        self.employees.observe(code.number());
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
