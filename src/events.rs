use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::ids::{CertificateNumber, StudentId, TransactionId};
use crate::types::{EnrollmentId, EnrollmentStatus, FeeCategory, PaymentId, PaymentStatus};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    StudentRegistered {
        student_id: StudentId,
        timestamp: DateTime<Utc>,
    },
    EnrollmentCreated {
        enrollment_id: EnrollmentId,
        student_id: StudentId,
        transaction_id: TransactionId,
        final_amount: Money,
        enrollment_date: NaiveDate,
    },
    EnrollmentStatusChanged {
        enrollment_id: EnrollmentId,
        old_status: EnrollmentStatus,
        new_status: EnrollmentStatus,
        timestamp: DateTime<Utc>,
    },
    CertificateAssigned {
        enrollment_id: EnrollmentId,
        certificate_number: CertificateNumber,
        timestamp: DateTime<Utc>,
    },

    // payment events
    PaymentRecorded {
        enrollment_id: EnrollmentId,
        payment_id: PaymentId,
        category: FeeCategory,
        amount: Money,
        payment_date: NaiveDate,
        new_remaining: Money,
        new_status: PaymentStatus,
    },
    EnrollmentSettled {
        enrollment_id: EnrollmentId,
        final_amount: Money,
        timestamp: DateTime<Utc>,
    },

    // trash events
    EnrollmentTrashed {
        enrollment_id: EnrollmentId,
        timestamp: DateTime<Utc>,
    },
    EnrollmentRestored {
        enrollment_id: EnrollmentId,
        timestamp: DateTime<Utc>,
    },
    StudentTrashed {
        student_id: StudentId,
        cascaded: bool,
        timestamp: DateTime<Utc>,
    },
    StudentRestored {
        student_id: StudentId,
        cascaded: bool,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
