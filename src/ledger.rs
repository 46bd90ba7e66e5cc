//! The institute ledger.
//!
//! In-memory registry of courses, students, enrollments, payments, staff,
//! expenses and enquiries, plus the operations that mutate them. Every
//! mutating operation validates first, then writes, then re-derives the
//! affected enrollment's settlement fields, so derived state is never stale
//! and a failed write leaves everything untouched.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::course::Course;
use crate::decimal::Money;
use crate::enquiry::{Enquiry, NewEnquiry};
use crate::enrollment::Enrollment;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::expense::Expense;
use crate::ids::{CertificateNumber, IdGenerator, StudentId};
use crate::payment::Payment;
use crate::settings::InstituteSettings;
use crate::settlement::{Settlement, SettlementInputs};
use crate::soft_delete::SoftDelete;
use crate::student::{Student, StudentDetails, StudentSnapshot};
use crate::team::{NewTeamMember, TeamMember};
use crate::types::{
    CourseId, DurationUnit, EnrollmentId, EnrollmentStatus, FeeCategory, PaymentId,
    PaymentMethod, PaymentMode,
};

/// days until the first due date after enrollment
const DUE_DATE_OFFSET_DAYS: i64 = 30;

/// enrollment form fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEnrollment {
    pub student_id: StudentId,
    pub course_id: CourseId,
    /// defaults to the ledger clock's current date
    pub enrollment_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub total_installments: Option<u32>,
    pub discount: Money,
    /// defaults to the institute-wide admission fee setting
    pub admission_fee: Option<Money>,
    pub batch_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

/// certificate data for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate_number: CertificateNumber,
    pub student: StudentSnapshot,
    pub course_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstituteLedger {
    pub settings: InstituteSettings,
    ids: IdGenerator,
    courses: BTreeMap<CourseId, Course>,
    students: BTreeMap<StudentId, Student>,
    enrollments: BTreeMap<EnrollmentId, Enrollment>,
    payments: Vec<Payment>,
    team: BTreeMap<Uuid, TeamMember>,
    expenses: BTreeMap<Uuid, Expense>,
    enquiries: BTreeMap<Uuid, Enquiry>,
    #[serde(skip)]
    events: EventStore,
}

impl InstituteLedger {
    pub fn new(settings: InstituteSettings) -> Self {
        Self {
            settings,
            ids: IdGenerator::new(),
            courses: BTreeMap::new(),
            students: BTreeMap::new(),
            enrollments: BTreeMap::new(),
            payments: Vec::new(),
            team: BTreeMap::new(),
            expenses: BTreeMap::new(),
            enquiries: BTreeMap::new(),
            events: EventStore::new(),
        }
    }

    // ---- courses ----

    pub fn add_course(
        &mut self,
        name: impl Into<String>,
        fee: Money,
        duration: u32,
        duration_unit: DurationUnit,
    ) -> Result<CourseId> {
        let name = name.into();
        if fee.is_negative() {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("course fee must not be negative: {fee}"),
            });
        }
        if self
            .courses
            .values()
            .any(|c| !c.is_trashed() && c.name == name)
        {
            return Err(LedgerError::DuplicateValue {
                field: "course name",
                value: name,
            });
        }

        let course = Course::new(name, fee, duration, duration_unit);
        let id = course.id;
        self.courses.insert(id, course);
        Ok(id)
    }

    /// active course lookup; trashed courses are rejected distinctly
    pub fn course(&self, id: CourseId) -> Result<&Course> {
        let course = self
            .courses
            .get(&id)
            .ok_or(LedgerError::CourseNotFound { id })?;
        if course.is_trashed() {
            return Err(LedgerError::CourseNotFound { id });
        }
        Ok(course)
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values().filter(|c| !c.is_trashed())
    }

    pub fn trash_course(&mut self, id: CourseId, time: &SafeTimeProvider) -> Result<()> {
        let course = self
            .courses
            .get_mut(&id)
            .ok_or(LedgerError::CourseNotFound { id })?;
        course.trash(time.now());
        Ok(())
    }

    pub fn restore_course(&mut self, id: CourseId) -> Result<()> {
        let course = self
            .courses
            .get_mut(&id)
            .ok_or(LedgerError::CourseNotFound { id })?;
        if !course.is_trashed() {
            return Err(LedgerError::NotTrashed {
                message: format!("course {id}"),
            });
        }
        course.restore();
        Ok(())
    }

    // ---- students ----

    pub fn register_student(
        &mut self,
        details: StudentDetails,
        time: &SafeTimeProvider,
    ) -> Result<StudentId> {
        if self
            .students
            .values()
            .any(|s| !s.is_trashed() && s.details.email == details.email)
        {
            return Err(LedgerError::DuplicateValue {
                field: "email",
                value: details.email,
            });
        }
        if let Some(referrer) = details.referred_by {
            if !self.students.contains_key(&referrer) {
                return Err(LedgerError::StudentNotFound {
                    student_id: referrer.to_string(),
                });
            }
        }

        let student_id = self.ids.next_student_id();
        self.students
            .insert(student_id, Student::new(student_id, details));
        self.events.emit(Event::StudentRegistered {
            student_id,
            timestamp: time.now(),
        });
        info!(%student_id, "student registered");
        Ok(student_id)
    }

    /// active student lookup; trashed students are rejected distinctly
    pub fn student(&self, student_id: StudentId) -> Result<&Student> {
        let student = self
            .students
            .get(&student_id)
            .ok_or(LedgerError::StudentNotFound {
                student_id: student_id.to_string(),
            })?;
        if student.is_trashed() {
            return Err(LedgerError::StudentTrashed {
                student_id: student_id.to_string(),
            });
        }
        Ok(student)
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values().filter(|s| !s.is_trashed())
    }

    // ---- enrollments ----

    pub fn enroll(&mut self, new: NewEnrollment, time: &SafeTimeProvider) -> Result<EnrollmentId> {
        let student = self.student(new.student_id)?;
        let course = self.course(new.course_id)?;

        if new.discount.is_negative() {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("discount must not be negative: {}", new.discount),
            });
        }
        if matches!(new.admission_fee, Some(fee) if fee.is_negative()) {
            return Err(LedgerError::InvalidConfiguration {
                message: "admission fee must not be negative".to_string(),
            });
        }
        if new.payment_method == PaymentMethod::Installment
            && !matches!(new.total_installments, Some(n) if n > 0)
        {
            return Err(LedgerError::MissingInstallments);
        }
        // (student, course) unique among non-trashed enrollments
        if self.enrollments.values().any(|e| {
            !e.is_trashed() && e.student_id == new.student_id && e.course_id == new.course_id
        }) {
            return Err(LedgerError::DuplicateEnrollment {
                student_id: new.student_id.to_string(),
                course_id: new.course_id,
            });
        }

        let enrollment_date = new
            .enrollment_date
            .unwrap_or_else(|| time.now().date_naive());
        let due_date = enrollment_date + chrono::Duration::days(DUE_DATE_OFFSET_DAYS);
        let admission_fee = new
            .admission_fee
            .unwrap_or(self.settings.default_admission_fee);
        let snapshot = StudentSnapshot::capture(student, enrollment_date);
        let transaction_id = self.ids.next_transaction_id();

        let mut enrollment = Enrollment {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            course_id: new.course_id,
            transaction_id,
            certificate_number: None,
            enrollment_date,
            due_date,
            status: EnrollmentStatus::Active,
            batch_time: new.batch_time,
            notes: new.notes,
            snapshot,
            discount: new.discount,
            admission_fee,
            payment_method: new.payment_method,
            total_installments: new.total_installments,
            final_amount: Money::ZERO,
            amount_remaining: Money::ZERO,
            amount_due: Money::ZERO,
            payment_status: crate::types::PaymentStatus::Due,
            trash: crate::soft_delete::TrashState::active(),
        };

        let settlement = Settlement::compute(&self.settlement_inputs(&enrollment, course));
        enrollment.apply_settlement(&settlement);

        let id = enrollment.id;
        let final_amount = enrollment.final_amount;
        self.enrollments.insert(id, enrollment);

        self.events.emit(Event::EnrollmentCreated {
            enrollment_id: id,
            student_id: new.student_id,
            transaction_id,
            final_amount,
            enrollment_date,
        });
        info!(enrollment_id = %id, %transaction_id, %final_amount, "enrollment created");
        Ok(id)
    }

    /// active enrollment lookup; trashed enrollments are rejected distinctly
    pub fn enrollment(&self, id: EnrollmentId) -> Result<&Enrollment> {
        let enrollment = self
            .enrollments
            .get(&id)
            .ok_or(LedgerError::EnrollmentNotFound { id })?;
        if enrollment.is_trashed() {
            return Err(LedgerError::EnrollmentTrashed { id });
        }
        Ok(enrollment)
    }

    /// lookup regardless of trash state, for trash views and reports
    pub fn enrollment_any(&self, id: EnrollmentId) -> Option<&Enrollment> {
        self.enrollments.get(&id)
    }

    pub fn enrollments(&self) -> impl Iterator<Item = &Enrollment> {
        self.enrollments.values().filter(|e| !e.is_trashed())
    }

    pub fn enrollments_for_student(
        &self,
        student_id: StudentId,
    ) -> impl Iterator<Item = &Enrollment> {
        self.enrollments()
            .filter(move |e| e.student_id == student_id)
    }

    // ---- payments ----

    /// sum of payments recorded against one fee category of one enrollment
    pub fn category_paid(&self, enrollment_id: EnrollmentId, category: FeeCategory) -> Money {
        self.payments
            .iter()
            .filter(|p| p.enrollment_id == enrollment_id && p.category == category)
            .map(|p| p.amount_paid)
            .sum()
    }

    pub fn payments_for(&self, enrollment_id: EnrollmentId) -> impl Iterator<Item = &Payment> {
        self.payments
            .iter()
            .filter(move |p| p.enrollment_id == enrollment_id)
    }

    pub fn payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments.iter()
    }

    /// current settlement snapshot, recomputed from stored records
    pub fn settlement(&self, enrollment_id: EnrollmentId) -> Result<Settlement> {
        let enrollment = self.enrollment(enrollment_id)?;
        let course = self
            .courses
            .get(&enrollment.course_id)
            .ok_or(LedgerError::CourseNotFound {
                id: enrollment.course_id,
            })?;
        Ok(Settlement::compute(
            &self.settlement_inputs(enrollment, course),
        ))
    }

    /// record one payment against a fee category of an enrollment
    ///
    /// the first payment ever recorded on an enrollment is dated to the
    /// enrollment date itself, regardless of the caller-supplied date
    pub fn record_payment(
        &mut self,
        enrollment_id: EnrollmentId,
        category: FeeCategory,
        amount: Money,
        payment_mode: PaymentMode,
        payment_date: Option<NaiveDate>,
        time: &SafeTimeProvider,
    ) -> Result<PaymentId> {
        let enrollment = self.enrollment(enrollment_id)?;
        if !amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount { amount });
        }

        let settlement = self.settlement(enrollment_id)?;
        let outstanding = match category {
            FeeCategory::AdmissionFee => settlement.admission_fee_remaining,
            FeeCategory::CourseFee => settlement.course_fee_remaining,
        };
        if outstanding.is_zero() {
            return Err(LedgerError::CategorySettled { category });
        }
        if amount > outstanding {
            return Err(LedgerError::ExceedsOutstanding {
                category,
                outstanding,
                requested: amount,
            });
        }

        let is_first_payment = !self
            .payments
            .iter()
            .any(|p| p.enrollment_id == enrollment_id);
        let date = if is_first_payment {
            enrollment.enrollment_date
        } else {
            payment_date.unwrap_or_else(|| time.now().date_naive())
        };

        let payment = Payment::new(enrollment_id, category, amount, payment_mode, date);
        let payment_id = payment.id;
        self.payments.push(payment);

        let settlement = self.recompute(enrollment_id)?;
        self.events.emit(Event::PaymentRecorded {
            enrollment_id,
            payment_id,
            category,
            amount,
            payment_date: date,
            new_remaining: settlement.amount_remaining,
            new_status: settlement.payment_status,
        });
        if settlement.amount_remaining.is_zero() {
            self.events.emit(Event::EnrollmentSettled {
                enrollment_id,
                final_amount: settlement.final_amount,
                timestamp: time.now(),
            });
            info!(%enrollment_id, "enrollment fully settled");
        }
        debug!(%enrollment_id, %amount, %category, "payment recorded");
        Ok(payment_id)
    }

    /// apply an opening payment taken with the enrollment form
    ///
    /// split admission-fee-first, remainder against the course fee; both
    /// parts are dated to the enrollment date
    pub fn apply_initial_payment(
        &mut self,
        enrollment_id: EnrollmentId,
        amount: Money,
        payment_mode: PaymentMode,
        time: &SafeTimeProvider,
    ) -> Result<Vec<PaymentId>> {
        if amount.is_zero() {
            return Ok(Vec::new());
        }
        if amount.is_negative() {
            return Err(LedgerError::InvalidPaymentAmount { amount });
        }

        let settlement = self.settlement(enrollment_id)?;
        let to_admission = amount.min(settlement.admission_fee_remaining);
        let to_course = amount - to_admission;
        if to_course > settlement.course_fee_remaining {
            return Err(LedgerError::ExceedsOutstanding {
                category: FeeCategory::CourseFee,
                outstanding: settlement.course_fee_remaining,
                requested: to_course,
            });
        }

        let date = Some(self.enrollment(enrollment_id)?.enrollment_date);
        let mut recorded = Vec::new();
        if to_admission.is_positive() {
            recorded.push(self.record_payment(
                enrollment_id,
                FeeCategory::AdmissionFee,
                to_admission,
                payment_mode,
                date,
                time,
            )?);
        }
        if to_course.is_positive() {
            recorded.push(self.record_payment(
                enrollment_id,
                FeeCategory::CourseFee,
                to_course,
                payment_mode,
                date,
                time,
            )?);
        }
        Ok(recorded)
    }

    // ---- enrollment lifecycle ----

    pub fn toggle_enrollment_status(
        &mut self,
        id: EnrollmentId,
        time: &SafeTimeProvider,
    ) -> Result<EnrollmentStatus> {
        let enrollment = self
            .enrollments
            .get_mut(&id)
            .ok_or(LedgerError::EnrollmentNotFound { id })?;
        if enrollment.is_trashed() {
            return Err(LedgerError::EnrollmentTrashed { id });
        }
        let old_status = enrollment.status;
        enrollment.status = match old_status {
            EnrollmentStatus::Active => EnrollmentStatus::Deactive,
            _ => EnrollmentStatus::Active,
        };
        let new_status = enrollment.status;
        self.events.emit(Event::EnrollmentStatusChanged {
            enrollment_id: id,
            old_status,
            new_status,
            timestamp: time.now(),
        });
        Ok(new_status)
    }

    /// mark completed and make sure a certificate number is assigned
    pub fn mark_completed(
        &mut self,
        id: EnrollmentId,
        time: &SafeTimeProvider,
    ) -> Result<CertificateNumber> {
        let enrollment = self
            .enrollments
            .get_mut(&id)
            .ok_or(LedgerError::EnrollmentNotFound { id })?;
        if enrollment.is_trashed() {
            return Err(LedgerError::EnrollmentTrashed { id });
        }
        let old_status = enrollment.status;
        enrollment.status = EnrollmentStatus::Completed;
        if old_status != EnrollmentStatus::Completed {
            self.events.emit(Event::EnrollmentStatusChanged {
                enrollment_id: id,
                old_status,
                new_status: EnrollmentStatus::Completed,
                timestamp: time.now(),
            });
        }
        self.ensure_certificate_number(id, time)
    }

    /// certificate data for rendering; assigns the number lazily on first view
    pub fn issue_certificate(
        &mut self,
        id: EnrollmentId,
        time: &SafeTimeProvider,
    ) -> Result<Certificate> {
        let certificate_number = self.ensure_certificate_number(id, time)?;
        let enrollment = self.enrollment(id)?;
        let course = self
            .courses
            .get(&enrollment.course_id)
            .ok_or(LedgerError::CourseNotFound {
                id: enrollment.course_id,
            })?;

        Ok(Certificate {
            certificate_number,
            student: enrollment.snapshot.clone(),
            course_name: course.name.clone(),
            start_date: enrollment.enrollment_date,
            end_date: course.end_date(enrollment.enrollment_date),
        })
    }

    fn ensure_certificate_number(
        &mut self,
        id: EnrollmentId,
        time: &SafeTimeProvider,
    ) -> Result<CertificateNumber> {
        if let Some(number) = self.enrollment(id)?.certificate_number {
            return Ok(number);
        }
        let number = self.ids.next_certificate_number();
        let enrollment = self
            .enrollments
            .get_mut(&id)
            .ok_or(LedgerError::EnrollmentNotFound { id })?;
        enrollment.certificate_number = Some(number);
        self.events.emit(Event::CertificateAssigned {
            enrollment_id: id,
            certificate_number: number,
            timestamp: time.now(),
        });
        Ok(number)
    }

    // ---- trash and restore ----

    /// move an enrollment to trash; the student follows once their last
    /// active enrollment is gone
    pub fn trash_enrollment(&mut self, id: EnrollmentId, time: &SafeTimeProvider) -> Result<()> {
        let enrollment = self
            .enrollments
            .get_mut(&id)
            .ok_or(LedgerError::EnrollmentNotFound { id })?;
        if enrollment.is_trashed() {
            return Err(LedgerError::EnrollmentTrashed { id });
        }
        let student_id = enrollment.student_id;
        enrollment.trash(time.now());
        self.events.emit(Event::EnrollmentTrashed {
            enrollment_id: id,
            timestamp: time.now(),
        });

        let remaining = self
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id && !e.is_trashed())
            .count();
        if remaining == 0 {
            if let Some(student) = self.students.get_mut(&student_id) {
                student.trash(time.now());
                self.events.emit(Event::StudentTrashed {
                    student_id,
                    cascaded: true,
                    timestamp: time.now(),
                });
                info!(%student_id, "last active enrollment trashed, student moved to trash");
            }
        }
        Ok(())
    }

    /// restore an enrollment; a trashed parent student is restored with it
    pub fn restore_enrollment(&mut self, id: EnrollmentId, time: &SafeTimeProvider) -> Result<()> {
        let enrollment = self
            .enrollments
            .get_mut(&id)
            .ok_or(LedgerError::EnrollmentNotFound { id })?;
        if !enrollment.is_trashed() {
            return Err(LedgerError::NotTrashed {
                message: format!("enrollment {id}"),
            });
        }
        let student_id = enrollment.student_id;
        enrollment.restore();
        self.events.emit(Event::EnrollmentRestored {
            enrollment_id: id,
            timestamp: time.now(),
        });

        if let Some(student) = self.students.get_mut(&student_id) {
            if student.is_trashed() {
                student.restore();
                self.events.emit(Event::StudentRestored {
                    student_id,
                    cascaded: true,
                    timestamp: time.now(),
                });
            }
        }
        Ok(())
    }

    /// move a student and all their active enrollments to trash
    pub fn trash_student(&mut self, student_id: StudentId, time: &SafeTimeProvider) -> Result<()> {
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or(LedgerError::StudentNotFound {
                student_id: student_id.to_string(),
            })?;
        if student.is_trashed() {
            return Err(LedgerError::StudentTrashed {
                student_id: student_id.to_string(),
            });
        }
        student.trash(time.now());
        self.events.emit(Event::StudentTrashed {
            student_id,
            cascaded: false,
            timestamp: time.now(),
        });

        let enrollment_ids: Vec<EnrollmentId> = self
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id && !e.is_trashed())
            .map(|e| e.id)
            .collect();
        for id in enrollment_ids {
            if let Some(enrollment) = self.enrollments.get_mut(&id) {
                enrollment.trash(time.now());
                self.events.emit(Event::EnrollmentTrashed {
                    enrollment_id: id,
                    timestamp: time.now(),
                });
            }
        }
        Ok(())
    }

    /// restore a student together with all their trashed enrollments
    pub fn restore_student(
        &mut self,
        student_id: StudentId,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or(LedgerError::StudentNotFound {
                student_id: student_id.to_string(),
            })?;
        if !student.is_trashed() {
            return Err(LedgerError::NotTrashed {
                message: format!("student {student_id}"),
            });
        }
        student.restore();
        self.events.emit(Event::StudentRestored {
            student_id,
            cascaded: false,
            timestamp: time.now(),
        });

        let enrollment_ids: Vec<EnrollmentId> = self
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id && e.is_trashed())
            .map(|e| e.id)
            .collect();
        for id in enrollment_ids {
            if let Some(enrollment) = self.enrollments.get_mut(&id) {
                enrollment.restore();
                self.events.emit(Event::EnrollmentRestored {
                    enrollment_id: id,
                    timestamp: time.now(),
                });
            }
        }
        Ok(())
    }

    pub fn trashed_students(&self) -> impl Iterator<Item = &Student> {
        self.students.values().filter(|s| s.is_trashed())
    }

    pub fn trashed_enrollments(&self) -> impl Iterator<Item = &Enrollment> {
        self.enrollments.values().filter(|e| e.is_trashed())
    }

    pub fn trashed_courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values().filter(|c| c.is_trashed())
    }

    pub fn trashed_team(&self) -> impl Iterator<Item = &TeamMember> {
        self.team.values().filter(|t| t.is_trashed())
    }

    pub fn trashed_expenses(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.values().filter(|e| e.is_trashed())
    }

    pub fn trashed_enquiries(&self) -> impl Iterator<Item = &Enquiry> {
        self.enquiries.values().filter(|e| e.is_trashed())
    }

    // ---- team ----

    pub fn add_team_member(&mut self, details: NewTeamMember) -> Result<Uuid> {
        if self
            .team
            .values()
            .any(|t| !t.is_trashed() && t.email == details.email)
        {
            return Err(LedgerError::DuplicateValue {
                field: "email",
                value: details.email,
            });
        }
        let member = TeamMember::new(details, self.ids.next_employee_code());
        let id = member.id;
        self.team.insert(id, member);
        Ok(id)
    }

    pub fn team_member(&self, id: Uuid) -> Result<&TeamMember> {
        let member = self
            .team
            .get(&id)
            .ok_or(LedgerError::TeamMemberNotFound { id })?;
        if member.is_trashed() {
            return Err(LedgerError::TeamMemberNotFound { id });
        }
        Ok(member)
    }

    pub fn team(&self) -> impl Iterator<Item = &TeamMember> {
        self.team.values().filter(|t| !t.is_trashed())
    }

    pub fn trash_team_member(&mut self, id: Uuid, time: &SafeTimeProvider) -> Result<()> {
        let member = self
            .team
            .get_mut(&id)
            .ok_or(LedgerError::TeamMemberNotFound { id })?;
        member.trash(time.now());
        Ok(())
    }

    pub fn restore_team_member(&mut self, id: Uuid) -> Result<()> {
        let member = self
            .team
            .get_mut(&id)
            .ok_or(LedgerError::TeamMemberNotFound { id })?;
        if !member.is_trashed() {
            return Err(LedgerError::NotTrashed {
                message: format!("team member {id}"),
            });
        }
        member.restore();
        Ok(())
    }

    // ---- expenses ----

    pub fn add_expense(
        &mut self,
        name: impl Into<String>,
        expense_by: Uuid,
        amount: Money,
        remarks: Option<String>,
        time: &SafeTimeProvider,
    ) -> Result<Uuid> {
        self.team_member(expense_by)?;
        if !amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount { amount });
        }
        let expense = Expense::new(name, expense_by, amount, remarks, time.now().date_naive());
        let id = expense.id;
        self.expenses.insert(id, expense);
        Ok(id)
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.values().filter(|e| !e.is_trashed())
    }

    pub fn trash_expense(&mut self, id: Uuid, time: &SafeTimeProvider) -> Result<()> {
        let expense = self
            .expenses
            .get_mut(&id)
            .ok_or(LedgerError::ExpenseNotFound { id })?;
        expense.trash(time.now());
        Ok(())
    }

    pub fn restore_expense(&mut self, id: Uuid) -> Result<()> {
        let expense = self
            .expenses
            .get_mut(&id)
            .ok_or(LedgerError::ExpenseNotFound { id })?;
        if !expense.is_trashed() {
            return Err(LedgerError::NotTrashed {
                message: format!("expense {id}"),
            });
        }
        expense.restore();
        Ok(())
    }

    // ---- enquiries ----

    pub fn record_enquiry(&mut self, details: NewEnquiry, time: &SafeTimeProvider) -> Result<Uuid> {
        self.course(details.course_id)?;
        let enquiry = Enquiry::new(details, time.now());
        let id = enquiry.id;
        self.enquiries.insert(id, enquiry);
        Ok(id)
    }

    pub fn enquiries(&self) -> impl Iterator<Item = &Enquiry> {
        self.enquiries.values().filter(|e| !e.is_trashed())
    }

    /// resolve an enquiry's reference registration number against the live
    /// student registry
    pub fn reference_student(&self, enquiry_id: Uuid) -> Result<Option<&Student>> {
        let enquiry = self
            .enquiries
            .get(&enquiry_id)
            .ok_or(LedgerError::EnquiryNotFound { id: enquiry_id })?;
        Ok(enquiry
            .reference_registration_number
            .and_then(|student_id| self.student(student_id).ok()))
    }

    pub fn trash_enquiry(&mut self, id: Uuid, time: &SafeTimeProvider) -> Result<()> {
        let enquiry = self
            .enquiries
            .get_mut(&id)
            .ok_or(LedgerError::EnquiryNotFound { id })?;
        enquiry.trash(time.now());
        Ok(())
    }

    pub fn restore_enquiry(&mut self, id: Uuid) -> Result<()> {
        let enquiry = self
            .enquiries
            .get_mut(&id)
            .ok_or(LedgerError::EnquiryNotFound { id })?;
        if !enquiry.is_trashed() {
            return Err(LedgerError::NotTrashed {
                message: format!("enquiry {id}"),
            });
        }
        enquiry.restore();
        Ok(())
    }

    // ---- events and export ----

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    // ---- internals ----

    fn settlement_inputs(&self, enrollment: &Enrollment, course: &Course) -> SettlementInputs {
        SettlementInputs {
            course_fee: course.fee,
            discount: enrollment.discount,
            admission_fee: enrollment.admission_fee,
            payment_method: enrollment.payment_method,
            total_installments: enrollment.total_installments,
            course_duration: Some(course.duration),
            admission_fee_paid: self.category_paid(enrollment.id, FeeCategory::AdmissionFee),
            course_fee_paid: self.category_paid(enrollment.id, FeeCategory::CourseFee),
        }
    }

    /// re-derive and persist one enrollment's settlement fields
    fn recompute(&mut self, id: EnrollmentId) -> Result<Settlement> {
        let settlement = self.settlement(id)?;
        let enrollment = self
            .enrollments
            .get_mut(&id)
            .ok_or(LedgerError::EnrollmentNotFound { id })?;
        enrollment.apply_settlement(&settlement);
        debug!(enrollment_id = %id, status = ?settlement.payment_status, "settlement recomputed");
        Ok(settlement)
    }
}

impl Default for InstituteLedger {
    fn default() -> Self {
        Self::new(InstituteSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    use crate::types::PaymentStatus;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
        ))
    }

    fn details(name: &str, email: &str) -> StudentDetails {
        StudentDetails {
            full_name: name.to_string(),
            father_name: "Ramesh Kumar".to_string(),
            gender: crate::types::Gender::Male,
            email: email.to_string(),
            dob: NaiveDate::from_ymd_opt(2002, 5, 14).unwrap(),
            contact: "9876543210".to_string(),
            emergency_contact_number: None,
            address: "12 MG Road".to_string(),
            state: "Maharashtra".to_string(),
            city: "Pune".to_string(),
            pincode: "411001".to_string(),
            referral_source: None,
            referred_by: None,
            referred_by_name: None,
        }
    }

    /// ledger with one course (10000, 6 months) and one student, enrolled
    /// with discount 1000, admission fee 500, 3 installments
    fn ledger_with_enrollment() -> (InstituteLedger, SafeTimeProvider, EnrollmentId, StudentId) {
        let time = test_time();
        let mut ledger = InstituteLedger::new(InstituteSettings::new(Money::from_major(500)));
        let course_id = ledger
            .add_course("Full Stack", Money::from_major(10_000), 6, DurationUnit::Months)
            .unwrap();
        let student_id = ledger
            .register_student(details("Aarav Shah", "aarav@example.com"), &time)
            .unwrap();
        let enrollment_id = ledger
            .enroll(
                NewEnrollment {
                    student_id,
                    course_id,
                    enrollment_date: None,
                    payment_method: PaymentMethod::Installment,
                    total_installments: Some(3),
                    discount: Money::from_major(1_000),
                    admission_fee: None,
                    batch_time: None,
                    notes: None,
                },
                &time,
            )
            .unwrap();
        (ledger, time, enrollment_id, student_id)
    }

    #[test]
    fn test_enroll_derives_settlement_fields() {
        let (ledger, _time, enrollment_id, _) = ledger_with_enrollment();
        let e = ledger.enrollment(enrollment_id).unwrap();

        assert_eq!(e.admission_fee, Money::from_major(500)); // from settings
        assert_eq!(e.final_amount, Money::from_major(9_500));
        assert_eq!(e.amount_remaining, Money::from_major(9_500));
        assert_eq!(e.amount_due, Money::from_major(3_000));
        assert_eq!(e.payment_status, PaymentStatus::Due);
        assert_eq!(e.transaction_id.to_string(), "E0001");
        assert_eq!(e.enrollment_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(e.due_date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn test_duplicate_enrollment_rejected() {
        let (mut ledger, time, enrollment_id, student_id) = ledger_with_enrollment();
        let course_id = ledger.enrollment(enrollment_id).unwrap().course_id;

        let result = ledger.enroll(
            NewEnrollment {
                student_id,
                course_id,
                enrollment_date: None,
                payment_method: PaymentMethod::OneTime,
                total_installments: None,
                discount: Money::ZERO,
                admission_fee: None,
                batch_time: None,
                notes: None,
            },
            &time,
        );
        assert!(matches!(result, Err(LedgerError::DuplicateEnrollment { .. })));
    }

    #[test]
    fn test_installment_method_requires_count() {
        let (mut ledger, time, _, student_id) = ledger_with_enrollment();
        let course_id = ledger
            .add_course("Data Science", Money::from_major(15_000), 4, DurationUnit::Months)
            .unwrap();

        let result = ledger.enroll(
            NewEnrollment {
                student_id,
                course_id,
                enrollment_date: None,
                payment_method: PaymentMethod::Installment,
                total_installments: None,
                discount: Money::ZERO,
                admission_fee: None,
                batch_time: None,
                notes: None,
            },
            &time,
        );
        assert!(matches!(result, Err(LedgerError::MissingInstallments)));
    }

    #[test]
    fn test_admission_then_course_installments_settle() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();

        // admission fee payment settles that category
        ledger
            .record_payment(
                enrollment_id,
                FeeCategory::AdmissionFee,
                Money::from_major(500),
                PaymentMode::Cash,
                None,
                &time,
            )
            .unwrap();
        let e = ledger.enrollment(enrollment_id).unwrap();
        assert_eq!(e.amount_remaining, Money::from_major(9_000));
        assert_eq!(e.payment_status, PaymentStatus::Partial);
        let s = ledger.settlement(enrollment_id).unwrap();
        assert_eq!(s.admission_fee_remaining, Money::ZERO);

        // three course installments of 3000 settle the enrollment
        for _ in 0..3 {
            ledger
                .record_payment(
                    enrollment_id,
                    FeeCategory::CourseFee,
                    Money::from_major(3_000),
                    PaymentMode::Upi,
                    None,
                    &time,
                )
                .unwrap();
        }
        let e = ledger.enrollment(enrollment_id).unwrap();
        assert_eq!(e.amount_remaining, Money::ZERO);
        assert_eq!(e.amount_due, Money::ZERO);
        assert_eq!(e.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_overpayment_rejected_and_state_unchanged() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();

        let result = ledger.record_payment(
            enrollment_id,
            FeeCategory::CourseFee,
            Money::from_major(10_000), // 9000 outstanding
            PaymentMode::Cash,
            None,
            &time,
        );
        assert!(matches!(
            result,
            Err(LedgerError::ExceedsOutstanding { outstanding, .. })
                if outstanding == Money::from_major(9_000)
        ));

        // nothing was written, derived state untouched
        assert_eq!(ledger.payments_for(enrollment_id).count(), 0);
        let e = ledger.enrollment(enrollment_id).unwrap();
        assert_eq!(e.amount_remaining, Money::from_major(9_500));
        assert_eq!(e.payment_status, PaymentStatus::Due);
    }

    #[test]
    fn test_settled_category_rejects_further_payments() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();
        ledger
            .record_payment(
                enrollment_id,
                FeeCategory::AdmissionFee,
                Money::from_major(500),
                PaymentMode::Cash,
                None,
                &time,
            )
            .unwrap();

        let result = ledger.record_payment(
            enrollment_id,
            FeeCategory::AdmissionFee,
            Money::from_major(1),
            PaymentMode::Cash,
            None,
            &time,
        );
        assert!(matches!(result, Err(LedgerError::CategorySettled { .. })));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();
        let result = ledger.record_payment(
            enrollment_id,
            FeeCategory::CourseFee,
            Money::ZERO,
            PaymentMode::Cash,
            None,
            &time,
        );
        assert!(matches!(result, Err(LedgerError::InvalidPaymentAmount { .. })));
    }

    #[test]
    fn test_first_payment_date_overridden_to_enrollment_date() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();
        let enrollment_date = ledger.enrollment(enrollment_id).unwrap().enrollment_date;

        let later = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        let first = ledger
            .record_payment(
                enrollment_id,
                FeeCategory::AdmissionFee,
                Money::from_major(500),
                PaymentMode::Cash,
                Some(later),
                &time,
            )
            .unwrap();
        let second = ledger
            .record_payment(
                enrollment_id,
                FeeCategory::CourseFee,
                Money::from_major(3_000),
                PaymentMode::Cash,
                Some(later),
                &time,
            )
            .unwrap();

        let dates: std::collections::HashMap<_, _> = ledger
            .payments_for(enrollment_id)
            .map(|p| (p.id, p.payment_date))
            .collect();
        assert_eq!(dates[&first], enrollment_date); // override
        assert_eq!(dates[&second], later); // caller date respected
    }

    #[test]
    fn test_initial_payment_splits_admission_first() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();

        let recorded = ledger
            .apply_initial_payment(enrollment_id, Money::from_major(2_000), PaymentMode::Cash, &time)
            .unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(
            ledger.category_paid(enrollment_id, FeeCategory::AdmissionFee),
            Money::from_major(500)
        );
        assert_eq!(
            ledger.category_paid(enrollment_id, FeeCategory::CourseFee),
            Money::from_major(1_500)
        );

        // zero is a no-op
        let none = ledger
            .apply_initial_payment(enrollment_id, Money::ZERO, PaymentMode::Cash, &time)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_trash_last_enrollment_cascades_to_student() {
        let (mut ledger, time, enrollment_id, student_id) = ledger_with_enrollment();

        ledger.trash_enrollment(enrollment_id, &time).unwrap();
        assert!(matches!(
            ledger.student(student_id),
            Err(LedgerError::StudentTrashed { .. })
        ));
        assert_eq!(ledger.trashed_enrollments().count(), 1);
    }

    #[test]
    fn test_trash_non_last_enrollment_keeps_student() {
        let (mut ledger, time, first_enrollment, student_id) = ledger_with_enrollment();
        let second_course = ledger
            .add_course("Data Science", Money::from_major(15_000), 4, DurationUnit::Months)
            .unwrap();
        ledger
            .enroll(
                NewEnrollment {
                    student_id,
                    course_id: second_course,
                    enrollment_date: None,
                    payment_method: PaymentMethod::OneTime,
                    total_installments: None,
                    discount: Money::ZERO,
                    admission_fee: Some(Money::ZERO),
                    batch_time: None,
                    notes: None,
                },
                &time,
            )
            .unwrap();

        ledger.trash_enrollment(first_enrollment, &time).unwrap();
        assert!(ledger.student(student_id).is_ok());
    }

    #[test]
    fn test_restore_enrollment_restores_student() {
        let (mut ledger, time, enrollment_id, student_id) = ledger_with_enrollment();
        ledger.trash_enrollment(enrollment_id, &time).unwrap();

        ledger.restore_enrollment(enrollment_id, &time).unwrap();
        assert!(ledger.student(student_id).is_ok());
        assert!(ledger.enrollment(enrollment_id).is_ok());
    }

    #[test]
    fn test_restore_sibling_leaves_active_student_untouched() {
        let (mut ledger, time, first_enrollment, student_id) = ledger_with_enrollment();
        let second_course = ledger
            .add_course("Data Science", Money::from_major(15_000), 4, DurationUnit::Months)
            .unwrap();
        let second_enrollment = ledger
            .enroll(
                NewEnrollment {
                    student_id,
                    course_id: second_course,
                    enrollment_date: None,
                    payment_method: PaymentMethod::OneTime,
                    total_installments: None,
                    discount: Money::ZERO,
                    admission_fee: Some(Money::ZERO),
                    batch_time: None,
                    notes: None,
                },
                &time,
            )
            .unwrap();

        // trash one sibling while the other keeps the student active
        ledger.trash_enrollment(first_enrollment, &time).unwrap();
        assert!(ledger.student(student_id).is_ok());
        ledger.take_events();

        // restoring it must not emit a student restore
        ledger.restore_enrollment(first_enrollment, &time).unwrap();
        let events = ledger.take_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::StudentRestored { .. })));
        assert!(ledger.enrollment(second_enrollment).is_ok());
    }

    #[test]
    fn test_trash_student_cascades_to_enrollments() {
        let (mut ledger, time, enrollment_id, student_id) = ledger_with_enrollment();

        ledger.trash_student(student_id, &time).unwrap();
        assert!(matches!(
            ledger.enrollment(enrollment_id),
            Err(LedgerError::EnrollmentTrashed { .. })
        ));

        ledger.restore_student(student_id, &time).unwrap();
        assert!(ledger.enrollment(enrollment_id).is_ok());
    }

    #[test]
    fn test_payments_on_trashed_enrollment_rejected() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();
        ledger.trash_enrollment(enrollment_id, &time).unwrap();

        let result = ledger.record_payment(
            enrollment_id,
            FeeCategory::CourseFee,
            Money::from_major(100),
            PaymentMode::Cash,
            None,
            &time,
        );
        assert!(matches!(result, Err(LedgerError::EnrollmentTrashed { .. })));
    }

    #[test]
    fn test_unknown_enrollment_rejected() {
        let (mut ledger, time, _, _) = ledger_with_enrollment();
        let result = ledger.record_payment(
            Uuid::new_v4(),
            FeeCategory::CourseFee,
            Money::from_major(100),
            PaymentMode::Cash,
            None,
            &time,
        );
        assert!(matches!(result, Err(LedgerError::EnrollmentNotFound { .. })));
    }

    #[test]
    fn test_mark_completed_assigns_certificate_once() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();

        let number = ledger.mark_completed(enrollment_id, &time).unwrap();
        assert_eq!(number.to_string(), "CP-CN-001");

        // idempotent: a second call hands back the same number
        let again = ledger.mark_completed(enrollment_id, &time).unwrap();
        assert_eq!(again, number);
    }

    #[test]
    fn test_certificate_end_date_from_course_duration() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();
        let certificate = ledger.issue_certificate(enrollment_id, &time).unwrap();

        assert_eq!(certificate.start_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(certificate.end_date, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(certificate.course_name, "Full Stack");
    }

    #[test]
    fn test_toggle_status() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();

        assert_eq!(
            ledger.toggle_enrollment_status(enrollment_id, &time).unwrap(),
            EnrollmentStatus::Deactive
        );
        assert_eq!(
            ledger.toggle_enrollment_status(enrollment_id, &time).unwrap(),
            EnrollmentStatus::Active
        );
    }

    #[test]
    fn test_snapshot_vs_live_reads() {
        let (mut ledger, _time, enrollment_id, student_id) = ledger_with_enrollment();

        // live record changes after enrollment
        ledger
            .students
            .get_mut(&student_id)
            .unwrap()
            .details
            .city = "Mumbai".to_string();

        let e = ledger.enrollment(enrollment_id).unwrap();
        assert_eq!(e.snapshot.details.city, "Pune");
        assert_eq!(ledger.student(student_id).unwrap().details.city, "Mumbai");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (mut ledger, time, _, _) = ledger_with_enrollment();
        let result = ledger.register_student(details("Imposter", "aarav@example.com"), &time);
        assert!(matches!(result, Err(LedgerError::DuplicateValue { field: "email", .. })));
    }

    #[test]
    fn test_team_codes_and_expense_attribution() {
        let (mut ledger, time, _, _) = ledger_with_enrollment();
        let member = ledger
            .add_team_member(NewTeamMember {
                name: "Priya Nair".to_string(),
                designation: "Counsellor".to_string(),
                phone: "9812345678".to_string(),
                email: "priya@institute.example".to_string(),
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pincode: "411001".to_string(),
            })
            .unwrap();
        assert_eq!(
            ledger.team_member(member).unwrap().employee_code.to_string(),
            "CP-0724-01"
        );

        let expense = ledger
            .add_expense("Projector", member, Money::from_major(8_000), None, &time)
            .unwrap();
        assert!(ledger.expenses().any(|e| e.id == expense));

        // expense against an unknown member fails fast
        let result = ledger.add_expense("Chairs", Uuid::new_v4(), Money::from_major(100), None, &time);
        assert!(matches!(result, Err(LedgerError::TeamMemberNotFound { .. })));
    }

    #[test]
    fn test_enquiry_reference_resolution() {
        let (mut ledger, time, enrollment_id, student_id) = ledger_with_enrollment();
        let course_id = ledger.enrollment(enrollment_id).unwrap().course_id;

        let enquiry = ledger
            .record_enquiry(
                NewEnquiry {
                    name: "Kiran Patil".to_string(),
                    email: None,
                    phone: "9800011122".to_string(),
                    address: None,
                    pincode: None,
                    state: "Maharashtra".to_string(),
                    city: "Pune".to_string(),
                    course_id,
                    referral_source: Some(crate::types::ReferralSource::Friend),
                    reference_registration_number: Some(student_id),
                    reference_name: None,
                    message: None,
                },
                &time,
            )
            .unwrap();

        let referenced = ledger.reference_student(enquiry).unwrap().unwrap();
        assert_eq!(referenced.student_id, student_id);
    }

    #[test]
    fn test_events_emitted_for_settlement() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();
        ledger.take_events();

        ledger
            .apply_initial_payment(enrollment_id, Money::from_major(9_500), PaymentMode::Cash, &time)
            .unwrap();
        let events = ledger.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::EnrollmentSettled { .. })));
    }

    #[test]
    fn test_json_roundtrip() {
        let (mut ledger, time, enrollment_id, _) = ledger_with_enrollment();
        ledger
            .record_payment(
                enrollment_id,
                FeeCategory::AdmissionFee,
                Money::from_major(500),
                PaymentMode::Cash,
                None,
                &time,
            )
            .unwrap();

        let json = ledger.to_json().unwrap();
        let restored = InstituteLedger::from_json(&json).unwrap();

        let e = restored.enrollment(enrollment_id).unwrap();
        assert_eq!(e.amount_remaining, Money::from_major(9_000));
        assert_eq!(e.payment_status, PaymentStatus::Partial);
        // sequences survive the roundtrip: the next transaction id advances
        assert_eq!(
            restored.ids.next_transaction_id().to_string(),
            "E0002"
        );
    }
}
