//! Collection and expense summaries.
//!
//! Read-only aggregations over the ledger's payments and expenses, the way
//! the office reviews a month or a year: what came in, what went out, and
//! the net. Payments only count while their enrollment is out of the trash.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::ledger::InstituteLedger;
use crate::payment::Payment;
use crate::soft_delete::SoftDelete;
use crate::types::{PaymentMethod, PaymentMode};

/// optional narrowing of a payment summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentFilter {
    /// (year, month) of the payment date
    pub month: Option<(i32, u32)>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_mode: Option<PaymentMode>,
}

/// one month's collected or spent total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_collected: Money,
    pub by_month: Vec<MonthlyTotal>,
}

/// collections against expenses for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_collected: Money,
    pub total_expenses: Money,
    /// collected minus expenses, floor zero
    pub net_total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    pub total_collected: Money,
    pub total_expenses: Money,
    pub net_total: Money,
    pub payments_by_month: Vec<MonthlyTotal>,
    pub expenses_by_month: Vec<MonthlyTotal>,
}

fn counted_payments<'a>(
    ledger: &'a InstituteLedger,
    filter: &'a PaymentFilter,
) -> impl Iterator<Item = &'a Payment> {
    ledger.payments().filter(move |p| {
        let enrollment = match ledger.enrollment_any(p.enrollment_id) {
            Some(e) if !e.is_trashed() => e,
            _ => return false,
        };
        if let Some((year, month)) = filter.month {
            if p.payment_date.year() != year || p.payment_date.month() != month {
                return false;
            }
        }
        if let Some(method) = filter.payment_method {
            if enrollment.payment_method != method {
                return false;
            }
        }
        if let Some(mode) = filter.payment_mode {
            if p.payment_mode != mode {
                return false;
            }
        }
        true
    })
}

fn group_by_month<I: Iterator<Item = (chrono::NaiveDate, Money)>>(entries: I) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<(i32, u32), Money> = BTreeMap::new();
    for (date, amount) in entries {
        *months.entry((date.year(), date.month())).or_insert(Money::ZERO) += amount;
    }
    months
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal { year, month, total })
        .collect()
}

/// collections summary, optionally narrowed by month, method and mode
pub fn payment_summary(ledger: &InstituteLedger, filter: &PaymentFilter) -> PaymentSummary {
    let total_collected = counted_payments(ledger, filter).map(|p| p.amount_paid).sum();
    let by_month = group_by_month(
        counted_payments(ledger, filter).map(|p| (p.payment_date, p.amount_paid)),
    );
    PaymentSummary {
        total_collected,
        by_month,
    }
}

/// collections against expenses, optionally narrowed to one month
pub fn financial_summary(ledger: &InstituteLedger, month: Option<(i32, u32)>) -> FinancialSummary {
    let filter = PaymentFilter {
        month,
        ..Default::default()
    };
    let total_collected: Money = counted_payments(ledger, &filter).map(|p| p.amount_paid).sum();
    let total_expenses: Money = ledger
        .expenses()
        .filter(|e| match month {
            Some((year, m)) => e.date.year() == year && e.date.month() == m,
            None => true,
        })
        .map(|e| e.amount)
        .sum();

    FinancialSummary {
        total_collected,
        total_expenses,
        net_total: total_collected.sub_clamped(total_expenses),
    }
}

/// full-year view with monthly breakdowns
pub fn yearly_summary(ledger: &InstituteLedger, year: i32) -> YearlySummary {
    let filter = PaymentFilter::default();
    let year_payments = || {
        counted_payments(ledger, &filter).filter(move |p| p.payment_date.year() == year)
    };
    let year_expenses = || ledger.expenses().filter(move |e| e.date.year() == year);

    let total_collected: Money = year_payments().map(|p| p.amount_paid).sum();
    let total_expenses: Money = year_expenses().map(|e| e.amount).sum();

    YearlySummary {
        year,
        total_collected,
        total_expenses,
        net_total: total_collected.sub_clamped(total_expenses),
        payments_by_month: group_by_month(year_payments().map(|p| (p.payment_date, p.amount_paid))),
        expenses_by_month: group_by_month(year_expenses().map(|e| (e.date, e.amount))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    use crate::ledger::NewEnrollment;
    use crate::settings::InstituteSettings;
    use crate::student::StudentDetails;
    use crate::team::NewTeamMember;
    use crate::types::{DurationUnit, FeeCategory, Gender};

    fn details(name: &str, email: &str) -> StudentDetails {
        StudentDetails {
            full_name: name.to_string(),
            father_name: "Suresh Iyer".to_string(),
            gender: Gender::Female,
            email: email.to_string(),
            dob: NaiveDate::from_ymd_opt(2003, 8, 2).unwrap(),
            contact: "9822001100".to_string(),
            emergency_contact_number: None,
            address: "4 FC Road".to_string(),
            state: "Maharashtra".to_string(),
            city: "Pune".to_string(),
            pincode: "411004".to_string(),
            referral_source: None,
            referred_by: None,
            referred_by_name: None,
        }
    }

    /// one enrollment with payments in march and april 2025, plus a march
    /// expense of 2000
    fn reporting_ledger() -> (InstituteLedger, crate::types::EnrollmentId) {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
        ));
        let mut ledger = InstituteLedger::new(InstituteSettings::new(Money::from_major(500)));
        let course_id = ledger
            .add_course("Spoken English", Money::from_major(6_000), 3, DurationUnit::Months)
            .unwrap();
        let student_id = ledger
            .register_student(details("Meera Iyer", "meera@example.com"), &time)
            .unwrap();
        let enrollment_id = ledger
            .enroll(
                NewEnrollment {
                    student_id,
                    course_id,
                    enrollment_date: None,
                    payment_method: crate::types::PaymentMethod::Monthly,
                    total_installments: None,
                    discount: Money::ZERO,
                    admission_fee: None,
                    batch_time: None,
                    notes: None,
                },
                &time,
            )
            .unwrap();

        // first payment is forced onto the enrollment date (2025-03-10)
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
        ledger
            .record_payment(
                enrollment_id,
                FeeCategory::CourseFee,
                Money::from_major(2_000),
                PaymentMode::Upi,
                Some(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()),
                &time,
            )
            .unwrap();

        let member = ledger
            .add_team_member(NewTeamMember {
                name: "Rahul Desai".to_string(),
                designation: "Admin".to_string(),
                phone: "9877700000".to_string(),
                email: "rahul@institute.example".to_string(),
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pincode: "411001".to_string(),
            })
            .unwrap();
        ledger
            .add_expense("Whiteboards", member, Money::from_major(2_000), None, &time)
            .unwrap();

        (ledger, enrollment_id)
    }

    #[test]
    fn test_totals_and_monthly_grouping() {
        let (ledger, _) = reporting_ledger();

        let summary = payment_summary(&ledger, &PaymentFilter::default());
        assert_eq!(summary.total_collected, Money::from_major(2_500));
        assert_eq!(
            summary.by_month,
            vec![
                MonthlyTotal { year: 2025, month: 3, total: Money::from_major(500) },
                MonthlyTotal { year: 2025, month: 4, total: Money::from_major(2_000) },
            ]
        );
    }

    #[test]
    fn test_month_filter() {
        let (ledger, _) = reporting_ledger();

        let march = payment_summary(
            &ledger,
            &PaymentFilter { month: Some((2025, 3)), ..Default::default() },
        );
        assert_eq!(march.total_collected, Money::from_major(500));
    }

    #[test]
    fn test_mode_filter() {
        let (ledger, _) = reporting_ledger();

        let upi_only = payment_summary(
            &ledger,
            &PaymentFilter { payment_mode: Some(PaymentMode::Upi), ..Default::default() },
        );
        assert_eq!(upi_only.total_collected, Money::from_major(2_000));
    }

    #[test]
    fn test_net_total_floors_at_zero() {
        let (ledger, _) = reporting_ledger();

        let overall = financial_summary(&ledger, None);
        assert_eq!(overall.total_collected, Money::from_major(2_500));
        assert_eq!(overall.total_expenses, Money::from_major(2_000));
        assert_eq!(overall.net_total, Money::from_major(500));

        // march alone: 500 in, 2000 out, net clamps to zero
        let march = financial_summary(&ledger, Some((2025, 3)));
        assert_eq!(march.net_total, Money::ZERO);
    }

    #[test]
    fn test_yearly_summary() {
        let (ledger, _) = reporting_ledger();

        let year = yearly_summary(&ledger, 2025);
        assert_eq!(year.total_collected, Money::from_major(2_500));
        assert_eq!(year.total_expenses, Money::from_major(2_000));
        assert_eq!(year.payments_by_month.len(), 2);
        assert_eq!(year.expenses_by_month.len(), 1);

        let empty = yearly_summary(&ledger, 2024);
        assert_eq!(empty.total_collected, Money::ZERO);
        assert!(empty.payments_by_month.is_empty());
    }

    #[test]
    fn test_trashed_enrollments_excluded_from_collections() {
        let (mut ledger, enrollment_id) = reporting_ledger();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
        ));
        ledger.trash_enrollment(enrollment_id, &time).unwrap();

        let summary = payment_summary(&ledger, &PaymentFilter::default());
        assert_eq!(summary.total_collected, Money::ZERO);
    }
}
