/// enrollment lifecycle - controlled time, monthly dues, certificate
use enrollment_ledger_rs::{
    DurationUnit, FeeCategory, InstituteLedger, InstituteSettings, Money, NewEnrollment,
    PaymentMethod, PaymentMode, SafeTimeProvider, TimeSource,
};
use enrollment_ledger_rs::student::StudentDetails;
use enrollment_ledger_rs::types::Gender;
use enrollment_ledger_rs::chrono::{Duration, NaiveDate, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== enrollment lifecycle example ===\n");

    // controlled time for a deterministic walkthrough
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let mut ledger = InstituteLedger::new(InstituteSettings::new(Money::from_major(500)));
    let course_id = ledger.add_course(
        "Spoken English",
        Money::from_major(6_000),
        3,
        DurationUnit::Months,
    )?;
    let student_id = ledger.register_student(
        StudentDetails {
            full_name: "Meera Iyer".to_string(),
            father_name: "Suresh Iyer".to_string(),
            gender: Gender::Female,
            email: "meera@example.com".to_string(),
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
        },
        &time,
    )?;

    let enrollment_id = ledger.enroll(
        NewEnrollment {
            student_id,
            course_id,
            enrollment_date: None,
            payment_method: PaymentMethod::Monthly,
            total_installments: None,
            discount: Money::ZERO,
            admission_fee: None,
            batch_time: None,
            notes: None,
        },
        &time,
    )?;
    println!("enrolled on {}", time.now().format("%Y-%m-%d"));

    // admission fee at the desk, first monthly due with it
    ledger.apply_initial_payment(enrollment_id, Money::from_major(2_500), PaymentMode::Cash, &time)?;
    let e = ledger.enrollment(enrollment_id)?;
    println!("after initial payment: remaining {}, next due {}", e.amount_remaining, e.amount_due);

    // two more monthly payments, 30 days apart
    for month in 2..=3 {
        controller.advance(Duration::days(30));
        ledger.record_payment(
            enrollment_id,
            FeeCategory::CourseFee,
            Money::from_major(2_000),
            PaymentMode::Upi,
            None,
            &time,
        )?;
        println!("month {month} payment on {}", time.now().format("%Y-%m-%d"));
    }

    let e = ledger.enrollment(enrollment_id)?;
    println!("\nstatus: {:?}", e.payment_status);

    // course done: completion assigns the certificate number
    let certificate = ledger.issue_certificate(enrollment_id, &time)?;
    println!(
        "certificate {} for {} ({} to {})",
        certificate.certificate_number,
        certificate.student.details.full_name,
        certificate.start_date,
        certificate.end_date
    );

    Ok(())
}
