/// json state - export the ledger and load it back
use enrollment_ledger_rs::{
    DurationUnit, FeeCategory, InstituteLedger, InstituteSettings, Money, NewEnrollment,
    PaymentMethod, PaymentMode, SafeTimeProvider, TimeSource,
};
use enrollment_ledger_rs::student::StudentDetails;
use enrollment_ledger_rs::types::Gender;
use enrollment_ledger_rs::chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json state example ===\n");

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut ledger = InstituteLedger::new(InstituteSettings::new(Money::from_major(500)));

    let course_id = ledger.add_course(
        "Graphic Design",
        Money::from_major(8_000),
        4,
        DurationUnit::Months,
    )?;
    let student_id = ledger.register_student(
        StudentDetails {
            full_name: "Sana Shaikh".to_string(),
            father_name: "Irfan Shaikh".to_string(),
            gender: Gender::Female,
            email: "sana@example.com".to_string(),
            dob: NaiveDate::from_ymd_opt(2004, 2, 9).unwrap(),
            contact: "9833344455".to_string(),
            emergency_contact_number: None,
            address: "21 Camp Area".to_string(),
            state: "Maharashtra".to_string(),
            city: "Pune".to_string(),
            pincode: "411001".to_string(),
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
            payment_method: PaymentMethod::Installment,
            total_installments: Some(4),
            discount: Money::from_major(500),
            admission_fee: None,
            batch_time: None,
            notes: None,
        },
        &time,
    )?;
    ledger.record_payment(
        enrollment_id,
        FeeCategory::AdmissionFee,
        Money::from_major(500),
        PaymentMode::Online,
        None,
        &time,
    )?;

    // export, reload, and the derived state carries over
    let json = ledger.to_json()?;
    println!("exported {} bytes of ledger state", json.len());

    let restored = InstituteLedger::from_json(&json)?;
    let enrollment = restored.enrollment(enrollment_id)?;
    println!(
        "reloaded {}: remaining {}, status {:?}",
        enrollment.transaction_id, enrollment.amount_remaining, enrollment.payment_status
    );

    Ok(())
}
