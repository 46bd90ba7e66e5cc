/// quick start - enroll a student and settle the fees
use enrollment_ledger_rs::{
    DurationUnit, FeeCategory, InstituteLedger, InstituteSettings, Money, NewEnrollment,
    PaymentMethod, PaymentMode, SafeTimeProvider, TimeSource,
};
use enrollment_ledger_rs::student::StudentDetails;
use enrollment_ledger_rs::types::Gender;
use enrollment_ledger_rs::chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== quick start example ===\n");

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut ledger = InstituteLedger::new(InstituteSettings::new(Money::from_major(500)));

    // catalog and registration
    let course_id = ledger.add_course(
        "Full Stack Development",
        Money::from_major(10_000),
        6,
        DurationUnit::Months,
    )?;
    let student_id = ledger.register_student(
        StudentDetails {
            full_name: "Aarav Shah".to_string(),
            father_name: "Ramesh Shah".to_string(),
            gender: Gender::Male,
            email: "aarav@example.com".to_string(),
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
        },
        &time,
    )?;
    println!("registered student {student_id}");

    // enroll with a 1000 discount, three installments
    let enrollment_id = ledger.enroll(
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
    )?;
    let enrollment = ledger.enrollment(enrollment_id)?;
    println!(
        "enrolled under {}: final amount {}, next due {}",
        enrollment.transaction_id, enrollment.final_amount, enrollment.amount_due
    );

    // settle admission fee, then the course fee in installments
    ledger.record_payment(
        enrollment_id,
        FeeCategory::AdmissionFee,
        Money::from_major(500),
        PaymentMode::Cash,
        None,
        &time,
    )?;
    for installment in 1..=3 {
        ledger.record_payment(
            enrollment_id,
            FeeCategory::CourseFee,
            Money::from_major(3_000),
            PaymentMode::Upi,
            None,
            &time,
        )?;
        println!("installment {installment} recorded");
    }

    let enrollment = ledger.enrollment(enrollment_id)?;
    println!(
        "\nremaining: {}, status: {:?}",
        enrollment.amount_remaining, enrollment.payment_status
    );

    Ok(())
}
