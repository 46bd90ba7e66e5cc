/// trash and restore - soft delete with student cascade
use enrollment_ledger_rs::{
    DurationUnit, InstituteLedger, InstituteSettings, Money, NewEnrollment, PaymentMethod,
    SafeTimeProvider, TimeSource,
};
use enrollment_ledger_rs::student::StudentDetails;
use enrollment_ledger_rs::types::Gender;
use enrollment_ledger_rs::chrono::NaiveDate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== trash and restore example ===\n");

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut ledger = InstituteLedger::new(InstituteSettings::new(Money::from_major(500)));

    let course_id = ledger.add_course(
        "Tally with GST",
        Money::from_major(4_500),
        8,
        DurationUnit::Weeks,
    )?;
    let student_id = ledger.register_student(
        StudentDetails {
            full_name: "Kiran Patil".to_string(),
            father_name: "Baban Patil".to_string(),
            gender: Gender::Male,
            email: "kiran@example.com".to_string(),
            dob: NaiveDate::from_ymd_opt(2001, 11, 20).unwrap(),
            contact: "9800011122".to_string(),
            emergency_contact_number: None,
            address: "7 Tilak Road".to_string(),
            state: "Maharashtra".to_string(),
            city: "Pune".to_string(),
            pincode: "411030".to_string(),
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
            payment_method: PaymentMethod::OneTime,
            total_installments: None,
            discount: Money::ZERO,
            admission_fee: None,
            batch_time: None,
            notes: None,
        },
        &time,
    )?;

    // trashing the only enrollment drags the student along
    ledger.trash_enrollment(enrollment_id, &time)?;
    println!("enrollment trashed");
    println!("student lookup: {:?}", ledger.student(student_id).err());
    println!("trash holds {} enrollment(s)", ledger.trashed_enrollments().count());

    // restoring the enrollment brings the student back
    ledger.restore_enrollment(enrollment_id, &time)?;
    println!("\nenrollment restored");
    println!(
        "student is back: {}",
        ledger.student(student_id)?.details.full_name
    );

    Ok(())
}
