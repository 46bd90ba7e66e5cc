//! Fee settlement engine.
//!
//! Derives an enrollment's financial snapshot from its fee configuration and
//! the per-category payment sums recorded against it. The computation is
//! pure: same inputs, same snapshot, no I/O. Every subtraction clamps at
//! zero and all amounts are 2dp fixed-point.

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{PaymentMethod, PaymentStatus};

/// inputs to one settlement computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementInputs {
    pub course_fee: Money,
    pub discount: Money,
    pub admission_fee: Money,
    pub payment_method: PaymentMethod,
    /// required for the installment method; zero/absent falls back to one-time
    pub total_installments: Option<u32>,
    /// divisor for the monthly method; zero/absent falls back to one-time
    pub course_duration: Option<u32>,
    pub admission_fee_paid: Money,
    pub course_fee_paid: Money,
}

/// derived financial snapshot of an enrollment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// admission fee + discounted course fee
    pub final_amount: Money,
    /// course fee after discount, floor zero
    pub discounted_course_fee: Money,
    pub admission_fee_remaining: Money,
    pub course_fee_remaining: Money,
    /// total outstanding across both categories
    pub amount_remaining: Money,
    /// next installment amount
    pub amount_due: Money,
    pub payment_status: PaymentStatus,
}

impl Settlement {
    /// compute the settlement snapshot for one enrollment
    pub fn compute(inputs: &SettlementInputs) -> Self {
        let discounted_course_fee = inputs.course_fee.sub_clamped(inputs.discount);
        let final_amount = inputs.admission_fee + discounted_course_fee;

        let admission_fee_remaining = inputs.admission_fee.sub_clamped(inputs.admission_fee_paid);
        let course_fee_remaining = discounted_course_fee.sub_clamped(inputs.course_fee_paid);
        let amount_remaining = admission_fee_remaining + course_fee_remaining;

        let per_period = per_period_amount(inputs, discounted_course_fee);
        let amount_due = if course_fee_remaining.is_zero() {
            Money::ZERO
        } else {
            per_period.min(course_fee_remaining)
        };

        let any_payment = inputs.admission_fee_paid.is_positive()
            || inputs.course_fee_paid.is_positive();
        let payment_status = if amount_remaining.is_zero() {
            PaymentStatus::Paid
        } else if any_payment {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Due
        };

        Self {
            final_amount,
            discounted_course_fee,
            admission_fee_remaining,
            course_fee_remaining,
            amount_remaining,
            amount_due,
            payment_status,
        }
    }
}

/// one period's share of the discounted course fee
///
/// a missing or zero divisor degrades to the one-time amount rather than
/// dividing by zero
fn per_period_amount(inputs: &SettlementInputs, discounted_course_fee: Money) -> Money {
    match inputs.payment_method {
        PaymentMethod::Installment => match inputs.total_installments {
            Some(n) if n > 0 => discounted_course_fee.div_count(n),
            _ => discounted_course_fee,
        },
        PaymentMethod::Monthly => match inputs.course_duration {
            Some(n) if n > 0 => discounted_course_fee.div_count(n),
            _ => discounted_course_fee,
        },
        PaymentMethod::OneTime => discounted_course_fee,
    }
}
