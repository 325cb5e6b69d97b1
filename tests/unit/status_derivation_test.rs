// Property tests for payment status derivation

use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;
use rentledger::payments::{
    derive_status, recompute_status, Payment, PaymentMethod, PaymentReceipt, PaymentStatus,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Amounts in cents up to one million shillings
fn cents() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000_000).prop_map(|c| Decimal::new(c, 2))
}

fn day_offset() -> impl Strategy<Value = i64> {
    -90i64..=90
}

proptest! {
    #[test]
    fn paid_iff_fully_covered(amount in cents(), paid in cents(), offset in day_offset()) {
        let due = date(2026, 3, 5);
        let today = due + Duration::days(offset);

        let (status, is_paid) = derive_status(amount, paid, due, today);

        prop_assert_eq!(status == PaymentStatus::Paid, paid >= amount);
        prop_assert_eq!(is_paid, status == PaymentStatus::Paid);
    }

    #[test]
    fn partial_iff_some_but_not_all(amount in cents(), paid in cents(), offset in day_offset()) {
        let due = date(2026, 3, 5);
        let today = due + Duration::days(offset);

        let (status, _) = derive_status(amount, paid, due, today);

        let partial = paid > Decimal::ZERO && paid < amount;
        prop_assert_eq!(status == PaymentStatus::Partial, partial);
    }

    #[test]
    fn unpaid_follows_the_calendar(amount in 1i64..=100_000_000, offset in day_offset()) {
        let amount = Decimal::new(amount, 2);
        let due = date(2026, 3, 5);
        let today = due + Duration::days(offset);

        let (status, is_paid) = derive_status(amount, Decimal::ZERO, due, today);

        prop_assert!(!is_paid);
        if offset > 0 {
            prop_assert_eq!(status, PaymentStatus::Overdue);
        } else {
            prop_assert_eq!(status, PaymentStatus::Pending);
        }
    }

    #[test]
    fn receipts_accumulate(first in 1i64..=500_000, second in 1i64..=500_000) {
        let today = date(2026, 3, 1);
        let mut payment = Payment::rent_invoice(
            "resident-1",
            "March 2026",
            dec!(5000.00),
            date(2026, 3, 5),
            today,
            Utc::now(),
        ).unwrap();

        for cents in [first, second] {
            let receipt = PaymentReceipt::new(
                Decimal::new(cents, 2),
                PaymentMethod::MobileMoney,
                None,
                today,
                None,
            ).unwrap();
            payment.apply_receipt(&receipt, today, Utc::now()).unwrap();
        }

        prop_assert_eq!(payment.amount_paid(), Decimal::new(first + second, 2));
        prop_assert_eq!(payment.balance(), dec!(5000.00) - Decimal::new(first + second, 2));
        prop_assert!(payment.is_status_current(today));
    }
}

#[test]
fn unpaid_rent_past_due_is_overdue() {
    let payment = Payment::rent_invoice(
        "resident-1",
        "January 2025",
        dec!(10000),
        date(2025, 1, 5),
        date(2025, 1, 1),
        Utc::now(),
    )
    .unwrap();
    assert_eq!(payment.status(), PaymentStatus::Pending);

    let (status, is_paid) = recompute_status(&payment, date(2025, 1, 10));
    assert_eq!(status, PaymentStatus::Overdue);
    assert!(!is_paid);
}

#[test]
fn due_date_itself_is_not_overdue() {
    let (status, _) = derive_status(dec!(10000), dec!(0), date(2025, 1, 5), date(2025, 1, 5));
    assert_eq!(status, PaymentStatus::Pending);
}

#[test]
fn partial_wins_over_overdue() {
    let (status, _) = derive_status(dec!(10000), dec!(1), date(2025, 1, 5), date(2025, 2, 5));
    assert_eq!(status, PaymentStatus::Partial);
}

#[test]
fn overpayment_is_paid_with_negative_balance() {
    let today = date(2026, 3, 1);
    let mut payment = Payment::rent_invoice(
        "resident-1",
        "March 2026",
        dec!(5000),
        date(2026, 3, 5),
        today,
        Utc::now(),
    )
    .unwrap();

    let receipt =
        PaymentReceipt::new(dec!(6000), PaymentMethod::Cash, None, today, None).unwrap();
    payment.apply_receipt(&receipt, today, Utc::now()).unwrap();

    assert_eq!(payment.status(), PaymentStatus::Paid);
    assert!(payment.is_paid());
    assert_eq!(payment.amount_paid(), dec!(6000));
    assert_eq!(payment.balance(), dec!(-1000));
}

#[test]
fn zero_amount_obligation_is_paid() {
    let (status, is_paid) = derive_status(dec!(0), dec!(0), date(2026, 3, 5), date(2026, 3, 1));
    assert_eq!(status, PaymentStatus::Paid);
    assert!(is_paid);
}
