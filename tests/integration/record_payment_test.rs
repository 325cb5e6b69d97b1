// Recording incoming payments through the ledger service

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use rentledger::core::AppError;
use chrono::Utc;
use rentledger::payments::{Payment, PaymentFilter, PaymentMethod, PaymentStatus, PaymentStore};
use rust_decimal_macros::dec;

async fn ledger_with_rent(amount: rust_decimal::Decimal) -> (TestLedger, String) {
    let ledger = TestLedger::on(
        date(2026, 3, 1),
        vec![TestDataFactory::active_resident("A", amount)],
    );
    let run = ledger
        .services
        .invoices
        .generate_with_due_date("March 2026", date(2026, 3, 5))
        .await
        .unwrap();
    assert_eq!(run.created, 1);

    let payments = ledger.store.list(&Default::default()).await.unwrap();
    let id = payments[0].id().to_string();
    (ledger, id)
}

#[tokio::test]
async fn test_two_receipts_settle_the_payment() {
    let (ledger, id) = ledger_with_rent(dec!(5000)).await;

    let payment = ledger
        .services
        .ledger
        .record_payment(&id, dec!(3000), PaymentMethod::MobileMoney, Some("QWE123".into()), date(2026, 3, 1), None)
        .await
        .unwrap();
    assert_eq!(payment.status(), PaymentStatus::Partial);
    assert_eq!(payment.balance(), dec!(2000));

    let payment = ledger
        .services
        .ledger
        .record_payment(&id, dec!(2000), PaymentMethod::BankTransfer, Some("TRX-9".into()), date(2026, 3, 2), Some("balance".into()))
        .await
        .unwrap();

    assert_eq!(payment.amount_paid(), dec!(5000));
    assert_eq!(payment.status(), PaymentStatus::Paid);
    assert!(payment.is_paid());
    assert_eq!(payment.method(), Some(PaymentMethod::BankTransfer));
    assert_eq!(payment.transaction_reference(), Some("TRX-9"));
    assert_eq!(payment.paid_date(), Some(date(2026, 3, 2)));
    assert_eq!(payment.notes(), "balance");

    let stored = ledger.services.ledger.get_payment(&id).await.unwrap();
    assert_eq!(stored, payment);
}

#[tokio::test]
async fn test_negative_amount_is_rejected_without_mutation() {
    let (ledger, id) = ledger_with_rent(dec!(5000)).await;
    let before = ledger.services.ledger.get_payment(&id).await.unwrap();

    let err = ledger
        .services
        .ledger
        .record_payment(&id, dec!(-50), PaymentMethod::Cash, None, date(2026, 3, 1), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    let after = ledger.services.ledger.get_payment(&id).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_zero_and_fractional_cents_rejected() {
    let (ledger, id) = ledger_with_rent(dec!(5000)).await;

    for amount in [dec!(0), dec!(10.005)] {
        let err = ledger
            .services
            .ledger
            .record_payment(&id, amount, PaymentMethod::Cash, None, date(2026, 3, 1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "{amount}");
    }
}

#[tokio::test]
async fn test_unknown_payment_is_not_found() {
    let ledger = TestLedger::on(date(2026, 3, 1), vec![]);

    let err = ledger
        .services
        .ledger
        .record_payment("missing", dec!(100), PaymentMethod::Cash, None, date(2026, 3, 1), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_concurrent_receipts_are_not_lost() {
    let (ledger, id) = ledger_with_rent(dec!(10000)).await;
    let service = ledger.services.ledger.clone();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = service.clone();
            let id = id.clone();
            tokio::spawn(async move {
                service
                    .record_payment(&id, dec!(1000), PaymentMethod::MobileMoney, None, date(2026, 3, 1), None)
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let payment = service.get_payment(&id).await.unwrap();
    assert_eq!(payment.amount_paid(), dec!(10000));
    assert_eq!(payment.status(), PaymentStatus::Paid);
}

#[tokio::test]
async fn test_overdue_refresh_then_partial_payment() {
    let (ledger, id) = ledger_with_rent(dec!(8000)).await;

    // the service clock says 2026-03-01; run the refresh as of the 10th
    let changed = ledger
        .services
        .ledger
        .refresh_statuses(date(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(
        ledger.services.ledger.get_payment(&id).await.unwrap().status(),
        PaymentStatus::Overdue
    );

    let payment = ledger
        .services
        .ledger
        .record_payment(&id, dec!(500), PaymentMethod::Cash, None, date(2026, 3, 10), None)
        .await
        .unwrap();
    assert_eq!(payment.status(), PaymentStatus::Partial);
}

#[tokio::test]
async fn test_reads_report_overdue_once_due_date_passes() {
    let ledger = TestLedger::on(
        date(2026, 2, 10),
        vec![TestDataFactory::active_resident("A", dec!(12000))],
    );

    // stored on 2026-01-20 while still pending
    let payment = Payment::rent_invoice(
        "A",
        "February 2026",
        dec!(12000),
        date(2026, 2, 5),
        date(2026, 1, 20),
        Utc::now(),
    )
    .unwrap();
    assert_eq!(payment.status(), PaymentStatus::Pending);
    ledger.store.insert(&payment).await.unwrap();

    let fetched = ledger.services.ledger.get_payment(payment.id()).await.unwrap();
    assert_eq!(fetched.status(), PaymentStatus::Overdue);
    assert!(!fetched.is_paid());

    let filter = PaymentFilter {
        status: Some(PaymentStatus::Overdue),
        ..PaymentFilter::default()
    };
    let overdue = ledger.services.ledger.list_payments(filter).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id(), payment.id());

    let pending = PaymentFilter {
        status: Some(PaymentStatus::Pending),
        ..PaymentFilter::default()
    };
    assert!(ledger.services.ledger.list_payments(pending).await.unwrap().is_empty());
}
