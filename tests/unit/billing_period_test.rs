use chrono::NaiveDate;
use proptest::prelude::*;
use rentledger::core::AppError;
use rentledger::invoices::BillingPeriod;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn label_uses_full_month_name() {
    let period = BillingPeriod::new(2026, 2).unwrap();
    assert_eq!(period.label(), "February 2026");
    assert_eq!(period.to_string(), "February 2026");
}

#[test]
fn parse_accepts_short_and_mixed_case_names() {
    assert_eq!(
        BillingPeriod::parse("feb 2026").unwrap(),
        BillingPeriod::new(2026, 2).unwrap()
    );
    assert_eq!(
        BillingPeriod::parse("  MARCH   2026 ").unwrap(),
        BillingPeriod::new(2026, 3).unwrap()
    );
}

#[test]
fn parse_rejects_garbage() {
    for label in ["", "2026", "Febtober 2026", "February", "February 2026 extra"] {
        let err = BillingPeriod::parse(label).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "{label:?}");
    }
}

#[test]
fn next_month_rolls_over_the_year() {
    assert_eq!(
        BillingPeriod::next_after(date(2025, 12, 20)),
        BillingPeriod::new(2026, 1).unwrap()
    );
    assert_eq!(
        BillingPeriod::next_after(date(2026, 1, 31)).label(),
        "February 2026"
    );
}

#[test]
fn due_date_on_configured_day() {
    let period = BillingPeriod::new(2026, 2).unwrap();
    assert_eq!(period.due_date(5).unwrap(), date(2026, 2, 5));
    assert!(period.due_date(30).is_err());
}

#[test]
fn serializes_as_label() {
    let period = BillingPeriod::new(2026, 2).unwrap();
    assert_eq!(serde_json::to_string(&period).unwrap(), "\"February 2026\"");

    let parsed: BillingPeriod = serde_json::from_str("\"February 2026\"").unwrap();
    assert_eq!(parsed, period);
}

proptest! {
    #[test]
    fn label_parses_back(year in 1970i32..=2100, month in 1u32..=12) {
        let period = BillingPeriod::new(year, month).unwrap();
        prop_assert_eq!(BillingPeriod::parse(&period.label()).unwrap(), period);
    }

    #[test]
    fn due_day_up_to_28_exists_every_month(year in 1970i32..=2100, month in 1u32..=12, day in 1u32..=28) {
        let period = BillingPeriod::new(year, month).unwrap();
        let due = period.due_date(day).unwrap();
        prop_assert_eq!(BillingPeriod::containing(due), period);
    }
}
