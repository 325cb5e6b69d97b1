// Test Data Factory
//
// Residents and fully wired services on the in-memory stores, with the
// clock pinned to a chosen day.

use std::sync::Arc;

use chrono::NaiveDate;
use rentledger::core::FixedClock;
use rentledger::payments::{InMemoryPaymentStore, PaymentStore};
use rentledger::residents::{
    InMemoryResidentDirectory, Resident, ResidentDirectory, ResidentStatus,
};
use rentledger::Services;
use rust_decimal::Decimal;
use uuid::Uuid;

pub const RENT_DUE_DAY: u32 = 5;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Test data factory for residents
pub struct TestDataFactory;

impl TestDataFactory {
    /// Unique resident ID with a TEST prefix
    pub fn random_resident_id() -> String {
        format!("TEST-{}", Uuid::new_v4())
    }

    pub fn active_resident(id: &str, monthly_rent: Decimal) -> Resident {
        Resident::new(
            id,
            format!("Resident {}", id),
            format!("U-{}", id),
            ResidentStatus::Active,
            monthly_rent,
        )
    }

    pub fn resident_with_status(id: &str, status: ResidentStatus) -> Resident {
        Resident::new(
            id,
            format!("Resident {}", id),
            format!("U-{}", id),
            status,
            Decimal::from(10000),
        )
    }
}

/// Services on in-memory stores, plus handles to the stores themselves
pub struct TestLedger {
    pub store: Arc<InMemoryPaymentStore>,
    pub residents: Arc<InMemoryResidentDirectory>,
    pub services: Services,
}

impl TestLedger {
    /// Ledger whose "today" is `today`
    pub fn on(today: NaiveDate, residents: Vec<Resident>) -> Self {
        let store = Arc::new(InMemoryPaymentStore::new());
        Self::with_store(today, residents, store.clone(), store)
    }

    /// Ledger that routes payment storage through `payment_store`.
    /// `store` is kept for direct inspection.
    pub fn with_store(
        today: NaiveDate,
        residents: Vec<Resident>,
        store: Arc<InMemoryPaymentStore>,
        payment_store: Arc<dyn PaymentStore>,
    ) -> Self {
        let residents = Arc::new(InMemoryResidentDirectory::new(residents));
        let directory: Arc<dyn ResidentDirectory> = residents.clone();
        let services = Services::new(
            payment_store,
            directory,
            Arc::new(FixedClock::on(today)),
            RENT_DUE_DAY,
        );

        Self {
            store,
            residents,
            services,
        }
    }
}
