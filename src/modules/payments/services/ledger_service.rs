// Ledger operations on individual payments:
// - record an incoming payment against an obligation
// - create ad-hoc charges
// - read and list payments
// - refresh overdue statuses as the calendar moves

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{money, AppError, Clock, Result};
use crate::modules::payments::models::{
    NewCharge, Payment, PaymentFilter, PaymentMethod, PaymentReceipt,
};
use crate::modules::payments::repositories::PaymentStore;
use crate::modules::residents::repositories::ResidentDirectory;

/// Default page size for payment listings
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 200;

/// Service for payment ledger business logic
pub struct LedgerService {
    store: Arc<dyn PaymentStore>,
    residents: Arc<dyn ResidentDirectory>,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        residents: Arc<dyn ResidentDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            residents,
            clock,
        }
    }

    /// The ledger's notion of today
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Apply an incoming payment to an existing obligation.
    ///
    /// `amount_received` is added to `amount_paid`; method, reference,
    /// paid date and notes replace the previous values. Status is re-derived.
    ///
    /// # Errors
    /// * `InvalidInput` - `amount_received` is zero, negative, or has more than two decimals
    /// * `NotFound` - `payment_id` does not resolve
    pub async fn record_payment(
        &self,
        payment_id: &str,
        amount_received: Decimal,
        method: PaymentMethod,
        reference: Option<String>,
        paid_on: NaiveDate,
        notes: Option<String>,
    ) -> Result<Payment> {
        let receipt = PaymentReceipt::new(amount_received, method, reference, paid_on, notes)
            .map_err(|e| {
                warn!(
                    payment_id = payment_id,
                    amount_received = %amount_received,
                    error = %e,
                    "Rejected payment receipt"
                );
                e
            })?;

        let payment = self
            .store
            .apply_receipt(payment_id, &receipt, self.clock.today(), self.clock.now())
            .await?;

        info!(
            payment_id = payment.id(),
            resident_id = payment.resident_id(),
            amount_received = %receipt.amount(),
            amount_paid = %payment.amount_paid(),
            balance = %payment.balance(),
            status = %payment.status(),
            method = %method,
            "Payment recorded"
        );

        Ok(payment)
    }

    /// Create a manual charge for a resident.
    ///
    /// Rent charges share the uniqueness rule of generated invoices and fail
    /// with `Conflict` if the resident already has rent for that period.
    pub async fn create_charge(&self, charge: NewCharge) -> Result<Payment> {
        if self.residents.find_by_id(&charge.resident_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Resident '{}' not found",
                charge.resident_id
            )));
        }

        let payment = Payment::new(charge, self.clock.today(), self.clock.now())?;
        let payment = self.store.insert(&payment).await?;

        info!(
            payment_id = payment.id(),
            resident_id = payment.resident_id(),
            period = payment.period(),
            payment_type = %payment.payment_type(),
            amount = %money::format_amount(payment.amount()),
            status = %payment.status(),
            "Charge created"
        );

        Ok(payment)
    }

    /// Get a payment by ID, with its status current as of today
    pub async fn get_payment(&self, payment_id: &str) -> Result<Payment> {
        self.refresh_due_statuses().await?;

        self.store
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment '{}' not found", payment_id)))
    }

    /// List payments with pagination clamped to [`MAX_PAGE_SIZE`]
    pub async fn list_payments(&self, mut filter: PaymentFilter) -> Result<Vec<Payment>> {
        let limit = filter.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit == 0 {
            return Err(AppError::invalid_input("limit must be at least 1"));
        }
        filter.limit = Some(limit.min(MAX_PAGE_SIZE));

        // a status filter has to see today's statuses
        self.refresh_due_statuses().await?;
        self.store.list(&filter).await
    }

    /// Re-derive statuses of pending payments whose due date passed before `as_of`
    pub async fn refresh_statuses(&self, as_of: NaiveDate) -> Result<u64> {
        let changed = self
            .store
            .refresh_statuses(as_of, self.clock.now())
            .await?;

        if changed > 0 {
            info!(changed = changed, as_of = %as_of, "Payments marked overdue");
        }

        Ok(changed)
    }

    async fn refresh_due_statuses(&self) -> Result<u64> {
        self.refresh_statuses(self.clock.today()).await
    }
}
