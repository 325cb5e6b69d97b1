// Monthly rent invoice generation.
//
// One rent payment per active resident per period. Re-running a period is a
// no-op for residents already invoiced: the existence check skips them, and
// if two runs race past the check the store's uniqueness constraint turns
// the second insert into a Conflict, which is also counted as skipped.
//
// A failure for one resident is recorded and the run moves on.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::core::{Clock, Result};
use crate::modules::invoices::models::{
    BillingPeriod, GenerateInvoicesRequest, InvoiceFailure, InvoiceRun,
};
use crate::modules::payments::models::Payment;
use crate::modules::payments::repositories::PaymentStore;
use crate::modules::residents::models::Resident;
use crate::modules::residents::repositories::ResidentDirectory;

enum Outcome {
    Created,
    AlreadyInvoiced,
    Ineligible,
}

/// Creates rent payments for a billing period
pub struct InvoiceGenerator {
    store: Arc<dyn PaymentStore>,
    residents: Arc<dyn ResidentDirectory>,
    clock: Arc<dyn Clock>,
    due_day: u32,
}

impl InvoiceGenerator {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        residents: Arc<dyn ResidentDirectory>,
        clock: Arc<dyn Clock>,
        due_day: u32,
    ) -> Self {
        Self {
            store,
            residents,
            clock,
            due_day,
        }
    }

    pub fn due_day(&self) -> u32 {
        self.due_day
    }

    /// Create one rent payment per eligible resident lacking one for `period`.
    ///
    /// # Arguments
    /// * `period` - Period label, used verbatim as the invoice key
    /// * `due_date` - Due date of every created payment
    /// * `residents` - Residents to invoice; non-active ones are skipped
    ///
    /// # Returns
    /// * `Result<InvoiceRun>` - Counts plus per-resident failures. Only an
    ///   invalid period label (empty or over 50 characters) fails the whole call.
    pub async fn generate_invoices(
        &self,
        period: &str,
        due_date: NaiveDate,
        residents: &[Resident],
    ) -> Result<InvoiceRun> {
        let period = period.trim();
        Payment::validate_period(period)?;

        let today = self.clock.today();
        let now = self.clock.now();

        info!(
            period = period,
            due_date = %due_date,
            residents = residents.len(),
            "Generating rent invoices"
        );

        let mut run = InvoiceRun::new(period, due_date);
        run.considered = residents.len();

        for resident in residents {
            match self
                .invoice_resident(period, due_date, resident, today, now)
                .await
            {
                Ok(Outcome::Created) => run.created += 1,
                Ok(Outcome::AlreadyInvoiced) => run.skipped += 1,
                Ok(Outcome::Ineligible) => run.ineligible += 1,
                Err(e) => {
                    warn!(
                        resident_id = resident.id.as_str(),
                        period = period,
                        error = %e,
                        "Failed to create rent invoice"
                    );
                    run.failures.push(InvoiceFailure {
                        resident_id: resident.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            period = period,
            created = run.created,
            skipped = run.skipped,
            ineligible = run.ineligible,
            failed = run.failures.len(),
            "Rent invoice generation finished"
        );

        Ok(run)
    }

    /// Invoice every active resident for `period`, due on the configured day
    pub async fn generate_for_period(&self, period: BillingPeriod) -> Result<InvoiceRun> {
        let due_date = period.due_date(self.due_day)?;
        let residents = self.residents.active_residents().await?;

        self.generate_invoices(&period.label(), due_date, &residents)
            .await
    }

    /// Invoice every active resident for the month after today
    pub async fn generate_next_month(&self) -> Result<InvoiceRun> {
        let period = BillingPeriod::next_after(self.clock.today());
        self.generate_for_period(period).await
    }

    /// Invoice active residents for `period` with an explicit due date
    pub async fn generate_with_due_date(
        &self,
        period: &str,
        due_date: NaiveDate,
    ) -> Result<InvoiceRun> {
        let residents = self.residents.active_residents().await?;
        self.generate_invoices(period, due_date, &residents).await
    }

    /// Resolve an API request and run it.
    ///
    /// A missing period means the month after today. A missing due date is
    /// derived from the period label and the configured due day.
    pub async fn generate(&self, request: GenerateInvoicesRequest) -> Result<InvoiceRun> {
        let period = match request.period {
            Some(label) => label.trim().to_string(),
            None => BillingPeriod::next_after(self.clock.today()).label(),
        };

        let due_date = match request.due_date {
            Some(due_date) => due_date,
            None => BillingPeriod::parse(&period)?.due_date(self.due_day)?,
        };

        self.generate_with_due_date(&period, due_date).await
    }

    async fn invoice_resident(
        &self,
        period: &str,
        due_date: NaiveDate,
        resident: &Resident,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        if !resident.is_billable() {
            debug!(
                resident_id = resident.id.as_str(),
                status = %resident.status,
                "Skipping resident that is not active"
            );
            return Ok(Outcome::Ineligible);
        }

        if self.store.rent_invoice_exists(&resident.id, period).await? {
            debug!(
                resident_id = resident.id.as_str(),
                period = period,
                "Resident already invoiced"
            );
            return Ok(Outcome::AlreadyInvoiced);
        }

        let payment = Payment::rent_invoice(
            &resident.id,
            period,
            resident.monthly_rent,
            due_date,
            today,
            now,
        )?;

        match self.store.insert(&payment).await {
            Ok(created) => {
                debug!(
                    payment_id = created.id(),
                    resident_id = created.resident_id(),
                    amount = %created.amount(),
                    status = %created.status(),
                    "Rent invoice created"
                );
                Ok(Outcome::Created)
            }
            Err(e) if e.is_conflict() => {
                info!(
                    resident_id = resident.id.as_str(),
                    period = period,
                    "Concurrent run invoiced resident first"
                );
                Ok(Outcome::AlreadyInvoiced)
            }
            Err(e) => Err(e),
        }
    }
}
