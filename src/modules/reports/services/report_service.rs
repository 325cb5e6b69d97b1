use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Clock, Result};
use crate::modules::invoices::models::BillingPeriod;
use crate::modules::payments::repositories::PaymentStore;
use crate::modules::reports::models::CollectionSummary;

/// Service for rent collection reporting
pub struct ReportService {
    store: Arc<dyn PaymentStore>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(store: Arc<dyn PaymentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Collection summary for a period label.
    ///
    /// Overdue statuses are refreshed first so the counts reflect today
    /// rather than the day each payment was last written.
    pub async fn collection_summary(&self, period: &str) -> Result<CollectionSummary> {
        let period = period.trim();
        if period.is_empty() {
            return Err(AppError::invalid_input("Billing period cannot be empty"));
        }

        self.store
            .refresh_statuses(self.clock.today(), self.clock.now())
            .await?;

        let summary = self.store.summarize_period(period).await?;

        info!(
            period = period,
            payments = summary.payment_count,
            total_billed = %summary.total_billed,
            total_collected = %summary.total_collected,
            "Collection summary generated"
        );

        Ok(summary)
    }

    /// Collection summary for the month containing today
    pub async fn current_collection_summary(&self) -> Result<CollectionSummary> {
        let period = BillingPeriod::containing(self.clock.today());
        self.collection_summary(&period.label()).await
    }
}
