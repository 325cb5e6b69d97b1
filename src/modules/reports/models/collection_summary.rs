use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::payments::models::{Payment, PaymentStatus};

/// Rent collection position for one billing period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub period: String,
    pub payment_count: usize,
    /// Sum of amounts owed
    pub total_billed: Decimal,
    /// Sum of amounts received, overpayments included
    pub total_collected: Decimal,
    /// Sum of positive balances
    pub total_outstanding: Decimal,
    /// Sum of overpaid amounts
    pub total_overpaid: Decimal,
    pub by_status: StatusCounts,
}

/// Number of payments in each status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub paid: usize,
    pub partial: usize,
    pub pending: usize,
    pub overdue: usize,
}

impl StatusCounts {
    fn add(&mut self, status: PaymentStatus) {
        match status {
            PaymentStatus::Paid => self.paid += 1,
            PaymentStatus::Partial => self.partial += 1,
            PaymentStatus::Pending => self.pending += 1,
            PaymentStatus::Overdue => self.overdue += 1,
        }
    }
}

impl CollectionSummary {
    /// Aggregate the payments of one period
    pub fn from_payments(period: impl Into<String>, payments: &[Payment]) -> Self {
        let mut summary = Self {
            period: period.into(),
            payment_count: payments.len(),
            total_billed: Decimal::ZERO,
            total_collected: Decimal::ZERO,
            total_outstanding: Decimal::ZERO,
            total_overpaid: Decimal::ZERO,
            by_status: StatusCounts::default(),
        };

        for payment in payments {
            summary.total_billed += payment.amount();
            summary.total_collected += payment.amount_paid();

            let balance = payment.balance();
            if balance > Decimal::ZERO {
                summary.total_outstanding += balance;
            } else {
                summary.total_overpaid -= balance;
            }

            summary.by_status.add(payment.status());
        }

        summary
    }

    /// Share of the billed amount collected, as a percentage rounded to 2 dp
    pub fn collection_rate(&self) -> Decimal {
        if self.total_billed.is_zero() {
            return Decimal::ZERO;
        }

        let collected = self.total_collected.min(self.total_billed);
        (collected / self.total_billed * Decimal::ONE_HUNDRED).round_dp(2)
    }
}
