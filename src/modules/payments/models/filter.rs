use serde::{Deserialize, Serialize};

use super::payment::{Payment, PaymentStatus, PaymentType};

/// Criteria for listing payments. Every field is optional; `None` matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFilter {
    pub resident_id: Option<String>,
    pub period: Option<String>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
    /// No limit when `None`
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: u32,
}

impl PaymentFilter {
    pub fn for_period(period: impl Into<String>) -> Self {
        Self {
            period: Some(period.into()),
            ..Self::default()
        }
    }

    pub fn for_resident(resident_id: impl Into<String>) -> Self {
        Self {
            resident_id: Some(resident_id.into()),
            ..Self::default()
        }
    }

    /// Whether `payment` satisfies the field criteria (limit and offset aside)
    pub fn matches(&self, payment: &Payment) -> bool {
        self.resident_id
            .as_deref()
            .map_or(true, |id| payment.resident_id() == id)
            && self
                .period
                .as_deref()
                .map_or(true, |period| payment.period() == period)
            && self.status.map_or(true, |status| payment.status() == status)
            && self
                .payment_type
                .map_or(true, |payment_type| payment.payment_type() == payment_type)
    }
}
