use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use super::PaymentStore;
use crate::core::{AppError, Result};
use crate::modules::payments::models::{Payment, PaymentFilter, PaymentReceipt, PaymentStatus};

/// Payment store held in memory.
///
/// A single write lock covers the duplicate check and the insert, which is
/// what the MySQL unique index gives the SQL repository.
#[derive(Default)]
pub struct InMemoryPaymentStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    payments: HashMap<String, Payment>,
    rent_keys: HashSet<(String, String)>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payments
    pub async fn len(&self) -> usize {
        self.inner.read().await.payments.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn insert(&self, payment: &Payment) -> Result<Payment> {
        let mut inner = self.inner.write().await;

        if inner.payments.contains_key(payment.id()) {
            return Err(AppError::conflict(format!(
                "Payment '{}' already exists",
                payment.id()
            )));
        }

        if let Some((resident_id, period)) = payment.rent_invoice_key() {
            let key = (resident_id.to_string(), period.to_string());
            if !inner.rent_keys.insert(key) {
                return Err(AppError::conflict(format!(
                    "Resident '{}' already has a rent payment for '{}'",
                    resident_id, period
                )));
            }
        }

        inner
            .payments
            .insert(payment.id().to_string(), payment.clone());
        Ok(payment.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>> {
        Ok(self.inner.read().await.payments.get(id).cloned())
    }

    async fn rent_invoice_exists(&self, resident_id: &str, period: &str) -> Result<bool> {
        let key = (resident_id.to_string(), period.to_string());
        Ok(self.inner.read().await.rent_keys.contains(&key))
    }

    async fn apply_receipt(
        &self,
        id: &str,
        receipt: &PaymentReceipt,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .payments
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Payment '{}' not found", id)))?;

        // mutate a copy so a rejected receipt leaves the record untouched
        let mut updated = stored.clone();
        updated.apply_receipt(receipt, today, now)?;
        *stored = updated.clone();

        Ok(updated)
    }

    async fn refresh_statuses(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let mut changed = 0;

        for payment in inner.payments.values_mut() {
            if payment.status() == PaymentStatus::Pending
                && payment.due_date() < today
                && payment.refresh_status(today)
            {
                payment.touch(now);
                changed += 1;
            }
        }

        Ok(changed)
    }

    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>> {
        let inner = self.inner.read().await;

        let mut payments: Vec<Payment> = inner
            .payments
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        payments.sort_by(|a, b| {
            b.due_date()
                .cmp(&a.due_date())
                .then_with(|| b.created_at().cmp(&a.created_at()))
                .then_with(|| a.id().cmp(b.id()))
        });

        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(payments
            .into_iter()
            .skip(filter.offset as usize)
            .take(limit)
            .collect())
    }
}
