use std::sync::Arc;

use actix_web::web;

use crate::core::Clock;
use crate::middleware::{json_error_handler, query_error_handler};
use crate::modules::invoices::InvoiceGenerator;
use crate::modules::payments::{LedgerService, PaymentStore};
use crate::modules::reports::ReportService;
use crate::modules::residents::ResidentDirectory;
use crate::modules::{health, invoices, payments, reports};

/// The ledger services wired to one store, directory and clock
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn PaymentStore>,
    pub ledger: Arc<LedgerService>,
    pub invoices: Arc<InvoiceGenerator>,
    pub reports: Arc<ReportService>,
}

impl Services {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        residents: Arc<dyn ResidentDirectory>,
        clock: Arc<dyn Clock>,
        rent_due_day: u32,
    ) -> Self {
        let ledger = LedgerService::new(store.clone(), residents.clone(), clock.clone());
        let invoices =
            InvoiceGenerator::new(store.clone(), residents, clock.clone(), rent_due_day);
        let reports = ReportService::new(store.clone(), clock);

        Self {
            store,
            ledger: Arc::new(ledger),
            invoices: Arc::new(invoices),
            reports: Arc::new(reports),
        }
    }

    /// Register shared state, extractor error handlers and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.store.clone()))
            .app_data(web::Data::new(self.ledger.clone()))
            .app_data(web::Data::new(self.invoices.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .configure(health::configure)
            .configure(payments::controllers::configure)
            .configure(invoices::controllers::configure)
            .configure(reports::controllers::configure);
    }
}
