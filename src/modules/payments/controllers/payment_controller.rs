use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::payments::models::{
    NewCharge, PaymentFilter, PaymentMethod, PaymentResponse, PaymentStatus, PaymentType,
};
use crate::modules::payments::services::ledger_service::{LedgerService, DEFAULT_PAGE_SIZE};

/// Query parameters for listing payments
#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub resident_id: Option<String>,
    pub period: Option<String>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl From<ListPaymentsQuery> for PaymentFilter {
    fn from(query: ListPaymentsQuery) -> Self {
        PaymentFilter {
            resident_id: query.resident_id,
            period: query.period,
            status: query.status,
            payment_type: query.payment_type,
            limit: Some(query.limit),
            offset: query.offset,
        }
    }
}

/// Request body for recording a payment
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[serde(default)]
    pub reference: Option<String>,
    /// Defaults to today
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create an ad-hoc charge
/// POST /payments
pub async fn create_charge(
    service: web::Data<Arc<LedgerService>>,
    request: web::Json<NewCharge>,
) -> Result<HttpResponse, AppError> {
    let payment = service.create_charge(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(PaymentResponse::from(payment)))
}

/// Get payment by ID
/// GET /payments/{id}
pub async fn get_payment(
    service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payment = service.get_payment(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

/// List payments
/// GET /payments
pub async fn list_payments(
    service: web::Data<Arc<LedgerService>>,
    query: web::Query<ListPaymentsQuery>,
) -> Result<HttpResponse, AppError> {
    let payments = service.list_payments(query.into_inner().into()).await?;

    let body: Vec<PaymentResponse> = payments.into_iter().map(PaymentResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Record an incoming payment against an obligation
/// POST /payments/{id}/record
pub async fn record_payment(
    service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment_id = path.into_inner();
    let request = request.into_inner();
    let paid_on = request.paid_on.unwrap_or_else(|| service.today());

    let payment = service
        .record_payment(
            &payment_id,
            request.amount,
            request.method,
            request.reference,
            paid_on,
            request.notes,
        )
        .await?;

    Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(create_charge))
            .route("", web::get().to(list_payments))
            .route("/{id}", web::get().to(get_payment))
            .route("/{id}/record", web::post().to(record_payment)),
    );
}
