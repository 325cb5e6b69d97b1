use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::invoices::models::GenerateInvoicesRequest;
use crate::modules::invoices::services::InvoiceGenerator;

/// Generate rent invoices for a period
/// POST /invoices/generate
///
/// The body is optional; an empty body means next month at the configured
/// due day. Responds 200 with the run report even when some residents
/// failed; the failures are listed in the body.
pub async fn generate_invoices(
    generator: web::Data<Arc<InvoiceGenerator>>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request = parse_request(&body)?;
    let run = generator.generate(request).await?;

    Ok(HttpResponse::Ok().json(run))
}

fn parse_request(body: &[u8]) -> Result<GenerateInvoicesRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateInvoicesRequest::default());
    }

    Ok(serde_json::from_slice(body)?)
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices").route("/generate", web::post().to(generate_invoices)),
    );
}
