use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::reports::services::ReportService;

/// Query parameters for the collection report
#[derive(Debug, Deserialize)]
pub struct CollectionReportQuery {
    /// Period label; defaults to the current month
    #[serde(default)]
    pub period: Option<String>,
}

/// Rent collection summary
/// GET /reports/collection?period=March%202026
pub async fn collection_report(
    service: web::Data<Arc<ReportService>>,
    query: web::Query<CollectionReportQuery>,
) -> Result<HttpResponse, AppError> {
    let summary = match query.into_inner().period {
        Some(period) => service.collection_summary(&period).await?,
        None => service.current_collection_summary().await?,
    };

    Ok(HttpResponse::Ok().json(summary))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports").route("/collection", web::get().to(collection_report)),
    );
}
