pub mod controllers;
pub mod models;
pub mod services;

pub use models::{CollectionSummary, StatusCounts};
pub use services::ReportService;
