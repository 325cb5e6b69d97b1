mod collection_summary;

pub use collection_summary::{CollectionSummary, StatusCounts};
