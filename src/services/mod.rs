//! Services Layer
//!
//! Pure business logic: flattening, the fetch-and-persist pipeline, and the
//! analysis over the flat table.

pub mod analysis_service;
pub mod catalog_service;
pub mod flatten_service;

// Re-export for convenience
pub use analysis_service::{Report, analyze, export_publisher_counts};
pub use catalog_service::{FetchOutcome, TableSource, Unavailable, fetch_all, load_or_build_table};
pub use flatten_service::{assemble_table, collect_schema, flatten_record, flatten_records};
