//! Domain layer - Pure data abstractions
//!
//! This layer contains NO I/O. Raw records, the flat table model, the fetcher
//! trait and the domain error types.

pub mod errors;
pub mod fetcher;
pub mod record;
pub mod table;

pub use errors::{DomainError, LookupError};
pub use fetcher::RecordFetcher;
pub use record::{FieldValue, RawRecord};
pub use table::{Cell, FlatRow, Table};
