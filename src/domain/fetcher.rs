//! Record fetcher trait definition
//!
//! The contract for resolving one ISBN to one raw record.
//! Implementations live in the integrations module.

use async_trait::async_trait;

use super::{LookupError, RawRecord};

#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Resolve a single ISBN. Any failure means the ISBN is unavailable.
    async fn fetch_record(&self, isbn: &str) -> Result<RawRecord, LookupError>;
}
