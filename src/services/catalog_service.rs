//! Catalog Service - ISBN list to persisted flat table
//!
//! Lookups run one at a time. A failed lookup marks the ISBN unavailable and
//! the run moves on. When the table already exists on disk it is read back
//! and no lookup is made.

use crate::config::Config;
use crate::domain::{DomainError, LookupError, RawRecord, RecordFetcher, Table};
use crate::import::read_isbn_file;
use crate::infrastructure::storage;
use crate::services::flatten_service::flatten_records;

/// An ISBN that could not be resolved, and why
#[derive(Debug, Clone, PartialEq)]
pub struct Unavailable {
    pub isbn: String,
    pub reason: LookupError,
}

/// Records in fetch order plus the ISBNs that failed
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub records: Vec<RawRecord>,
    pub unavailable: Vec<Unavailable>,
}

/// Where the table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    Stored,
    Fetched,
}

pub async fn fetch_all<F: RecordFetcher + ?Sized>(fetcher: &F, isbns: &[String]) -> FetchOutcome {
    let mut outcome = FetchOutcome::default();

    for isbn in isbns {
        match fetcher.fetch_record(isbn).await {
            Ok(record) => outcome.records.push(record),
            Err(LookupError::NotFound) => {
                tracing::warn!("No data for ISBN: {}", isbn);
                outcome.unavailable.push(Unavailable {
                    isbn: isbn.clone(),
                    reason: LookupError::NotFound,
                });
            }
            Err(e) => {
                tracing::warn!("Error fetching ISBN {}: {}", isbn, e);
                outcome.unavailable.push(Unavailable {
                    isbn: isbn.clone(),
                    reason: e,
                });
            }
        }
    }

    tracing::info!(
        "Fetched {} of {} ISBNs ({} unavailable)",
        outcome.records.len(),
        isbns.len(),
        outcome.unavailable.len()
    );
    if !outcome.unavailable.is_empty() {
        let list: Vec<&str> = outcome.unavailable.iter().map(|u| u.isbn.as_str()).collect();
        tracing::info!("Unavailable ISBNs: {}", list.join(", "));
    }

    outcome
}

/// Reuse the stored table, or fetch, flatten and persist a new one
pub async fn load_or_build_table<F: RecordFetcher + ?Sized>(
    config: &Config,
    fetcher: &F,
) -> Result<(Table, TableSource), DomainError> {
    if !config.refresh && config.table_path.exists() {
        tracing::info!("Reusing stored table {}", config.table_path.display());
        let table = storage::load_table(&config.table_path)?;
        return Ok((table, TableSource::Stored));
    }

    let isbns = read_isbn_file(&config.isbn_file)?;
    tracing::info!(
        "Resolving {} ISBNs from {}",
        isbns.len(),
        config.isbn_file.display()
    );

    let outcome = fetch_all(fetcher, &isbns).await;
    let table = flatten_records(&outcome.records);

    storage::save_table(&table, &config.table_path)?;
    tracing::info!(
        "Wrote {} rows x {} columns to {}",
        table.len(),
        table.columns().len(),
        config.table_path.display()
    );

    Ok((table, TableSource::Fetched))
}
