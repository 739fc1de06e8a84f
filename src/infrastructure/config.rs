use std::env;
use std::path::PathBuf;

use crate::modules::integrations::openlibrary::{DEFAULT_API_URL, DEFAULT_USER_AGENT};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub isbn_file: PathBuf,
    pub table_path: PathBuf,
    pub api_url: String,
    pub lookup_timeout_secs: u64,
    pub report_dir: PathBuf,
    pub user_agent: String,
    pub refresh: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            isbn_file: lookup("ISBN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("books-isbns.txt")),
            table_path: lookup("TABLE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("fetched_books.csv")),
            api_url: lookup("OPENLIBRARY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            lookup_timeout_secs: lookup("LOOKUP_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(2),
            report_dir: lookup("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            user_agent: lookup("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            refresh: false,
        }
    }

    /// Apply `--isbns <path>`, `--table <path>` and `--refresh`
    pub fn apply_args(mut self, args: &[String]) -> Self {
        if let Some(pos) = args.iter().position(|arg| arg == "--isbns")
            && let Some(val) = args.get(pos + 1)
        {
            self.isbn_file = PathBuf::from(val);
        }
        if let Some(pos) = args.iter().position(|arg| arg == "--table")
            && let Some(val) = args.get(pos + 1)
        {
            self.table_path = PathBuf::from(val);
        }
        if args.iter().any(|arg| arg == "--refresh") {
            self.refresh = true;
        }
        self
    }
}
