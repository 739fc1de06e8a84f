use std::path::Path;

use crate::domain::DomainError;

/// Parse a line-oriented ISBN list: one ISBN per line, no header.
/// Blank lines are skipped; surrounding whitespace and quotes are removed.
pub fn parse_isbn_list(content: &[u8]) -> Result<Vec<String>, DomainError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    let mut isbns = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| DomainError::Input(format!("ISBN list parse error: {}", e)))?;

        let isbn = record
            .get(0)
            .map(|s| s.replace('"', "").trim().to_string())
            .filter(|s| !s.is_empty());

        if let Some(isbn) = isbn {
            isbns.push(isbn);
        }
    }

    Ok(isbns)
}

pub fn read_isbn_file(path: &Path) -> Result<Vec<String>, DomainError> {
    let content = std::fs::read(path)
        .map_err(|e| DomainError::Input(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_isbn_list(&content)
}
