//! CSV persistence of the flat table
//!
//! Header row of column names, one line per row, missing cells as empty
//! fields. Reading back yields every non-empty field as text.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::domain::{Cell, DomainError, Table};

pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<(), DomainError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_table<R: Read>(reader: R) -> Result<Table, DomainError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();
    let mut table = Table::new(columns);

    for result in rdr.records() {
        let record = result.map_err(|e| DomainError::Storage(format!("CSV parse error: {}", e)))?;
        let cells = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Missing
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        table.push_row(cells);
    }

    Ok(table)
}

/// Write through a sibling temp file so a failed run never leaves a partial table
pub fn save_table(table: &Table, path: &Path) -> Result<(), DomainError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("csv.tmp");
    let saved = File::create(&tmp)
        .map_err(|e| DomainError::Storage(format!("Failed to create {}: {}", tmp.display(), e)))
        .and_then(|file| write_table(table, file))
        .and_then(|()| {
            std::fs::rename(&tmp, path).map_err(|e| {
                DomainError::Storage(format!("Failed to write {}: {}", path.display(), e))
            })
        });

    if saved.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    saved
}

pub fn load_table(path: &Path) -> Result<Table, DomainError> {
    let file = File::open(path)
        .map_err(|e| DomainError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;
    read_table(file)
}
