//! Flat table types

use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single flat table value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Missing,
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Cell {
    /// Verbatim conversion of a JSON value. Mappings and lists are kept as
    /// their compact JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => Cell::Number(n.clone()),
            Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Missing, or text that persists as an empty field
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text content, `None` for missing and non-text cells
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of number cells and of text cells holding a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => n.as_f64(),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

/// Rendering used when persisting; missing is the empty string
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

/// One flattened record, keyed by column name
pub type FlatRow = BTreeMap<String, Cell>;

/// Rectangular table: every row holds exactly one cell per column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            columns,
            index,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        if cells.len() > self.columns.len() {
            tracing::warn!(
                "Row {} has {} fields for {} columns; extra fields dropped",
                self.rows.len(),
                cells.len(),
                self.columns.len()
            );
        }
        cells.resize(self.columns.len(), Cell::Missing);
        self.rows.push(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` for `column`; an unknown column reads as missing
    pub fn cell(&self, row: usize, column: &str) -> &Cell {
        static MISSING: Cell = Cell::Missing;
        self.index
            .get(column)
            .and_then(|&i| self.rows.get(row).map(|cells| &cells[i]))
            .unwrap_or(&MISSING)
    }

    /// All cells of one column in row order
    pub fn column(&self, column: &str) -> Vec<&Cell> {
        (0..self.rows.len()).map(|row| self.cell(row, column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_from_json() {
        assert_eq!(Cell::from_json(&json!(null)), Cell::Missing);
        assert_eq!(Cell::from_json(&json!("x")), Cell::Text("x".into()));
        assert_eq!(Cell::from_json(&json!(12)), Cell::Number(12.into()));
        assert_eq!(
            Cell::from_json(&json!({"key": "/works/OL1W"})),
            Cell::Text(r#"{"key":"/works/OL1W"}"#.into())
        );
    }

    #[test]
    fn test_cell_numeric_and_display() {
        assert_eq!(Cell::Text(" 304 ".into()).as_f64(), Some(304.0));
        assert_eq!(Cell::Text("n/a".into()).as_f64(), None);
        assert_eq!(Cell::Missing.to_string(), "");
        assert_eq!(Cell::Number(7.into()).to_string(), "7");
        assert_eq!(Cell::Bool(true).to_string(), "True");
    }

    #[test]
    fn test_table_unknown_column_reads_missing() {
        let mut table = Table::new(vec!["title".into()]);
        table.push_row(vec![Cell::Text("Dune".into())]);
        assert_eq!(table.cell(0, "title"), &Cell::Text("Dune".into()));
        assert!(table.cell(0, "subtitle").is_missing());
        assert!(table.cell(5, "title").is_missing());
        assert!(!table.has_column("subtitle"));
    }

    #[test]
    fn test_is_blank() {
        assert!(Cell::Missing.is_blank());
        assert!(Cell::Text(String::new()).is_blank());
        assert!(!Cell::Text("x".into()).is_blank());
        assert!(!Cell::Number(0.into()).is_blank());
    }

    #[test]
    fn test_push_row_truncates_long_rows() {
        let mut table = Table::new(vec!["a".into()]);
        table.push_row(vec![Cell::Text("1".into()), Cell::Text("extra".into())]);
        assert_eq!(table.rows()[0], vec![Cell::Text("1".into())]);
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.push_row(vec![Cell::Text("1".into())]);
        assert_eq!(table.rows()[0], vec![Cell::Text("1".into()), Cell::Missing]);
    }
}
