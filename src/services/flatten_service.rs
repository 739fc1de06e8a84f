//! Flatten Service - raw records into one rectangular table
//!
//! Two passes: the schema is collected over every fetched record first, then
//! each record is flattened on its own against that schema. Rows are then
//! assembled into a table whose columns are the union of what the rows
//! instantiated.

use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

use crate::domain::{Cell, FieldValue, FlatRow, RawRecord, Table};

const LIST_SEPARATOR: &str = "; ";

/// Union of the field names of every record
pub fn collect_schema(records: &[RawRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|record| record.field_names().map(str::to_owned))
        .collect()
}

/// Flatten one record against the shared schema. Never fails.
pub fn flatten_record(record: &RawRecord, schema: &BTreeSet<String>) -> FlatRow {
    let mut row = FlatRow::new();
    // Nested sub-columns yield only to a top-level field present in this record
    let mut nested: Vec<(String, Cell)> = Vec::new();

    for field in schema {
        match FieldValue::classify(record.get(field)) {
            FieldValue::Scalar(cell) => {
                row.insert(field.clone(), cell);
            }
            FieldValue::TaggedList(names) => {
                let joined = names
                    .into_iter()
                    .map(display_string)
                    .collect::<Vec<_>>()
                    .join(LIST_SEPARATOR);
                row.insert(field.clone(), Cell::Text(joined));
            }
            FieldValue::List(items) => {
                row.insert(field.clone(), Cell::Text(join_items(items)));
            }
            FieldValue::Nested(map) => {
                for (subkey, value) in map {
                    let cell = match value {
                        Value::Array(items) => Cell::Text(join_items(items)),
                        other => Cell::from_json(other),
                    };
                    nested.push((format!("{}_{}", field, subkey), cell));
                }
            }
        }
    }

    for (column, cell) in nested {
        if record.get(&column).is_none() {
            row.insert(column, cell);
        }
    }

    row
}

/// Assemble rows into a table. Columns keep first-seen order; gaps are missing.
pub fn assemble_table(rows: Vec<FlatRow>) -> Table {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in &rows {
        for column in row.keys() {
            if seen.insert(column.as_str()) {
                columns.push(column.clone());
            }
        }
    }

    let mut table = Table::new(columns);
    let width = table.columns().len();
    for mut row in rows {
        let mut cells = Vec::with_capacity(width);
        for column in table.columns() {
            cells.push(row.remove(column).unwrap_or_default());
        }
        table.push_row(cells);
    }
    table
}

/// Schema, rows, table
pub fn flatten_records(records: &[RawRecord]) -> Table {
    let schema = collect_schema(records);
    tracing::debug!(
        "Flattening {} records over {} fields",
        records.len(),
        schema.len()
    );
    let rows = records
        .iter()
        .map(|record| flatten_record(record, &schema))
        .collect();
    assemble_table(rows)
}

fn join_items(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| strip_quotes(&display_string(item)).to_owned())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '\'' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        serde_json::from_value(value).expect("record must be a mapping")
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_collect_schema_is_union() {
        let records = vec![
            record(json!({"title": "A", "authors": []})),
            record(json!({"title": "B", "cover": {"small": "s"}})),
        ];
        let schema = collect_schema(&records);
        assert_eq!(
            schema.into_iter().collect::<Vec<_>>(),
            vec!["authors", "cover", "title"]
        );
        assert!(collect_schema(&[]).is_empty());
    }

    #[test]
    fn test_tagged_list_joins_names() {
        let rec = record(json!({
            "authors": [
                {"name": "Alice", "url": "https://openlibrary.org/authors/OL1A"},
                {"name": "Bob", "url": "https://openlibrary.org/authors/OL2A"}
            ]
        }));
        let row = flatten_record(&rec, &collect_schema(&[rec.clone()]));
        assert_eq!(row["authors"], text("Alice; Bob"));
    }

    #[test]
    fn test_scalar_list_strips_quotes() {
        let rec = record(json!({"subject_places": ["'foo'", "\"bar\""]}));
        let row = flatten_record(&rec, &collect_schema(&[rec.clone()]));
        assert_eq!(row["subject_places"], text("foo; bar"));
    }

    #[test]
    fn test_strip_keeps_interior_quotes() {
        let rec = record(json!({"notes": ["''It's'", "say \"hi\" now"]}));
        let row = flatten_record(&rec, &collect_schema(&[rec.clone()]));
        assert_eq!(row["notes"], text("It's; say \"hi\" now"));
    }

    #[test]
    fn test_untagged_items_use_json_form() {
        let rec = record(json!({
            "excerpts": [{"text": "It was a dark night.", "first_sentence": true}],
            "mixed": [1, "two", null]
        }));
        let row = flatten_record(&rec, &collect_schema(&[rec.clone()]));
        let excerpt: Value = serde_json::from_str(row["excerpts"].as_text().unwrap()).unwrap();
        assert_eq!(excerpt["text"], "It was a dark night.");
        assert_eq!(row["mixed"], text("1; two; null"));
    }

    #[test]
    fn test_nested_record_expands_subkeys() {
        let rec = record(json!({"cover": {"small": "url1", "large": "url2"}}));
        let row = flatten_record(&rec, &collect_schema(&[rec.clone()]));
        assert_eq!(row["cover_small"], text("url1"));
        assert_eq!(row["cover_large"], text("url2"));
        assert!(!row.contains_key("cover"));
    }

    #[test]
    fn test_nested_lists_and_verbatim_values() {
        let rec = record(json!({
            "identifiers": {
                "goodreads": ["'1234'", "5678"],
                "openlibrary": ["OL1M"]
            },
            "classifications": {"dewey_decimal_class": ["813.54"], "weight": 1.5, "extra": null}
        }));
        let row = flatten_record(&rec, &collect_schema(&[rec.clone()]));
        assert_eq!(row["identifiers_goodreads"], text("1234; 5678"));
        assert_eq!(row["identifiers_openlibrary"], text("OL1M"));
        assert_eq!(row["classifications_dewey_decimal_class"], text("813.54"));
        assert_eq!(
            row["classifications_weight"],
            Cell::Number(serde_json::Number::from_f64(1.5).unwrap())
        );
        assert_eq!(row["classifications_extra"], Cell::Missing);
    }

    #[test]
    fn test_scalars_pass_through() {
        let rec = record(json!({"title": "Dune", "number_of_pages": 412, "by_statement": null}));
        let row = flatten_record(&rec, &collect_schema(&[rec.clone()]));
        assert_eq!(row["title"], text("Dune"));
        assert_eq!(row["number_of_pages"], Cell::Number(412.into()));
        assert_eq!(row["by_statement"], Cell::Missing);
    }

    #[test]
    fn test_missing_field_gets_missing_marker() {
        let a = record(json!({"title": "A", "subtitle": "Part one"}));
        let b = record(json!({"title": "B"}));
        let table = flatten_records(&[a, b]);
        assert_eq!(table.cell(0, "subtitle"), &text("Part one"));
        assert_eq!(table.cell(1, "subtitle"), &Cell::Missing);
    }

    #[test]
    fn test_shape_decided_per_occurrence() {
        let a = record(json!({"publishers": [{"name": "Orbit"}]}));
        let b = record(json!({"publishers": "Tor"}));
        let c = record(json!({"publishers": {"main": "Gollancz"}}));
        let table = flatten_records(&[a, b, c]);
        assert_eq!(table.cell(0, "publishers"), &text("Orbit"));
        assert_eq!(table.cell(1, "publishers"), &text("Tor"));
        assert_eq!(table.cell(2, "publishers"), &Cell::Missing);
        assert_eq!(table.cell(2, "publishers_main"), &text("Gollancz"));
        assert_eq!(table.cell(0, "publishers_main"), &Cell::Missing);
    }

    #[test]
    fn test_table_is_rectangular() {
        let records = vec![
            record(json!({"title": "A", "cover": {"small": "s"}})),
            record(json!({"title": "B", "cover": {"large": "l"}, "authors": [{"name": "X"}]})),
            record(json!({"pagination": "xii, 300 p."})),
        ];
        let table = flatten_records(&records);
        assert_eq!(table.len(), 3);
        for row in table.rows() {
            assert_eq!(row.len(), table.columns().len());
        }
        // The third record lacks `cover`, so it contributes a missing `cover` column
        assert!(table.column("cover").iter().all(|cell| cell.is_missing()));
        let mut columns = table.columns().to_vec();
        columns.sort();
        assert_eq!(
            columns,
            vec!["authors", "cover", "cover_large", "cover_small", "pagination", "title"]
        );
    }

    #[test]
    fn test_flattening_is_independent_of_batch() {
        let target = record(json!({
            "title": "Alone",
            "authors": [{"name": "Alice"}],
            "cover": {"small": "s"}
        }));
        let other = record(json!({"title": "Other", "weight": "1 lb", "cover": {"large": "l"}}));

        let alone = flatten_records(&[target.clone()]);
        let together = flatten_records(&[other, target]);

        for column in alone.columns() {
            assert_eq!(alone.cell(0, column), together.cell(1, column));
        }
        for column in together.columns() {
            if !alone.has_column(column) {
                assert!(together.cell(1, column).is_missing());
            }
        }
    }

    #[test]
    fn test_nested_value_survives_colliding_batch() {
        let target = record(json!({"title": "A", "cover": {"small": "url1"}}));
        let other = record(json!({"title": "B", "cover_small": "top"}));

        let alone = flatten_records(&[target.clone()]);
        let together = flatten_records(&[target, other]);

        assert_eq!(alone.cell(0, "cover_small"), &text("url1"));
        assert_eq!(together.cell(0, "cover_small"), &text("url1"));
        assert_eq!(together.cell(1, "cover_small"), &text("top"));
    }

    #[test]
    fn test_top_level_field_wins_column_collision() {
        let rec = record(json!({"cover": {"small": "nested"}, "cover_small": "top"}));
        let row = flatten_record(&rec, &collect_schema(&[rec.clone()]));
        assert_eq!(row["cover_small"], text("top"));
    }

    #[test]
    fn test_assemble_keeps_row_order_and_first_seen_columns() {
        let mut first = FlatRow::new();
        first.insert("title".into(), text("A"));
        let mut second = FlatRow::new();
        second.insert("authors".into(), text("X"));
        second.insert("title".into(), text("B"));

        let table = assemble_table(vec![first, second]);
        assert_eq!(table.columns(), &["title".to_string(), "authors".to_string()]);
        assert_eq!(table.cell(0, "title"), &text("A"));
        assert_eq!(table.cell(1, "title"), &text("B"));
        assert!(table.cell(0, "authors").is_missing());
    }
}
