//! Raw book records as returned by the lookup service
//!
//! A record is an untyped JSON mapping. Each field occurrence is classified
//! into a [`FieldValue`] shape when it is read, so the same field name can be
//! shaped differently in two records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::table::Cell;

/// One book as returned by the lookup service, before flattening
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Shape of a single field occurrence
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    /// String, number, bool or null
    Scalar(Cell),
    /// List of scalars or of untagged items
    List(&'a [Value]),
    /// List whose every element is a mapping with a `name` key
    TaggedList(Vec<&'a Value>),
    /// A single sub-record
    Nested(&'a Map<String, Value>),
}

impl<'a> FieldValue<'a> {
    /// Decide the shape of one occurrence. Absent fields are a missing scalar.
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None => FieldValue::Scalar(Cell::Missing),
            Some(Value::Array(items)) => {
                let names: Option<Vec<&Value>> = items
                    .iter()
                    .map(|item| item.as_object().and_then(|obj| obj.get("name")))
                    .collect();
                match names {
                    Some(names) => FieldValue::TaggedList(names),
                    None => FieldValue::List(items),
                }
            }
            Some(Value::Object(map)) => FieldValue::Nested(map),
            Some(other) => FieldValue::Scalar(Cell::from_json(other)),
        }
    }
}
