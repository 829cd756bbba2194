//! Typed dataset records

use super::schema::{ColumnKind, Schema};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Numeric(f64),
    Categorical(String),
}

impl Value {
    /// The value as a finite number, if it is one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Value::Numeric(_) => ColumnKind::Numeric,
            Value::Categorical(_) => ColumnKind::Categorical,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Categorical(v.to_string())
    }
}

/// One dataset row: column name -> value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Finite numeric value of `column`, if present
    pub fn numeric(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    /// True when every schema column has a value
    pub fn is_complete(&self, schema: &Schema) -> bool {
        schema.columns().iter().all(|c| self.values.contains_key(&c.name))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Immutable set of complete records sharing one schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
    dropped_rows: usize,
}

impl Dataset {
    /// Build a dataset, discarding records that miss any schema column
    pub fn from_records(schema: Schema, records: Vec<Record>) -> Self {
        let total = records.len();
        let records: Vec<Record> = records
            .into_iter()
            .filter(|r| r.is_complete(&schema))
            .collect();
        let dropped_rows = total - records.len();
        Self {
            schema,
            records,
            dropped_rows,
        }
    }

    /// Record how many rows an upstream parser already discarded
    pub(crate) fn with_dropped_rows(mut self, dropped: usize) -> Self {
        self.dropped_rows += dropped;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.column_names()
    }

    /// Rows discarded for missing values
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_as_f64() {
        assert_eq!(Value::Numeric(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Numeric(f64::NAN).as_f64(), None);
        assert_eq!(Value::Numeric(f64::INFINITY).as_f64(), None);
        assert_eq!(Value::from("male").as_f64(), None);
    }

    #[test]
    fn test_incomplete_records_dropped() {
        let schema = Schema::numeric(&["age", "oldpeak"]);
        let records = vec![
            Record::new().with("age", 63.0).with("oldpeak", 2.3),
            Record::new().with("age", 37.0),
            Record::new().with("age", 41.0).with("oldpeak", 1.4),
        ];

        let dataset = Dataset::from_records(schema, records);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dropped_rows(), 1);
        assert!(dataset.records().iter().all(|r| r.numeric("oldpeak").is_some()));
    }
}
