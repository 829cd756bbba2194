//! Data loading utilities

use crate::dataset::{ColumnKind, Dataset, Record, Schema, Value};
use crate::error::{InsightError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// CSV loader producing schema-checked [`Dataset`]s
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Field delimiter
    delimiter: u8,
    /// Rows sampled to infer column types; `None` scans every row
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            infer_schema_length: None,
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Limit type inference to the first `n` rows.
    ///
    /// A later value that does not fit the inferred type fails the load.
    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n.max(1));
        self
    }

    fn read_options(&self) -> CsvReadOptions {
        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let df = self
            .read_options()
            .into_reader_with_file_handle(file)
            .finish()?;

        let dataset = dataframe_to_dataset(&df)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.schema().len(),
            dropped = dataset.dropped_rows(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Load a CSV file with an explicit delimiter
    pub fn load_csv_with_options(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<Dataset> {
        self.clone().with_delimiter(delimiter).load_csv(path)
    }

    /// Load CSV content already held in memory, e.g. a fetched response body
    pub fn load_csv_from_bytes(&self, bytes: impl Into<Vec<u8>>) -> Result<Dataset> {
        let df = self
            .read_options()
            .into_reader_with_file_handle(Cursor::new(bytes.into()))
            .finish()?;

        let dataset = dataframe_to_dataset(&df)?;
        info!(
            rows = dataset.len(),
            columns = dataset.schema().len(),
            dropped = dataset.dropped_rows(),
            "Dataset parsed from memory"
        );
        Ok(dataset)
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    fn get(&self, row: usize) -> Option<Value> {
        match self {
            ColumnValues::Numeric(v) => v[row].map(Value::Numeric),
            ColumnValues::Categorical(v) => v[row].clone().map(Value::Categorical),
        }
    }
}

/// Convert a parsed frame into typed records, dropping any row with a null field.
fn dataframe_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let mut schema = Schema::new();
    let mut columns: Vec<(String, ColumnValues)> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let name = series.name().to_string();

        let values = if is_numeric(series.dtype()) {
            let cast = series.cast(&DataType::Float64)?;
            ColumnValues::Numeric(cast.f64()?.into_iter().collect())
        } else {
            let cast = series.cast(&DataType::String)?;
            ColumnValues::Categorical(
                cast.str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            )
        };

        let kind = match values {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Categorical(_) => ColumnKind::Categorical,
        };
        if schema.contains(&name) {
            return Err(InsightError::DataError(format!("duplicate column '{}'", name)));
        }
        schema = schema.with_column(name.clone(), kind);
        columns.push((name, values));
    }

    let n_rows = df.height();
    let mut records = Vec::with_capacity(n_rows);
    let mut dropped = 0usize;

    for row in 0..n_rows {
        let record: Option<Record> = columns
            .iter()
            .map(|(name, values)| values.get(row).map(|v| (name.clone(), v)))
            .collect();
        match record {
            Some(r) => records.push(r),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, total = n_rows, "Dropped rows with missing values");
    }

    Ok(Dataset::from_records(schema, records).with_dropped_rows(dropped))
}
