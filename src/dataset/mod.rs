//! Dataset model: schema, typed records and column extraction

mod extract;
mod record;
mod schema;

pub use extract::{extract_samples, feature_matrix, Samples};
pub use record::{Dataset, Record, Value};
pub use schema::{
    display_name, ColumnKind, ColumnSpec, Schema, FEATURE_COLUMNS, FEATURE_LABELS, TARGET_COLUMN,
};
