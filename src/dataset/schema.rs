//! Column schema and the heart-health column set

use serde::{Deserialize, Serialize};

/// Feature columns fed to the decision tree, in feature-vector order
pub const FEATURE_COLUMNS: [&str; 8] = [
    "age",
    "resting_blood_pressure",
    "serum_cholestoral",
    "resting_electrocardiographic_results",
    "maximum_heart_rate_achieved",
    "oldpeak",
    "slope_peak_exercise",
    "number_of_major_vessels",
];

/// Short labels for [`FEATURE_COLUMNS`], same order
pub const FEATURE_LABELS: [&str; 8] = [
    "Age",
    "Resting BP",
    "Cholesterol",
    "ECG Results",
    "Max HR",
    "Old Peak",
    "Slope",
    "Major Vessels",
];

/// Binary outcome column (1 = disease present)
pub const TARGET_COLUMN: &str = "heart_disease";

/// Kind of values a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered column schema, fixed at load time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A repeated name replaces the earlier kind.
    pub fn with_column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.kind = kind,
            None => self.columns.push(ColumnSpec { name, kind }),
        }
        self
    }

    /// Schema where every listed column is numeric
    pub fn numeric<S: AsRef<str>>(names: &[S]) -> Self {
        names
            .iter()
            .fold(Self::new(), |schema, n| schema.with_column(n.as_ref(), ColumnKind::Numeric))
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Format a `snake_case` column name for display: `resting_blood_pressure` -> `Resting Blood Pressure`
pub fn display_name(column: &str) -> String {
    column
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("resting_blood_pressure"), "Resting Blood Pressure");
        assert_eq!(display_name("age"), "Age");
        assert_eq!(display_name("oldpeak"), "Oldpeak");
    }

    #[test]
    fn test_schema_lookup() {
        let schema = Schema::numeric(&["age", "oldpeak"])
            .with_column("sex", ColumnKind::Categorical);

        assert_eq!(schema.len(), 3);
        assert!(schema.contains("oldpeak"));
        assert!(!schema.contains("pulse"));
        assert_eq!(schema.kind_of("sex"), Some(ColumnKind::Categorical));
        assert_eq!(schema.column_names(), vec!["age", "oldpeak", "sex"]);
    }

    #[test]
    fn test_repeated_column_replaces_kind() {
        let schema = Schema::numeric(&["age"]).with_column("age", ColumnKind::Categorical);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.kind_of("age"), Some(ColumnKind::Categorical));
    }
}
