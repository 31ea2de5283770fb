//! Discrete vs. continuous column classification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{DataSet, DataType, ValueKey};

/// Default maximum number of distinct values for a numeric column to count as discrete.
pub const DEFAULT_CARDINALITY_THRESHOLD: usize = 5;

/// Column names split by statistical nature, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCategories {
    pub discrete: Vec<String>,
    pub continuous: Vec<String>,
}

impl ColumnCategories {
    /// Remove `name` from both lists (e.g. the subject identifier).
    pub fn remove(&mut self, name: &str) {
        self.discrete.retain(|c| c != name);
        self.continuous.retain(|c| c != name);
    }
}

/// Classify the columns of `dataset` by cardinality.
///
/// - Numeric columns (`Int64`, `Float64`, `Bool`) with at most `threshold` distinct non-missing
///   values are discrete, the others continuous. An all-null column has zero distinct values.
/// - `Categorical` columns are always discrete.
/// - `Utf8` columns appear in neither list.
pub fn categorize_columns(dataset: &DataSet, threshold: usize) -> ColumnCategories {
    let mut out = ColumnCategories::default();

    for (idx, field) in dataset.schema.fields.iter().enumerate() {
        match field.data_type {
            DataType::Categorical => out.discrete.push(field.name.clone()),
            t if t.is_numeric() => {
                if distinct_non_null(dataset, idx) <= threshold {
                    out.discrete.push(field.name.clone());
                } else {
                    out.continuous.push(field.name.clone());
                }
            }
            _ => {}
        }
    }

    out
}

fn distinct_non_null(dataset: &DataSet, idx: usize) -> usize {
    dataset
        .column_values(idx)
        .filter(|v| !v.is_missing())
        .map(|v| ValueKey(v.clone()))
        .collect::<BTreeSet<_>>()
        .len()
}
