//! Flat statistics table returned by the descriptive-statistics builders.

use serde::Serialize;

use crate::types::{DataSet, DataType, Field, Schema, Value, ValueKey};

use super::pivot::RowKey;
use super::reshape::{CATEGORY_COLUMN, VARIABLE_COLUMN};

/// One output row: its index labels plus one value per [`StatsTable::columns`] entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsRow {
    pub variable: String,
    /// Present only for tables indexed by (variable, category).
    #[serde(skip_serializing_if = "Option::is_none", with = "category_serde")]
    pub category: Option<Value>,
    pub values: Vec<f64>,
}

/// Flattened statistics table.
///
/// Rows are indexed by `Variable` or `(Variable, Category)`; value columns carry flat names
/// such as `COUNT_REAL` or `MEAN_SYNTH`. `NaN` cells mean "no data in this partition".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsTable {
    /// Whether rows carry a `Category` label.
    pub by_category: bool,
    pub columns: Vec<String>,
    pub rows: Vec<StatsRow>,
}

impl StatsTable {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a value column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of a column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Find a row by its index labels. Categories compare numerically (`1 == 1.0`).
    pub fn row(&self, variable: &str, category: Option<&Value>) -> Option<&StatsRow> {
        self.rows.iter().find(|r| {
            r.variable == variable
                && match (&r.category, category) {
                    (None, None) => true,
                    (Some(a), Some(b)) => ValueKey(a.clone()) == ValueKey(b.clone()),
                    _ => false,
                }
        })
    }

    /// Value of `column` for the row labelled (`variable`, `category`).
    pub fn get(&self, variable: &str, category: Option<&Value>, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.row(variable, category).map(|r| r.values[idx])
    }

    /// Append a value column.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) {
        assert!(
            values.len() == self.rows.len(),
            "column length {} does not match row count {}",
            values.len(),
            self.rows.len()
        );
        self.columns.push(name.into());
        for (row, v) in self.rows.iter_mut().zip(values) {
            row.values.push(v);
        }
    }

    /// Keep only rows matching `predicate`.
    pub fn retain_rows<F>(&mut self, predicate: F)
    where
        F: FnMut(&StatsRow) -> bool,
    {
        self.rows.retain(predicate);
    }

    /// Convert to a [`DataSet`] for export.
    ///
    /// `Variable` and `Category` become `Utf8`, value columns `Float64` with `NaN` mapped to
    /// `Null`.
    pub fn to_dataset(&self) -> DataSet {
        let mut fields = vec![Field::new(VARIABLE_COLUMN, DataType::Utf8)];
        if self.by_category {
            fields.push(Field::new(CATEGORY_COLUMN, DataType::Utf8));
        }
        fields.extend(self.columns.iter().map(|c| Field::new(c.clone(), DataType::Float64)));

        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut out = Vec::with_capacity(fields.len());
                out.push(Value::Utf8(r.variable.clone()));
                if self.by_category {
                    out.push(match &r.category {
                        Some(c) => Value::Utf8(c.to_string()),
                        None => Value::Null,
                    });
                }
                out.extend(r.values.iter().map(|&v| {
                    if v.is_nan() {
                        Value::Null
                    } else {
                        Value::Float64(v)
                    }
                }));
                out
            })
            .collect();

        DataSet::new(Schema::new(fields), rows)
    }

    pub(crate) fn from_parts(
        by_category: bool,
        index: Vec<RowKey>,
        columns: Vec<String>,
        cells: Vec<Vec<f64>>,
    ) -> Self {
        let rows = index
            .into_iter()
            .zip(cells)
            .map(|(key, values)| StatsRow {
                variable: key.variable,
                category: key.category,
                values,
            })
            .collect();
        Self {
            by_category,
            columns,
            rows,
        }
    }
}

mod category_serde {
    use serde::Serializer;

    use crate::types::Value;

    pub fn serialize<S: Serializer>(value: &Option<Value>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_some(&v.to_string()),
            None => s.serialize_none(),
        }
    }
}
