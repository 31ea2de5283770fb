//! Whole-table utilities used to prepare cohorts before describing them.

use std::collections::BTreeSet;

use tracing::info;

use crate::error::{EvalError, EvalResult};
use crate::types::{DataSet, DataType, Field, Schema, Value, ValueKey};

/// Ensure `key` is a unique row identifier.
///
/// Adds an `Int64` column `0..n` when `key` is absent, and regenerates it when its values are
/// not unique (which happens with generated data).
pub fn add_primary_key(dataset: &DataSet, key: &str) -> DataSet {
    match dataset.schema.index_of(key) {
        None => {
            let mut out = dataset.clone();
            out.schema.fields.push(Field::new(key, DataType::Int64));
            for (i, row) in out.rows.iter_mut().enumerate() {
                row.push(Value::Int64(i as i64));
            }
            out
        }
        Some(idx) => {
            let distinct = dataset
                .column_values(idx)
                .map(|v| ValueKey(v.clone()))
                .collect::<BTreeSet<_>>()
                .len();
            if distinct == dataset.row_count() {
                return dataset.clone();
            }
            info!(column = key, "primary key is not unique, generating a new one");
            let mut out = dataset.clone();
            out.schema.fields[idx].data_type = DataType::Int64;
            for (i, row) in out.rows.iter_mut().enumerate() {
                row[idx] = Value::Int64(i as i64);
            }
            out
        }
    }
}

/// Drop every row holding at least one missing value (`Null` or `NaN`).
pub fn rm_null_rows(dataset: &DataSet) -> DataSet {
    dataset.filter_rows(|row| !row.iter().any(Value::is_missing))
}

/// Set column `name` to `value` on every row, adding the column if needed.
pub fn with_constant_column(dataset: &DataSet, name: &str, data_type: DataType, value: Value) -> DataSet {
    match dataset.schema.index_of(name) {
        Some(idx) => {
            let mut out = dataset.map_rows(|row| {
                let mut row = row.to_vec();
                row[idx] = value.clone();
                row
            });
            out.schema.fields[idx].data_type = data_type;
            out
        }
        None => {
            let mut out = dataset.clone();
            out.schema.fields.push(Field::new(name, data_type));
            for row in &mut out.rows {
                row.push(value.clone());
            }
            out
        }
    }
}

/// Stack `bottom` under `top`, aligning columns by name.
///
/// The result has `top`'s columns followed by columns only present in `bottom`; cells absent
/// from a side are null. `Int64` and `Float64` columns merge as `Float64`; any other type
/// conflict is a [`EvalError::SchemaMismatch`].
pub fn concat_rows(top: &DataSet, bottom: &DataSet) -> EvalResult<DataSet> {
    let mut fields = top.schema.fields.clone();
    for field in &bottom.schema.fields {
        match fields.iter().position(|f| f.name == field.name) {
            None => fields.push(field.clone()),
            Some(i) => {
                let merged = merge_types(&fields[i], field)?;
                fields[i].data_type = merged;
            }
        }
    }

    let mut rows = Vec::with_capacity(top.row_count() + bottom.row_count());
    for source in [top, bottom] {
        let mapping: Vec<Option<usize>> = fields
            .iter()
            .map(|f| source.schema.index_of(&f.name))
            .collect();
        for row in &source.rows {
            rows.push(
                mapping
                    .iter()
                    .zip(&fields)
                    .map(|(src, field)| match src.and_then(|i| row.get(i)) {
                        Some(v) => coerce(v, field.data_type),
                        None => Value::Null,
                    })
                    .collect(),
            );
        }
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn merge_types(a: &Field, b: &Field) -> EvalResult<DataType> {
    use DataType::*;
    match (a.data_type, b.data_type) {
        (x, y) if x == y => Ok(x),
        (Int64, Float64) | (Float64, Int64) => Ok(Float64),
        (Utf8, Categorical) | (Categorical, Utf8) => Ok(Categorical),
        (x, y) => Err(EvalError::SchemaMismatch {
            message: format!(
                "column '{}' has incompatible types {x:?} and {y:?}",
                a.name
            ),
        }),
    }
}

fn coerce(v: &Value, data_type: DataType) -> Value {
    match (v, data_type) {
        (Value::Int64(i), DataType::Float64) => Value::Float64(*i as f64),
        _ => v.clone(),
    }
}
