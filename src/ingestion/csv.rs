//! CSV ingestion: typed reads against a [`Schema`], and schema inference for prepared cohorts.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{EvalError, EvalResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ; extra columns are ignored).
/// - Each value is parsed according to the schema field type; empty cells are `Null`.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> EvalResult<DataSet> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let ds = ingest_csv_from_reader(&mut rdr, schema)?;
    debug!(path = %path.display(), rows = ds.row_count(), "ingested csv");
    Ok(ds)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> EvalResult<DataSet> {
    let headers = rdr.headers()?.clone();

    let col_idxs = schema
        .fields
        .iter()
        .map(|field| {
            headers
                .iter()
                .position(|h| h == field.name)
                .ok_or_else(|| EvalError::SchemaMismatch {
                    message: format!(
                        "missing required column '{}'. headers={:?}",
                        field.name,
                        headers.iter().collect::<Vec<_>>()
                    ),
                })
        })
        .collect::<EvalResult<Vec<usize>>>()?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let row = schema
            .fields
            .iter()
            .zip(&col_idxs)
            .map(|(field, &csv_idx)| {
                let raw = record.get(csv_idx).unwrap_or("");
                parse_typed_value(user_row, &field.name, field.data_type, raw)
            })
            .collect::<EvalResult<Vec<Value>>>()?;
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Infer a schema from the CSV at `path`, then ingest it.
pub fn ingest_csv_inferred(path: impl AsRef<Path>) -> EvalResult<DataSet> {
    let path = path.as_ref();
    let schema = infer_schema_from_path(path)?;
    ingest_csv_from_path(path, &schema)
}

/// Infer a schema from the CSV at `path` (see [`infer_schema_from_reader`]).
pub fn infer_schema_from_path(path: impl AsRef<Path>) -> EvalResult<Schema> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    infer_schema_from_reader(&mut rdr)
}

/// Infer one field per header from the cell contents.
///
/// A column is `Int64` when every non-empty cell parses as an integer, `Float64` when every
/// non-empty cell parses as a float, and `Utf8` otherwise. Columns with no non-empty cell are
/// `Utf8`.
pub fn infer_schema_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> EvalResult<Schema> {
    let headers = rdr.headers()?.clone();
    let mut inferred: Vec<Option<DataType>> = vec![None; headers.len()];

    for result in rdr.records() {
        let record = result?;
        for (slot, raw) in inferred.iter_mut().zip(record.iter()) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            *slot = Some(widen(*slot, cell_type(raw)));
        }
    }

    let fields = headers
        .iter()
        .zip(inferred)
        .map(|(name, dt)| Field::new(name, dt.unwrap_or(DataType::Utf8)))
        .collect();
    Ok(Schema::new(fields))
}

fn cell_type(raw: &str) -> DataType {
    if raw.parse::<i64>().is_ok() {
        DataType::Int64
    } else if raw.parse::<f64>().is_ok() {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

fn widen(current: Option<DataType>, cell: DataType) -> DataType {
    match (current, cell) {
        (None, t) => t,
        (Some(DataType::Utf8), _) | (_, DataType::Utf8) => DataType::Utf8,
        (Some(DataType::Float64), _) | (_, DataType::Float64) => DataType::Float64,
        _ => DataType::Int64,
    }
}

fn parse_typed_value(row: usize, column: &str, data_type: DataType, raw: &str) -> EvalResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| EvalError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 | DataType::Categorical => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
