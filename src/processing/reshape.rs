//! Wide-to-long reshaping ("melt").

use tracing::debug;

use crate::error::{EvalError, EvalResult};
use crate::types::{DataSet, DataType, Value};

/// Name of the column holding the variable name in long and stats tables.
pub const VARIABLE_COLUMN: &str = "Variable";
/// Name of the column holding the variable's value (its category) in long and stats tables.
pub const CATEGORY_COLUMN: &str = "Category";

/// One (subject, variable) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    /// Grouping labels, aligned with [`LongTable::group_columns`].
    pub groups: Vec<String>,
    /// Subject identifier; `None` once dropped.
    pub subject: Option<Value>,
    pub variable: String,
    pub category: Value,
}

/// Long-form table: one row per (subject, requested variable).
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    pub group_columns: Vec<String>,
    /// Requested variables, in request order (including ones with no rows).
    pub variables: Vec<String>,
    pub rows: Vec<LongRow>,
}

impl LongTable {
    /// Drop the subject identifier from every row.
    pub fn drop_subject(&mut self) {
        for row in &mut self.rows {
            row.subject = None;
        }
    }

    /// Replace missing categories (`Null` or `NaN`) with `label`, making "no data" a reportable category.
    pub fn fill_missing_category(&mut self, label: &str) {
        for row in &mut self.rows {
            if row.category.is_missing() {
                row.category = Value::Utf8(label.to_owned());
            }
        }
    }
}

/// Convert `columns` to string labels in place (schema type becomes `Utf8`).
///
/// Grouping keys are compared as text from here on, so numeric group codes never take part in
/// numeric ordering of pivot columns.
pub fn set_to_str(dataset: &mut DataSet, columns: &[String]) -> EvalResult<()> {
    let missing = dataset.schema.missing(columns.iter().map(String::as_str));
    if !missing.is_empty() {
        return Err(EvalError::MissingColumns { columns: missing });
    }

    for name in columns {
        let Some(idx) = dataset.schema.index_of(name) else {
            continue;
        };
        dataset.schema.fields[idx].data_type = DataType::Utf8;
        for row in &mut dataset.rows {
            if let Some(v) = row.get_mut(idx) {
                if !matches!(v, Value::Utf8(_)) {
                    *v = Value::Utf8(v.to_string());
                }
            }
        }
    }
    Ok(())
}

/// Melt `dataset` into a [`LongTable`].
///
/// Every requested variable, grouping column and the id column must exist; otherwise this
/// fails with [`EvalError::MissingColumns`] naming all of them. Grouping columns are converted
/// to strings in place (see [`set_to_str`]).
pub fn melt(
    dataset: &mut DataSet,
    variables: &[String],
    group_columns: &[String],
    id_column: &str,
) -> EvalResult<LongTable> {
    let requested = variables
        .iter()
        .chain(group_columns)
        .map(String::as_str)
        .chain(std::iter::once(id_column));
    let missing = dataset.schema.missing(requested);
    if !missing.is_empty() {
        return Err(EvalError::MissingColumns { columns: missing });
    }

    set_to_str(dataset, group_columns)?;

    let group_idxs = indices_of(dataset, group_columns);
    let var_idxs = indices_of(dataset, variables);
    let id_idx = dataset.schema.index_of(id_column);

    let mut rows = Vec::with_capacity(dataset.row_count() * variables.len());
    for (name, &var_idx) in variables.iter().zip(var_idxs.iter()) {
        for row in &dataset.rows {
            let groups = group_idxs
                .iter()
                .map(|&g| match row.get(g) {
                    Some(Value::Utf8(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => Value::Null.to_string(),
                })
                .collect();
            rows.push(LongRow {
                groups,
                subject: id_idx.and_then(|i| row.get(i).cloned()),
                variable: name.clone(),
                category: row.get(var_idx).cloned().unwrap_or(Value::Null),
            });
        }
    }

    debug!(
        variables = variables.len(),
        subjects = dataset.row_count(),
        long_rows = rows.len(),
        "melted dataset to long form"
    );

    Ok(LongTable {
        group_columns: group_columns.to_vec(),
        variables: variables.to_vec(),
        rows,
    })
}

fn indices_of(dataset: &DataSet, names: &[String]) -> Vec<usize> {
    names
        .iter()
        .filter_map(|n| dataset.schema.index_of(n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{melt, set_to_str};
    use crate::error::EvalError;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn wide() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("PTID", DataType::Int64),
            Field::new("gender", DataType::Int64),
            Field::new("age", DataType::Float64),
            Field::new("arm", DataType::Int64),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Int64(0), Value::Float64(70.5), Value::Int64(0)],
                vec![Value::Int64(2), Value::Null, Value::Float64(65.0), Value::Int64(1)],
            ],
        )
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn melt_produces_one_row_per_subject_and_variable() {
        let mut ds = wide();
        let long = melt(&mut ds, &names(&["gender", "age"]), &names(&["arm"]), "PTID").unwrap();

        assert_eq!(long.rows.len(), 4);
        assert_eq!(long.rows[0].variable, "gender");
        assert_eq!(long.rows[0].category, Value::Int64(0));
        assert_eq!(long.rows[0].groups, vec!["0".to_string()]);
        assert_eq!(long.rows[0].subject, Some(Value::Int64(1)));
        assert_eq!(long.rows[1].category, Value::Null);
        assert_eq!(long.rows[3].variable, "age");
        assert_eq!(long.rows[3].category, Value::Float64(65.0));
        assert_eq!(long.rows[3].groups, vec!["1".to_string()]);
    }

    #[test]
    fn melt_converts_group_columns_in_place() {
        let mut ds = wide();
        melt(&mut ds, &names(&["age"]), &names(&["arm"]), "PTID").unwrap();
        let arm = ds.schema.index_of("arm").unwrap();
        assert_eq!(ds.schema.fields[arm].data_type, DataType::Utf8);
        assert_eq!(ds.rows[1][arm], Value::Utf8("1".to_string()));
    }

    #[test]
    fn melt_reports_every_missing_column() {
        let mut ds = wide();
        let err = melt(&mut ds, &names(&["bmi", "age", "mmse"]), &names(&["arm"]), "PTID")
            .unwrap_err();
        match err {
            EvalError::MissingColumns { columns } => assert_eq!(columns, names(&["bmi", "mmse"])),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn fill_and_drop_subject() {
        let mut ds = wide();
        let mut long = melt(&mut ds, &names(&["gender"]), &names(&["arm"]), "PTID").unwrap();
        long.fill_missing_category("Missing value");
        long.drop_subject();
        assert_eq!(long.rows[1].category, Value::Utf8("Missing value".to_string()));
        assert!(long.rows.iter().all(|r| r.subject.is_none()));
    }

    #[test]
    fn set_to_str_rejects_unknown_columns() {
        let mut ds = wide();
        let err = set_to_str(&mut ds, &names(&["source"])).unwrap_err();
        assert!(err.to_string().contains("source"));
    }
}
