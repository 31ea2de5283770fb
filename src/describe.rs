//! Side-by-side description of a real cohort and a synthetic cohort generated from it.
//!
//! ```rust
//! use synth_eval::config::DescribeConfig;
//! use synth_eval::describe::describe_real_vs_synth;
//! use synth_eval::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("PTID", DataType::Int64),
//!     Field::new("smoker", DataType::Int64),
//! ]);
//! let real = DataSet::new(
//!     schema.clone(),
//!     vec![vec![Value::Int64(1), Value::Int64(1)], vec![Value::Int64(2), Value::Int64(0)]],
//! );
//! let synth = DataSet::new(schema, vec![vec![Value::Int64(1), Value::Int64(1)]]);
//!
//! let report = describe_real_vs_synth(&real, &synth, &DescribeConfig::default()).unwrap();
//! assert_eq!(report.columns.discrete, vec!["smoker"]);
//! assert_eq!(report.categorical.get("smoker", Some(&Value::Int64(1)), "PCT_SYNTH"), Some(1.0));
//! ```

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::DescribeConfig;
use crate::error::EvalResult;
use crate::processing::{
    add_primary_key, categorize_columns, concat_rows, with_constant_column, ColumnCategories,
    StatsTable,
};
use crate::stats::{categorical_stats, numerical_stats};
use crate::types::{DataSet, DataType, Value};

/// Statistics of both cohorts, stratified by origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveReport {
    /// Categorization of the real cohort's columns (id column removed).
    pub columns: ColumnCategories,
    /// Counts, totals and percentages of discrete variables.
    pub categorical: StatsTable,
    /// Summary statistics of continuous variables.
    pub numerical: StatsTable,
}

/// Describe `real` and `synth` in one pair of tables whose groups are the two origins.
///
/// Column roles are decided on the real cohort only, so both cohorts are described with the
/// same variables. Cohorts lacking the id column get one (`0..n`).
///
/// # Errors
///
/// - [`crate::EvalError::SchemaMismatch`] if a column has incompatible types in the two
///   cohorts.
/// - [`crate::EvalError::MissingColumns`] never happens for variables taken from `real`; a
///   variable absent from `synth` is described from null cells instead.
#[instrument(skip_all, fields(real_rows = real.row_count(), synth_rows = synth.row_count()))]
pub fn describe_real_vs_synth(
    real: &DataSet,
    synth: &DataSet,
    config: &DescribeConfig,
) -> EvalResult<DescriptiveReport> {
    let mut columns = categorize_columns(real, config.cardinality_threshold);
    columns.remove(&config.id_column);
    columns.remove(&config.source_column);
    info!(
        discrete = columns.discrete.len(),
        continuous = columns.continuous.len(),
        "categorized real cohort columns"
    );

    let real = tag(real, &config.id_column, &config.source_column, &config.real_label);
    let synth = tag(synth, &config.id_column, &config.source_column, &config.synth_label);
    let combined = concat_rows(&real, &synth)?;

    let stats_config = config.stats_config();
    let categorical = categorical_stats(&combined, &columns.discrete, &stats_config)?;
    let numerical = numerical_stats(&combined, &columns.continuous, &stats_config)?;

    Ok(DescriptiveReport {
        columns,
        categorical,
        numerical,
    })
}

fn tag(dataset: &DataSet, id_column: &str, source_column: &str, label: &str) -> DataSet {
    let with_id = if dataset.schema.index_of(id_column).is_some() {
        dataset.clone()
    } else {
        add_primary_key(dataset, id_column)
    };
    with_constant_column(
        &with_id,
        source_column,
        DataType::Utf8,
        Value::Utf8(label.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::describe_real_vs_synth;
    use crate::config::DescribeConfig;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn real() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("PTID", DataType::Int64),
            Field::new("smoker", DataType::Int64),
            Field::new("age", DataType::Float64),
            Field::new("notes", DataType::Utf8),
        ]);
        let rows = (0..8)
            .map(|i| {
                vec![
                    Value::Int64(100 + i),
                    Value::Int64(i % 2),
                    Value::Float64(50.0 + i as f64),
                    Value::Utf8(format!("visit {i}")),
                ]
            })
            .collect();
        DataSet::new(schema, rows)
    }

    fn synth_without_ids() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("smoker", DataType::Float64),
            Field::new("age", DataType::Float64),
        ]);
        let rows = vec![
            vec![Value::Float64(1.0), Value::Float64(60.0)],
            vec![Value::Float64(1.0), Value::Float64(62.0)],
            vec![Value::Float64(0.0), Value::Null],
        ];
        DataSet::new(schema, rows)
    }

    #[test]
    fn describes_both_cohorts_by_origin() {
        let report =
            describe_real_vs_synth(&real(), &synth_without_ids(), &DescribeConfig::default())
                .unwrap();

        assert_eq!(report.columns.discrete, vec!["smoker"]);
        assert_eq!(report.columns.continuous, vec!["age"]);

        let cat = &report.categorical;
        assert_eq!(cat.row_count(), 1);
        let one = Some(Value::Float64(1.0));
        assert_eq!(cat.get("smoker", one.as_ref(), "COUNT_REAL"), Some(4.0));
        assert_eq!(cat.get("smoker", one.as_ref(), "COUNT_SYNTH"), Some(2.0));
        assert_eq!(cat.get("smoker", one.as_ref(), "TOT_SYNTH"), Some(3.0));

        let num = &report.numerical;
        assert_eq!(num.get("age", None, "MEAN_SYNTH"), Some(61.0));
        assert_eq!(num.get("age", None, "COUNT_SYNTH"), Some(2.0));
        assert_eq!(num.get("age", None, "COUNT_REAL"), Some(8.0));
    }

    #[test]
    fn custom_labels_name_the_columns() {
        let cfg = DescribeConfig {
            real_label: "original".to_string(),
            synth_label: "generated".to_string(),
            ..Default::default()
        };
        let report = describe_real_vs_synth(&real(), &synth_without_ids(), &cfg).unwrap();
        assert_eq!(
            report.numerical.columns.last().map(String::as_str),
            Some("COUNT_ORIGINAL")
        );
    }

    #[test]
    fn incompatible_column_types_are_rejected() {
        let schema = Schema::new(vec![Field::new("smoker", DataType::Utf8)]);
        let synth = DataSet::new(schema, vec![vec![Value::Utf8("yes".to_string())]]);
        let err = describe_real_vs_synth(&real(), &synth, &DescribeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("schema mismatch"));
    }
}
