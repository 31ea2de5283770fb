//! Descriptive statistics of categorical and numerical variables, stratified by grouping
//! columns.
//!
//! The two builders share one pipeline:
//!
//! ```text
//! melt → pivot → flatten → fill count nulls → (categorical: totals/percentages, keep Category == 1)
//! ```
//!
//! Variable-type specifics live in [`StatsKind`] as data: which functions are computed, the
//! count fill value, the label given to missing categorical values and the category kept in the
//! output.
//!
//! ## Example: categorical statistics
//!
//! ```rust
//! use synth_eval::config::StatsConfig;
//! use synth_eval::stats::categorical_stats;
//! use synth_eval::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("PTID", DataType::Int64),
//!     Field::new("gender", DataType::Int64),
//!     Field::new("label", DataType::Utf8),
//! ]);
//! let rows = [(0, "A"), (1, "A"), (1, "B"), (1, "B")]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, (g, l))| vec![Value::Int64(i as i64), Value::Int64(*g), Value::Utf8(l.to_string())])
//!     .collect();
//! let ds = DataSet::new(schema, rows);
//!
//! let cfg = StatsConfig::new(["label"], "PTID");
//! let table = categorical_stats(&ds, &["gender".to_string()], &cfg).unwrap();
//!
//! assert_eq!(table.row_count(), 1);
//! assert_eq!(table.get("gender", Some(&Value::Int64(1)), "COUNT_B"), Some(2.0));
//! assert_eq!(table.get("gender", Some(&Value::Int64(1)), "PCT_A"), Some(0.5));
//! ```

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::StatsConfig;
use crate::error::EvalResult;
use crate::processing::{
    derive_ratios, fill_count_nulls, flatten, melt, pivot, AggFunc, PivotIndex, StatsTable,
};
use crate::types::{DataSet, Value, ValueKey};

/// Category given to missing values of categorical variables.
pub const MISSING_VALUE_LABEL: &str = "Missing value";

/// Settings of the categorical builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalOptions {
    /// Label replacing missing values, so absent data is reported as its own category.
    pub missing_label: String,
    /// Category kept in the output (`Some(1)` for indicator-coded variables); `None` keeps all.
    ///
    /// With the default, every other category of a multi-valued variable is computed (and
    /// counted in `TOT_*`) but dropped from the output.
    pub keep_category: Option<Value>,
    /// Value replacing empty count partitions.
    pub count_fill: f64,
}

impl Default for CategoricalOptions {
    fn default() -> Self {
        Self {
            missing_label: MISSING_VALUE_LABEL.to_string(),
            keep_category: Some(Value::Int64(1)),
            count_fill: 0.0,
        }
    }
}

/// Settings of the numerical builder.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericalOptions {
    /// Functions computed, in output column order.
    pub funcs: Vec<AggFunc>,
    /// Value replacing empty count partitions.
    pub count_fill: f64,
}

impl Default for NumericalOptions {
    fn default() -> Self {
        Self {
            funcs: AggFunc::NUMERICAL.to_vec(),
            count_fill: 0.0,
        }
    }
}

/// Kind of variables being described, with its type-specific settings.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsKind {
    /// Counts per (variable, category) and group, with totals and percentages.
    Categorical(CategoricalOptions),
    /// Summary statistics per variable and group.
    Numerical(NumericalOptions),
}

impl StatsKind {
    pub fn categorical() -> Self {
        Self::Categorical(CategoricalOptions::default())
    }

    pub fn numerical() -> Self {
        Self::Numerical(NumericalOptions::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Categorical(_) => "categorical",
            Self::Numerical(_) => "numerical",
        }
    }
}

/// Compute descriptive statistics of `variables`, grouped by `config.group_columns`.
///
/// `dataset` holds one row per subject. It is not modified; grouping columns are stringified
/// on a private copy.
///
/// # Errors
///
/// [`crate::EvalError::MissingColumns`] listing every requested variable, grouping column or
/// id column absent from `dataset`. Sparse data never fails: empty partitions are `NaN` (`0`
/// in count columns) and zero totals give `NaN` percentages.
#[instrument(skip_all, fields(kind = kind.name(), variables = variables.len()))]
pub fn compute_stats(
    dataset: &DataSet,
    kind: &StatsKind,
    variables: &[String],
    config: &StatsConfig,
) -> EvalResult<StatsTable> {
    let mut wide = dataset.clone();
    let mut long = melt(&mut wide, variables, &config.group_columns, &config.id_column)?;

    let table = match kind {
        StatsKind::Categorical(opts) => {
            long.fill_missing_category(&opts.missing_label);
            let index = PivotIndex::VariableCategory;
            let mut table = flatten(pivot(&long, index, &[AggFunc::Count]), index, true);
            fill_count_nulls(&mut table, opts.count_fill);
            let mut table = derive_ratios(table);
            if let Some(keep) = &opts.keep_category {
                let keep = ValueKey(keep.clone());
                table.retain_rows(|r| {
                    r.category
                        .as_ref()
                        .is_some_and(|c| ValueKey(c.clone()) == keep)
                });
            }
            table
        }
        StatsKind::Numerical(opts) => {
            long.drop_subject();
            let index = PivotIndex::Variable;
            let mut table = flatten(pivot(&long, index, &opts.funcs), index, true);
            fill_count_nulls(&mut table, opts.count_fill);
            table
        }
    };

    debug!(
        rows = table.row_count(),
        columns = table.columns.len(),
        "computed descriptive statistics"
    );
    Ok(table)
}

/// Categorical statistics with default [`CategoricalOptions`]: counts, totals and percentages
/// of category `1` per group, missing values counted as `"Missing value"`.
pub fn categorical_stats(
    dataset: &DataSet,
    variables: &[String],
    config: &StatsConfig,
) -> EvalResult<StatsTable> {
    compute_stats(dataset, &StatsKind::categorical(), variables, config)
}

/// Numerical statistics with default [`NumericalOptions`]: mean, std, min, q1, median, q3, max
/// and count per group.
pub fn numerical_stats(
    dataset: &DataSet,
    variables: &[String],
    config: &StatsConfig,
) -> EvalResult<StatsTable> {
    compute_stats(dataset, &StatsKind::numerical(), variables, config)
}

/// An owned statistics call, e.g. for batch execution.
#[derive(Debug, Clone)]
pub struct StatsJob {
    /// Label used in logs and execution events.
    pub name: String,
    pub dataset: Arc<DataSet>,
    pub kind: StatsKind,
    pub variables: Vec<String>,
    pub config: StatsConfig,
}

impl StatsJob {
    /// Execute the job by calling [`compute_stats`].
    pub fn run(&self) -> EvalResult<StatsTable> {
        compute_stats(&self.dataset, &self.kind, &self.variables, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        categorical_stats, compute_stats, numerical_stats, CategoricalOptions, StatsKind,
    };
    use crate::config::StatsConfig;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn cohort(values: Vec<Value>, labels: &[&str], var: &str, var_type: DataType) -> DataSet {
        let schema = Schema::new(vec![
            Field::new("PTID", DataType::Int64),
            Field::new(var, var_type),
            Field::new("label", DataType::Utf8),
        ]);
        let rows = values
            .into_iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (v, l))| vec![Value::Int64(i as i64), v, Value::Utf8(l.to_string())])
            .collect();
        DataSet::new(schema, rows)
    }

    fn gender() -> DataSet {
        cohort(
            [0, 1, 1, 1].into_iter().map(Value::Int64).collect(),
            &["A", "A", "B", "B"],
            "gender",
            DataType::Int64,
        )
    }

    fn cfg() -> StatsConfig {
        StatsConfig::new(["label"], "PTID")
    }

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn categorical_rows_before_filter() {
        let kind = StatsKind::Categorical(CategoricalOptions {
            keep_category: None,
            ..Default::default()
        });
        let t = compute_stats(&gender(), &kind, &vars(&["gender"]), &cfg()).unwrap();

        assert_eq!(
            t.columns,
            vec!["COUNT_A", "COUNT_B", "TOT_A", "TOT_B", "PCT_A", "PCT_B"]
        );
        let zero = t.row("gender", Some(&Value::Int64(0))).unwrap();
        assert_eq!(zero.values, vec![1.0, 0.0, 2.0, 2.0, 0.5, 0.0]);
        let one = t.row("gender", Some(&Value::Int64(1))).unwrap();
        assert_eq!(one.values, vec![1.0, 2.0, 2.0, 2.0, 0.5, 1.0]);
    }

    #[test]
    fn categorical_keeps_only_category_one() {
        let t = categorical_stats(&gender(), &vars(&["gender"]), &cfg()).unwrap();
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.rows[0].category, Some(Value::Int64(1)));
    }

    #[test]
    fn missing_values_become_their_own_category() {
        let ds = cohort(
            vec![Value::Int64(1), Value::Null, Value::Int64(1)],
            &["A", "A", "B"],
            "smoker",
            DataType::Int64,
        );
        let kind = StatsKind::Categorical(CategoricalOptions {
            keep_category: None,
            ..Default::default()
        });
        let t = compute_stats(&ds, &kind, &vars(&["smoker"]), &cfg()).unwrap();

        let missing = Value::Utf8("Missing value".to_string());
        assert_eq!(t.get("smoker", Some(&missing), "COUNT_A"), Some(1.0));
        assert_eq!(t.get("smoker", Some(&missing), "COUNT_B"), Some(0.0));
        assert_eq!(t.get("smoker", Some(&Value::Int64(1)), "TOT_A"), Some(2.0));
    }

    #[test]
    fn numerical_scenario() {
        let ds = cohort(
            [10, 20, 30, 40].into_iter().map(Value::Int64).collect(),
            &["A", "A", "B", "B"],
            "age",
            DataType::Int64,
        );
        let t = numerical_stats(&ds, &vars(&["age"]), &cfg()).unwrap();

        assert!(!t.by_category);
        assert_eq!(
            t.columns,
            vec![
                "MEAN_A", "MEAN_B", "STD_A", "STD_B", "MIN_A", "MIN_B", "Q1_A", "Q1_B",
                "MEDIAN_A", "MEDIAN_B", "Q3_A", "Q3_B", "MAX_A", "MAX_B", "COUNT_A", "COUNT_B",
            ]
        );
        assert_eq!(t.get("age", None, "MEAN_A"), Some(15.0));
        assert_eq!(t.get("age", None, "MEAN_B"), Some(35.0));
        assert_eq!(t.get("age", None, "COUNT_A"), Some(2.0));
        assert_eq!(t.get("age", None, "COUNT_B"), Some(2.0));
        assert_eq!(t.get("age", None, "MIN_B"), Some(30.0));
    }

    #[test]
    fn group_without_observations_has_zero_count_and_nan_mean() {
        let ds = cohort(
            vec![Value::Float64(10.0), Value::Float64(20.0), Value::Null],
            &["A", "A", "B"],
            "age",
            DataType::Float64,
        );
        let t = numerical_stats(&ds, &vars(&["age"]), &cfg()).unwrap();

        assert_eq!(t.get("age", None, "COUNT_B"), Some(0.0));
        assert!(t.get("age", None, "MEAN_B").unwrap().is_nan());
        assert!(t.get("age", None, "STD_B").unwrap().is_nan());
    }

    #[test]
    fn missing_columns_fail_fast_with_every_name() {
        let err = numerical_stats(&gender(), &vars(&["age", "gender", "bmi"]), &cfg()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("\"age\""));
        assert!(msg.contains("\"bmi\""));
        assert!(!msg.contains("\"gender\""));
    }

    #[test]
    fn input_is_not_modified() {
        let ds = gender();
        let before = ds.clone();
        categorical_stats(&ds, &vars(&["gender"]), &cfg()).unwrap();
        assert_eq!(ds, before);
    }

    #[test]
    fn nan_cells_count_as_missing_values() {
        let ds = cohort(
            vec![Value::Float64(1.0), Value::Float64(f64::NAN), Value::Float64(0.0)],
            &["A", "A", "A"],
            "smoker",
            DataType::Float64,
        );
        let kind = StatsKind::Categorical(CategoricalOptions {
            keep_category: None,
            ..Default::default()
        });
        let t = compute_stats(&ds, &kind, &vars(&["smoker"]), &cfg()).unwrap();

        assert_eq!(t.row_count(), 3);
        assert!(t.rows.iter().all(|r| !r.category.as_ref().is_some_and(Value::is_missing)));
        let missing = Value::Utf8("Missing value".to_string());
        assert_eq!(t.get("smoker", Some(&missing), "COUNT_A"), Some(1.0));
        assert_eq!(t.get("smoker", Some(&Value::Float64(1.0)), "TOT_A"), Some(3.0));
        assert_eq!(t.get("smoker", Some(&Value::Float64(1.0)), "PCT_A"), Some(1.0 / 3.0));
    }

    #[test]
    fn ungrouped_categorical_stats_keep_totals_and_percentages() {
        let cfg = StatsConfig::new(Vec::<String>::new(), "PTID");
        let t = categorical_stats(&gender(), &vars(&["gender"]), &cfg).unwrap();

        assert_eq!(t.columns, vec!["COUNT", "TOT", "PCT"]);
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.rows[0].values, vec![3.0, 4.0, 0.75]);
    }

    #[test]
    fn ungrouped_numerical_counts_are_filled() {
        let ds = cohort(vec![Value::Null, Value::Null], &["A", "B"], "age", DataType::Float64);
        let cfg = StatsConfig::new(Vec::<String>::new(), "PTID");
        let t = numerical_stats(&ds, &vars(&["age"]), &cfg).unwrap();

        assert_eq!(t.columns.last().map(String::as_str), Some("COUNT"));
        assert_eq!(t.get("age", None, "COUNT"), Some(0.0));
        assert!(t.get("age", None, "MEAN").unwrap().is_nan());
    }
}
