//! Building blocks of the descriptive-statistics engine.
//!
//! Each step is a plain function over in-memory tables, usable on its own:
//!
//! - [`categorize_columns()`]: discrete vs. continuous columns by cardinality
//! - [`melt()`]: wide table → [`LongTable`] (one row per subject × variable)
//! - [`pivot()`]: [`LongTable`] → [`PivotTable`] (variable[, category] × function × group)
//! - [`flatten()`]: two-level column keys → flat names (`COUNT_REAL`, `MEAN_SYNTH`, ...)
//! - [`fill_count_nulls()`]: explicit zero for empty count partitions
//! - [`derive_ratios()`]: `TOT_<g>` / `PCT_<g>` columns for categorical variables
//!
//! [`frame`] holds whole-table helpers (primary keys, null rows, concatenation).
//!
//! ## Example: melt → pivot → flatten
//!
//! ```rust
//! use synth_eval::processing::{flatten, melt, pivot, AggFunc, PivotIndex};
//! use synth_eval::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("PTID", DataType::Int64),
//!     Field::new("age", DataType::Int64),
//!     Field::new("label", DataType::Utf8),
//! ]);
//! let mut ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Int64(10), Value::Utf8("A".into())],
//!         vec![Value::Int64(2), Value::Int64(20), Value::Utf8("A".into())],
//!         vec![Value::Int64(3), Value::Int64(30), Value::Utf8("B".into())],
//!     ],
//! );
//!
//! let long = melt(&mut ds, &["age".to_string()], &["label".to_string()], "PTID").unwrap();
//! let table = flatten(
//!     pivot(&long, PivotIndex::Variable, &[AggFunc::Mean]),
//!     PivotIndex::Variable,
//!     true,
//! );
//! assert_eq!(table.columns, vec!["MEAN_A", "MEAN_B"]);
//! assert_eq!(table.get("age", None, "MEAN_A"), Some(15.0));
//! ```

pub mod aggregate;
pub mod categorize;
pub mod flatten;
pub mod frame;
pub mod nulls;
pub mod pivot;
pub mod ratio;
pub mod reshape;
pub mod table;

pub use aggregate::AggFunc;
pub use categorize::{categorize_columns, ColumnCategories, DEFAULT_CARDINALITY_THRESHOLD};
pub use flatten::{flatten, flatten_multiindex};
pub use frame::{add_primary_key, concat_rows, rm_null_rows, with_constant_column};
pub use nulls::{count_group, fill_count_nulls, replace_na_in_columns, COUNT_COLUMN, COUNT_PREFIX};
pub use pivot::{pivot, ColumnKey, PivotIndex, PivotTable, RowKey};
pub use ratio::{derive_ratios, PCT_PREFIX, TOT_PREFIX};
pub use reshape::{melt, set_to_str, LongRow, LongTable, CATEGORY_COLUMN, VARIABLE_COLUMN};
pub use table::{StatsRow, StatsTable};
