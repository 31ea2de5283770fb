//! `synth-eval` computes the descriptive statistics used to compare a synthetic clinical table
//! with the real cohort it was generated from.
//!
//! Given a wide table (one row per subject), a list of variables and one or more grouping
//! columns (typically the `type` column tagging rows as `real` or `synth`), it produces:
//!
//! - **categorical statistics**: per (variable, category) row, `COUNT_<g>`, `TOT_<g>` and
//!   `PCT_<g>` for every group `g`, with missing values counted as `"Missing value"`
//! - **numerical statistics**: per variable row, `MEAN_<g>`, `STD_<g>`, `MIN_<g>`, `Q1_<g>`,
//!   `MEDIAN_<g>`, `Q3_<g>`, `MAX_<g>` and `COUNT_<g>`
//!
//! The entrypoints are [`stats::categorical_stats`] and [`stats::numerical_stats`];
//! [`describe::describe_real_vs_synth`] runs both on a pair of cohorts.
//!
//! ## Quick example: numerical statistics
//!
//! ```rust
//! use synth_eval::config::StatsConfig;
//! use synth_eval::stats::numerical_stats;
//! use synth_eval::types::{DataSet, DataType, Field, Schema, Value};
//!
//! # fn main() -> Result<(), synth_eval::EvalError> {
//! let schema = Schema::new(vec![
//!     Field::new("PTID", DataType::Int64),
//!     Field::new("age", DataType::Int64),
//!     Field::new("label", DataType::Utf8),
//! ]);
//! let rows = [(10, "A"), (20, "A"), (30, "B"), (40, "B")]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, (age, l))| vec![Value::Int64(i as i64), Value::Int64(*age), Value::Utf8(l.to_string())])
//!     .collect();
//! let ds = DataSet::new(schema, rows);
//!
//! let table = numerical_stats(&ds, &["age".to_string()], &StatsConfig::new(["label"], "PTID"))?;
//! assert_eq!(table.get("age", None, "MEAN_A"), Some(15.0));
//! assert_eq!(table.get("age", None, "COUNT_B"), Some(2.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: the engine steps (categorize, melt, pivot, flatten, nulls, ratios) and table
//!   helpers
//! - [`stats`]: categorical and numerical statistics builders
//! - [`describe`]: real vs. synthetic cohort description
//! - [`ingestion`] / [`export`]: CSV in and out
//! - [`execution`]: parallel batches of statistics jobs with metrics and observer hooks
//! - [`config`]: serde-loadable settings
//! - [`error`]: the crate error type
//!
//! Logging goes through `tracing`; install a subscriber in the application to see it.

pub mod config;
pub mod describe;
pub mod error;
pub mod execution;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod stats;
pub mod types;

pub use error::{EvalError, EvalResult};
