//! Explicit configuration passed into the statistics builders and the describe pipeline.
//!
//! Both structs deserialize from JSON with every field optional:
//!
//! ```rust
//! use synth_eval::config::DescribeConfig;
//!
//! let cfg = DescribeConfig::from_json_str(r#"{ "id_column": "PATNO", "cardinality_threshold": 3 }"#)
//!     .unwrap();
//! assert_eq!(cfg.id_column, "PATNO");
//! assert_eq!(cfg.source_column, "type");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EvalResult;
use crate::processing::DEFAULT_CARDINALITY_THRESHOLD;

/// Default subject identifier column.
pub const DEFAULT_ID_COLUMN: &str = "PTID";
/// Default column tagging rows with their origin.
pub const DEFAULT_SOURCE_COLUMN: &str = "type";

/// Columns used by one statistics call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Grouping dimensions statistics are stratified by.
    pub group_columns: Vec<String>,
    /// Subject identifier (melt anchor only, never aggregated).
    pub id_column: String,
}

impl StatsConfig {
    pub fn new<I, S>(group_columns: I, id_column: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_columns: group_columns.into_iter().map(Into::into).collect(),
            id_column: id_column.into(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::new([DEFAULT_SOURCE_COLUMN], DEFAULT_ID_COLUMN)
    }
}

/// Settings of the real-vs-synthetic describe pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeConfig {
    pub id_column: String,
    /// Column added to tag each row with its origin.
    pub source_column: String,
    pub real_label: String,
    pub synth_label: String,
    /// Maximum distinct values for a numeric column to be described as categorical.
    pub cardinality_threshold: usize,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            source_column: DEFAULT_SOURCE_COLUMN.to_string(),
            real_label: "real".to_string(),
            synth_label: "synth".to_string(),
            cardinality_threshold: DEFAULT_CARDINALITY_THRESHOLD,
        }
    }
}

impl DescribeConfig {
    pub fn from_json_str(s: &str) -> EvalResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> EvalResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Stats configuration grouping by the source column.
    pub fn stats_config(&self) -> StatsConfig {
        StatsConfig::new([self.source_column.as_str()], self.id_column.as_str())
    }
}
