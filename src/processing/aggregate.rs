//! Aggregation functions applied to one pivot partition.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Built-in aggregation functions over the values of a partition.
///
/// Every function returns an `f64`; "no data" is `NaN`, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    /// Number of non-missing values.
    Count,
    /// Arithmetic mean.
    Mean,
    /// Sample standard deviation (`n - 1` denominator).
    Std,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
    /// 50th percentile.
    Median,
    /// First quartile (25th percentile).
    Q1,
    /// Third quartile (75th percentile).
    Q3,
}

impl AggFunc {
    /// Functions computed by the numerical statistics builder, in output order.
    pub const NUMERICAL: [AggFunc; 8] = [
        AggFunc::Mean,
        AggFunc::Std,
        AggFunc::Min,
        AggFunc::Q1,
        AggFunc::Median,
        AggFunc::Q3,
        AggFunc::Max,
        AggFunc::Count,
    ];

    /// Lower-case function name, used as the first level of pivot column keys.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Mean => "mean",
            Self::Std => "std",
            Self::Min => "min",
            Self::Max => "max",
            Self::Median => "median",
            Self::Q1 => "q1",
            Self::Q3 => "q3",
        }
    }

    /// Apply the function to a partition.
    ///
    /// - Missing values (`Null`, float `NaN`) are ignored by every function.
    /// - `Count` accepts any value type.
    /// - The numeric functions return `NaN` if the partition holds a non-numeric value or has no
    ///   numeric values at all. `Std` also returns `NaN` for a single value.
    pub fn apply(&self, values: &[Value]) -> f64 {
        if let Self::Count = self {
            return values.iter().filter(|v| !v.is_missing()).count() as f64;
        }

        let Some(mut numbers) = numeric_values(values) else {
            return f64::NAN;
        };
        if numbers.is_empty() {
            return f64::NAN;
        }

        match self {
            Self::Count => unreachable!("count handled above"),
            Self::Mean => mean(&numbers),
            Self::Std => sample_std(&numbers),
            Self::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Median | Self::Q1 | Self::Q3 => {
                numbers.sort_by(|a, b| a.total_cmp(b));
                let q = match self {
                    Self::Q1 => 0.25,
                    Self::Q3 => 0.75,
                    _ => 0.5,
                };
                quantile_sorted(&numbers, q)
            }
        }
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric view of the non-missing values, or `None` if any of them is not numeric.
fn numeric_values(values: &[Value]) -> Option<Vec<f64>> {
    values
        .iter()
        .filter(|v| !v.is_missing())
        .map(Value::as_f64)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    variance.sqrt()
}

/// Linear-interpolation quantile of an ascending slice (`NaN` when empty).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
