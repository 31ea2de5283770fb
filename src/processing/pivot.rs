//! Cross-tabulation of a [`LongTable`] by variable (and category) × grouping labels.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Value, ValueKey};

use super::aggregate::AggFunc;
use super::reshape::LongTable;

/// Row index of a pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotIndex {
    /// One row per variable (numerical statistics).
    Variable,
    /// One row per observed (variable, category) pair (categorical statistics).
    VariableCategory,
}

/// Row label of a pivot or stats table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowKey {
    pub variable: String,
    /// `None` when the table is indexed by variable only.
    pub category: Option<Value>,
}

/// Two-level column key: aggregation function, then one label per grouping column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKey {
    pub func: AggFunc,
    pub group: Vec<String>,
}

/// Result of [`pivot`], before column flattening.
///
/// `cells[r][c]` is the value for `index[r]` and `columns[c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub index: Vec<RowKey>,
    pub columns: Vec<ColumnKey>,
    pub cells: Vec<Vec<f64>>,
}

type Partitions = BTreeMap<Vec<String>, Vec<Value>>;

/// Aggregate `long` into a [`PivotTable`].
///
/// Columns are every function in `funcs` (in the given order) × every grouping-label
/// combination observed in `long` (sorted). The full product is always materialized: a
/// partition without rows is `NaN`, whatever the function.
///
/// With [`PivotIndex::Variable`] every requested variable gets a row, even one without
/// observations. With [`PivotIndex::VariableCategory`] rows are the observed (variable,
/// category) pairs; missing categories are not keys.
pub fn pivot(long: &LongTable, index: PivotIndex, funcs: &[AggFunc]) -> PivotTable {
    let groups: BTreeSet<Vec<String>> = long.rows.iter().map(|r| r.groups.clone()).collect();

    let mut partitions: BTreeMap<(String, Option<ValueKey>), Partitions> = BTreeMap::new();
    if index == PivotIndex::Variable {
        for var in &long.variables {
            partitions.entry((var.clone(), None)).or_default();
        }
    }

    for row in &long.rows {
        let category = match index {
            PivotIndex::Variable => None,
            PivotIndex::VariableCategory if row.category.is_missing() => continue,
            PivotIndex::VariableCategory => Some(ValueKey(row.category.clone())),
        };
        partitions
            .entry((row.variable.clone(), category))
            .or_default()
            .entry(row.groups.clone())
            .or_default()
            .push(row.category.clone());
    }

    let columns: Vec<ColumnKey> = funcs
        .iter()
        .flat_map(|&func| {
            groups.iter().map(move |g| ColumnKey {
                func,
                group: g.clone(),
            })
        })
        .collect();

    let mut out_index = Vec::with_capacity(partitions.len());
    let mut cells = Vec::with_capacity(partitions.len());
    for ((variable, category), parts) in partitions {
        let row_cells = columns
            .iter()
            .map(|col| {
                parts
                    .get(&col.group)
                    .map_or(f64::NAN, |values| col.func.apply(values))
            })
            .collect();
        out_index.push(RowKey {
            variable,
            category: category.map(|k| k.0),
        });
        cells.push(row_cells);
    }

    PivotTable {
        index: out_index,
        columns,
        cells,
    }
}
