//! Multi-index column flattening.

use super::pivot::{ColumnKey, PivotIndex, PivotTable};
use super::table::StatsTable;

/// Join each `(function, group...)` key with `_`.
///
/// With `preproc`, names are upper-cased and spaces become underscores:
/// `(mean, ["Placebo arm"])` gives `MEAN_PLACEBO_ARM`. Order follows `columns`.
///
/// Callers must make sure grouping labels stay distinct after this transform (`"Real"` and
/// `"REAL"` both map to `..._REAL`).
pub fn flatten_multiindex(columns: &[ColumnKey], preproc: bool) -> Vec<String> {
    columns
        .iter()
        .map(|key| {
            let mut parts = Vec::with_capacity(key.group.len() + 1);
            parts.push(key.func.name());
            parts.extend(key.group.iter().map(String::as_str));
            let joined = parts.join("_");
            if preproc {
                joined.replace(' ', "_").to_uppercase()
            } else {
                joined
            }
        })
        .collect()
}

/// Turn a [`PivotTable`] into a [`StatsTable`] with flat column names.
pub fn flatten(pivot: PivotTable, index: PivotIndex, preproc: bool) -> StatsTable {
    let columns = flatten_multiindex(&pivot.columns, preproc);
    StatsTable::from_parts(
        index == PivotIndex::VariableCategory,
        pivot.index,
        columns,
        pivot.cells,
    )
}
