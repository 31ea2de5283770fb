//! Explicit fill values for count columns.

use super::table::StatsTable;

/// Prefix of flattened count columns.
pub const COUNT_PREFIX: &str = "COUNT_";
/// Count column of a table computed without grouping columns.
pub const COUNT_COLUMN: &str = "COUNT";

/// Group suffix of a count column: `Some("REAL")` for `COUNT_REAL`, `Some("")` for the
/// ungrouped `COUNT`, `None` for any other column.
pub fn count_group(name: &str) -> Option<&str> {
    if name == COUNT_COLUMN {
        Some("")
    } else {
        name.strip_prefix(COUNT_PREFIX)
    }
}

/// Replace `NaN` with `fill` in every column whose name satisfies `selector`.
///
/// Other columns are left untouched.
pub fn replace_na_in_columns<P>(table: &mut StatsTable, selector: P, fill: f64)
where
    P: Fn(&str) -> bool,
{
    let idxs: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| selector(name))
        .map(|(i, _)| i)
        .collect();

    for row in &mut table.rows {
        for &i in &idxs {
            if row.values[i].is_nan() {
                row.values[i] = fill;
            }
        }
    }
}

/// Replace `NaN` with `fill` in the count columns (`COUNT_*`, or `COUNT` when ungrouped).
///
/// An empty partition has count zero; a `NaN` mean or standard deviation still means "no data".
pub fn fill_count_nulls(table: &mut StatsTable, fill: f64) {
    replace_na_in_columns(table, |name| count_group(name).is_some(), fill);
}

#[cfg(test)]
mod tests {
    use super::{count_group, fill_count_nulls};
    use crate::processing::pivot::RowKey;
    use crate::processing::table::StatsTable;

    #[test]
    fn only_count_columns_are_filled() {
        let mut t = StatsTable::from_parts(
            false,
            vec![RowKey { variable: "age".into(), category: None }],
            vec!["MEAN_A".into(), "MEAN_B".into(), "COUNT_A".into(), "COUNT_B".into()],
            vec![vec![15.0, f64::NAN, 2.0, f64::NAN]],
        );
        fill_count_nulls(&mut t, 0.0);

        let v = &t.rows[0].values;
        assert_eq!(v[0], 15.0);
        assert!(v[1].is_nan());
        assert_eq!(v[2], 2.0);
        assert_eq!(v[3], 0.0);
    }

    #[test]
    fn ungrouped_count_column_is_a_count_column() {
        assert_eq!(count_group("COUNT"), Some(""));
        assert_eq!(count_group("COUNT_SYNTH"), Some("SYNTH"));
        assert_eq!(count_group("COUNTRY"), None);
        assert_eq!(count_group("MEAN"), None);

        let mut t = StatsTable::from_parts(
            false,
            vec![RowKey { variable: "age".into(), category: None }],
            vec!["MEAN".into(), "COUNT".into()],
            vec![vec![f64::NAN, f64::NAN]],
        );
        fill_count_nulls(&mut t, 0.0);
        assert!(t.rows[0].values[0].is_nan());
        assert_eq!(t.rows[0].values[1], 0.0);
    }
}
