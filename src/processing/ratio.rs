//! Per-group totals and percentages for categorical statistics.

use std::collections::BTreeMap;

use super::nulls::count_group;
use super::table::StatsTable;

/// Prefix of per-variable total columns.
pub const TOT_PREFIX: &str = "TOT_";
/// Prefix of per-category percentage columns.
pub const PCT_PREFIX: &str = "PCT_";

/// Append `TOT_<g>` and `PCT_<g>` for every `COUNT_<g>` column (`TOT` and `PCT` for the
/// ungrouped `COUNT`).
///
/// `TOT_<g>` is the sum of `COUNT_<g>` over all categories of the row's variable (missing
/// counts are skipped), repeated on each of its rows. `PCT_<g> = COUNT_<g> / TOT_<g>`; a zero
/// total gives `NaN`.
pub fn derive_ratios(mut table: StatsTable) -> StatsTable {
    let counts: Vec<(usize, String)> = table
        .columns
        .iter()
        .enumerate()
        .filter_map(|(i, c)| count_group(c).map(|g| (i, g.to_owned())))
        .collect();

    let mut totals: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        let acc = totals
            .entry(row.variable.clone())
            .or_insert_with(|| vec![0.0; counts.len()]);
        for (slot, (i, _)) in acc.iter_mut().zip(&counts) {
            let v = row.values[*i];
            if !v.is_nan() {
                *slot += v;
            }
        }
    }

    let mut tot_cols = vec![Vec::with_capacity(table.row_count()); counts.len()];
    let mut pct_cols = vec![Vec::with_capacity(table.row_count()); counts.len()];
    for row in &table.rows {
        let tot = &totals[&row.variable];
        for (k, (i, _)) in counts.iter().enumerate() {
            tot_cols[k].push(tot[k]);
            pct_cols[k].push(ratio(row.values[*i], tot[k]));
        }
    }

    for ((_, group), values) in counts.iter().zip(tot_cols) {
        table.push_column(ratio_column(TOT_PREFIX, group), values);
    }
    for ((_, group), values) in counts.iter().zip(pct_cols) {
        table.push_column(ratio_column(PCT_PREFIX, group), values);
    }

    table
}

fn ratio_column(prefix: &str, group: &str) -> String {
    if group.is_empty() {
        prefix.trim_end_matches('_').to_owned()
    } else {
        format!("{prefix}{group}")
    }
}

fn ratio(count: f64, total: f64) -> f64 {
    if total == 0.0 {
        f64::NAN
    } else {
        count / total
    }
}

#[cfg(test)]
mod tests {
    use super::derive_ratios;
    use crate::processing::pivot::RowKey;
    use crate::processing::table::StatsTable;
    use crate::types::Value;

    fn counts() -> StatsTable {
        StatsTable::from_parts(
            true,
            vec![
                RowKey { variable: "gender".into(), category: Some(Value::Int64(0)) },
                RowKey { variable: "gender".into(), category: Some(Value::Int64(1)) },
                RowKey { variable: "smoker".into(), category: Some(Value::Int64(1)) },
            ],
            vec!["COUNT_A".into(), "COUNT_B".into()],
            vec![vec![1.0, 0.0], vec![1.0, 2.0], vec![3.0, 0.0]],
        )
    }

    #[test]
    fn totals_and_percentages_are_appended_in_order() {
        let t = derive_ratios(counts());
        assert_eq!(
            t.columns,
            vec!["COUNT_A", "COUNT_B", "TOT_A", "TOT_B", "PCT_A", "PCT_B"]
        );
        assert_eq!(t.rows[0].values, vec![1.0, 0.0, 2.0, 2.0, 0.5, 0.0]);
        assert_eq!(t.rows[1].values, vec![1.0, 2.0, 2.0, 2.0, 0.5, 1.0]);
    }

    #[test]
    fn zero_total_gives_nan_percentage() {
        let t = derive_ratios(counts());
        let smoker = t.row("smoker", Some(&Value::Int64(1))).unwrap();
        assert_eq!(smoker.values[3], 0.0);
        assert_eq!(smoker.values[4], 1.0);
        assert!(smoker.values[5].is_nan());
    }

    #[test]
    fn ungrouped_counts_get_bare_total_and_percentage() {
        let t = StatsTable::from_parts(
            true,
            vec![
                RowKey { variable: "gender".into(), category: Some(Value::Int64(0)) },
                RowKey { variable: "gender".into(), category: Some(Value::Int64(1)) },
            ],
            vec!["COUNT".into()],
            vec![vec![1.0], vec![3.0]],
        );
        let t = derive_ratios(t);
        assert_eq!(t.columns, vec!["COUNT", "TOT", "PCT"]);
        assert_eq!(t.rows[1].values, vec![3.0, 4.0, 0.75]);
    }
}
