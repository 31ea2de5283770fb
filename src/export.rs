//! Writing statistics tables as CSV.
//!
//! Tables go through [`StatsTable::to_dataset`]: a `Variable` column, a `Category` column for
//! categorical tables, then one column per statistic. Missing cells are written empty.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::EvalResult;
use crate::processing::StatsTable;
use crate::types::{DataSet, Value};

/// Write `table` to `writer` as CSV with a header row.
pub fn write_stats_csv<W: Write>(table: &StatsTable, writer: W) -> EvalResult<()> {
    write_dataset_csv(&table.to_dataset(), writer)
}

/// Write `table` to a CSV file at `path`, replacing any existing file.
pub fn write_stats_csv_to_path(table: &StatsTable, path: impl AsRef<Path>) -> EvalResult<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_stats_csv(table, std::io::BufWriter::new(file))?;
    debug!(path = %path.display(), rows = table.row_count(), "wrote stats csv");
    Ok(())
}

/// Write `dataset` to `writer` as CSV, with the schema field names as header.
///
/// `Null` cells are written empty; floats use their shortest form (`2`, `0.5`).
pub fn write_dataset_csv<W: Write>(dataset: &DataSet, writer: W) -> EvalResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(format_cell))?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Float64(x) if x.is_nan() => String::new(),
        Value::Float64(x) => x.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{write_dataset_csv, write_stats_csv};
    use crate::config::StatsConfig;
    use crate::stats::{categorical_stats, numerical_stats};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn cohort() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("PTID", DataType::Int64),
            Field::new("smoker", DataType::Int64),
            Field::new("age", DataType::Float64),
            Field::new("type", DataType::Utf8),
        ]);
        let rows = vec![
            vec![Value::Int64(1), Value::Int64(1), Value::Float64(60.0), Value::Utf8("real".into())],
            vec![Value::Int64(2), Value::Int64(0), Value::Float64(70.0), Value::Utf8("real".into())],
            vec![Value::Int64(3), Value::Int64(1), Value::Null, Value::Utf8("synth".into())],
        ];
        DataSet::new(schema, rows)
    }

    fn render(table: &crate::processing::StatsTable) -> String {
        let mut buf = Vec::new();
        write_stats_csv(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn categorical_table_has_category_column() {
        let t = categorical_stats(&cohort(), &["smoker".to_string()], &StatsConfig::default())
            .unwrap();
        let out = render(&t);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("Variable,Category,COUNT_REAL,COUNT_SYNTH,TOT_REAL,TOT_SYNTH,PCT_REAL,PCT_SYNTH")
        );
        assert_eq!(lines.next(), Some("smoker,1,1,1,2,1,0.5,1"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn nan_cells_are_written_empty() {
        let t = numerical_stats(&cohort(), &["age".to_string()], &StatsConfig::default()).unwrap();
        let out = render(&t);
        let data = out.lines().nth(1).unwrap();
        // synth has no observed age: every statistic but the count is empty
        assert!(data.starts_with("age,65,,"), "{data}");
        assert!(data.ends_with(",2,0"), "{data}");
    }

    #[test]
    fn dataset_nulls_and_floats_are_rendered_plainly() {
        let schema = Schema::new(vec![
            Field::new("PTID", DataType::Int64),
            Field::new("age", DataType::Float64),
            Field::new("type", DataType::Utf8),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Float64(2.0), Value::Utf8("real".into())],
                vec![Value::Int64(2), Value::Null, Value::Utf8("synth".into())],
            ],
        );
        let mut buf = Vec::new();
        write_dataset_csv(&ds, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "PTID,age,type\n1,2,real\n2,,synth\n"
        );
    }
}
