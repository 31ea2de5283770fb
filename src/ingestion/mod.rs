//! Reading cohort tables from disk.
//!
//! Only CSV is supported: prepared real cohorts and generated synthetic cohorts are both
//! exchanged as CSV. See [`csv`] for typed ingestion and schema inference.

pub mod csv;

pub use self::csv::{
    infer_schema_from_path, infer_schema_from_reader, ingest_csv_from_path, ingest_csv_from_reader,
    ingest_csv_inferred,
};
