use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for the pipeline. Any variant aborts the run before the
/// destination table is touched; the table replace in `store` is the only
/// write and happens last.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("cannot open input file {path:?}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV content in {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("column '{column}' not found in dataset")]
    MissingColumn { column: String },
    #[error("cannot coerce '{value}' (column '{column}', row {row}) to {target}")]
    TypeCoercion {
        column: String,
        row: usize,
        value: String,
        target: &'static str,
    },
    #[error("database operation failed")]
    Storage(#[from] rusqlite::Error),
}
