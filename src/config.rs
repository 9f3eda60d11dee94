use std::path::PathBuf;

use crate::cli::TransformArgs;

/// Fixed per-run configuration for the transform pipeline. Everything the
/// scrape job used to hard-code lives here and is passed explicitly into
/// [`crate::transform::run`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub database: PathBuf,
    pub table: String,
    pub source_url: String,
    pub delimiter: u8,
}

impl From<&TransformArgs> for PipelineConfig {
    fn from(args: &TransformArgs) -> Self {
        PipelineConfig {
            input: args.input.clone(),
            database: args.database.clone(),
            table: args.table.clone(),
            source_url: args.source_url.clone(),
            delimiter: args.delimiter,
        }
    }
}
