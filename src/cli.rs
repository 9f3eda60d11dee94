use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean scraped Mercado Livre listings into SQLite and report on them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean a scraped listings CSV and replace the destination table with it
    Transform(TransformArgs),
    /// Summarize the persisted listings table
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Input CSV file of scraped listings
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// SQLite database file (created if absent)
    #[arg(short = 'd', long = "database")]
    pub database: PathBuf,
    /// Destination table name, fully replaced on every run
    #[arg(short = 't', long = "table", default_value = "mercadolivre_items")]
    pub table: String,
    /// Source URL recorded in the `_source` column of every row
    #[arg(
        long = "source-url",
        default_value = "https://lista.mercadolivre.com.br/tenis-corrida-masculino"
    )]
    pub source_url: String,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter, default_value = ",")]
    pub delimiter: u8,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// SQLite database file written by the transform step
    #[arg(short = 'd', long = "database")]
    pub database: PathBuf,
    /// Table to summarize
    #[arg(short = 't', long = "table", default_value = "mercadolivre_items")]
    pub table: String,
    /// Emit the summary as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
