use std::sync::OnceLock;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::info;
use regex::Regex;

use crate::{
    cli::TransformArgs,
    config::PipelineConfig,
    data::Value,
    error::EtlError,
    frame::Frame,
    load, store,
};

/// Columns whose missing values default to zero and which must be floats
/// before price reconstruction.
pub const NUMERIC_DEFAULT_COLUMNS: [&str; 5] = [
    "old_price_reais",
    "old_price_centavos",
    "new_price_reais",
    "new_price_centavos",
    "reviews_rating_number",
];

/// Raw price component columns, dropped once `old_price`/`new_price` exist.
pub const PRICE_COMPONENT_COLUMNS: [&str; 4] = [
    "old_price_reais",
    "old_price_centavos",
    "new_price_reais",
    "new_price_centavos",
];

pub const REVIEWS_AMOUNT_COLUMN: &str = "reviews_amount";
pub const SOURCE_COLUMN: &str = "_source";
pub const COLLECTED_AT_COLUMN: &str = "_data_coleta";

pub fn execute(args: &TransformArgs) -> Result<()> {
    let config = PipelineConfig::from(args);
    run(&config).with_context(|| {
        format!(
            "Transforming {:?} into table '{}' of {:?}",
            config.input, config.table, config.database
        )
    })
}

/// Runs the whole pipeline once: load, annotate, normalize, clean review
/// counts, reconstruct prices, prune components, replace the table. Any
/// failure aborts before the single write at the end, so the prior table
/// contents survive every upstream error.
pub fn run(config: &PipelineConfig) -> Result<(), EtlError> {
    info!(
        "Loading listings from '{}' (delimiter '{}')",
        config.input.display(),
        config.delimiter as char
    );
    let frame = load::load_csv(&config.input, config.delimiter)?;
    info!(
        "Loaded {} listing(s) across {} column(s)",
        frame.len(),
        frame.columns().len()
    );

    let collected_at = Local::now().naive_local();
    let frame = annotate_provenance(frame, &config.source_url, collected_at);
    let frame = fill_missing_numeric(frame)?;
    let frame = clean_review_amount(frame)?;
    let frame = reconstruct_prices(frame)?;
    let frame = drop_price_components(frame)?;

    store::replace_table(&config.database, &config.table, &frame)?;
    info!(
        "Replaced table '{}' in {:?} with {} row(s)",
        config.table,
        config.database,
        frame.len()
    );
    Ok(())
}

/// Stamps every row with the scrape source URL and a single collection
/// timestamp captured once for the whole batch.
pub fn annotate_provenance(
    mut frame: Frame,
    source_url: &str,
    collected_at: NaiveDateTime,
) -> Frame {
    frame.add_constant_column(SOURCE_COLUMN, Value::String(source_url.to_string()));
    frame.add_constant_column(COLLECTED_AT_COLUMN, Value::DateTime(collected_at));
    frame
}

/// Defaults missing cells in the fixed numeric column list to `0.0` and
/// coerces everything in those columns to floats. Idempotent: floats pass
/// through unchanged.
pub fn fill_missing_numeric(mut frame: Frame) -> Result<Frame, EtlError> {
    for column in NUMERIC_DEFAULT_COLUMNS {
        let idx = frame.require_column(column)?;
        for (row_idx, row) in frame.rows_mut().iter_mut().enumerate() {
            let coerced = match row[idx].take() {
                None => 0.0,
                Some(value) => value
                    .to_float()
                    .ok_or_else(|| coercion_error(column, row_idx, &value, "float"))?,
            };
            row[idx] = Some(Value::Float(coerced));
        }
    }
    Ok(frame)
}

fn brackets() -> &'static Regex {
    static BRACKETS: OnceLock<Regex> = OnceLock::new();
    BRACKETS.get_or_init(|| Regex::new(r"[()]").expect("bracket pattern compiles"))
}

/// Strips the decorative parentheses from `reviews_amount` and coerces it to
/// an integer; missing cells (including ones that strip down to nothing)
/// become `0`. Residual non-numeric text is a hard failure rather than a
/// silent zero.
pub fn clean_review_amount(mut frame: Frame) -> Result<Frame, EtlError> {
    let idx = frame.require_column(REVIEWS_AMOUNT_COLUMN)?;
    for (row_idx, row) in frame.rows_mut().iter_mut().enumerate() {
        let count = match row[idx].take() {
            None => 0,
            Some(Value::Integer(n)) => n,
            Some(value) => {
                let raw = value.as_display();
                let stripped = brackets().replace_all(&raw, "");
                let stripped = stripped.trim();
                if stripped.is_empty() {
                    0
                } else {
                    stripped.parse::<i64>().map_err(|_| {
                        coercion_error(REVIEWS_AMOUNT_COLUMN, row_idx, &value, "integer")
                    })?
                }
            }
        };
        row[idx] = Some(Value::Integer(count));
    }
    Ok(frame)
}

/// Combines the reais/centavos pairs into decimal `old_price` and
/// `new_price` columns. Runs after normalization, so the component cells are
/// all present and numeric.
pub fn reconstruct_prices(mut frame: Frame) -> Result<Frame, EtlError> {
    let old = combined_price(&frame, "old_price_reais", "old_price_centavos")?;
    let new = combined_price(&frame, "new_price_reais", "new_price_centavos")?;
    frame.add_column("old_price", old);
    frame.add_column("new_price", new);
    Ok(frame)
}

fn combined_price(
    frame: &Frame,
    reais: &str,
    centavos: &str,
) -> Result<Vec<Option<Value>>, EtlError> {
    let reais_idx = frame.require_column(reais)?;
    let centavos_idx = frame.require_column(centavos)?;
    frame
        .rows()
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let whole = float_cell(&row[reais_idx], reais, row_idx)?;
            let cents = float_cell(&row[centavos_idx], centavos, row_idx)?;
            Ok(Some(Value::Float(whole + cents / 100.0)))
        })
        .collect()
}

fn float_cell(cell: &Option<Value>, column: &str, row_idx: usize) -> Result<f64, EtlError> {
    let value = cell
        .as_ref()
        .ok_or_else(|| EtlError::TypeCoercion {
            column: column.to_string(),
            row: row_idx + 2,
            value: String::new(),
            target: "float",
        })?;
    value
        .to_float()
        .ok_or_else(|| coercion_error(column, row_idx, value, "float"))
}

/// Prunes the four raw price component columns from the final schema.
pub fn drop_price_components(mut frame: Frame) -> Result<Frame, EtlError> {
    frame.drop_columns(&PRICE_COMPONENT_COLUMNS)?;
    Ok(frame)
}

fn coercion_error(column: &str, row_idx: usize, value: &Value, target: &'static str) -> EtlError {
    // Rows are reported 1-based counting the header line, matching how the
    // input file reads in an editor.
    EtlError::TypeCoercion {
        column: column.to_string(),
        row: row_idx + 2,
        value: value.as_display(),
        target,
    }
}
