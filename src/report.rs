use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::{cli::ReportArgs, data::Value, error::EtlError, frame::Frame, store, table};

const BRAND_COLUMN: &str = "brand";
const NEW_PRICE_COLUMN: &str = "new_price";
const RATING_COLUMN: &str = "reviews_rating_number";

/// Descriptive statistics over the persisted listings table, mirroring the
/// scrape dashboard's headline numbers.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_listings: usize,
    pub distinct_brands: usize,
    pub mean_new_price: Option<f64>,
    pub brands: Vec<BrandBreakdown>,
}

/// Per-brand listing count, mean price, and mean rating. Zero-valued prices
/// and ratings are scrape artifacts (defaulted missing fields) and are
/// excluded from the means, not from the count.
#[derive(Debug, Serialize)]
pub struct BrandBreakdown {
    pub brand: String,
    pub listings: usize,
    pub mean_new_price: Option<f64>,
    pub mean_rating: Option<f64>,
}

#[derive(Default)]
struct BrandAccumulator {
    listings: usize,
    price_sum: f64,
    priced: usize,
    rating_sum: f64,
    rated: usize,
}

pub fn execute(args: &ReportArgs) -> Result<()> {
    if !args.database.exists() {
        return Err(anyhow!(
            "database {:?} does not exist; run the transform step first",
            args.database
        ));
    }
    let frame = store::load_table(&args.database, &args.table)
        .with_context(|| format!("Reading table '{}' from {:?}", args.table, args.database))?;
    info!(
        "Loaded {} row(s) from table '{}'",
        frame.len(),
        args.table
    );
    let summary = summarize(&frame)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render(&summary);
    }
    Ok(())
}

pub fn summarize(frame: &Frame) -> Result<Summary, EtlError> {
    let brand_idx = frame.require_column(BRAND_COLUMN)?;
    let price_idx = frame.require_column(NEW_PRICE_COLUMN)?;
    let rating_idx = frame.require_column(RATING_COLUMN)?;

    let mut price_sum = 0.0;
    let mut price_count = 0usize;
    let mut per_brand: HashMap<String, BrandAccumulator> = HashMap::new();

    for row in frame.rows() {
        let price = row[price_idx].as_ref().and_then(Value::to_float);
        if let Some(price) = price {
            price_sum += price;
            price_count += 1;
        }
        // Rows without a brand are skipped in the per-brand view, like a
        // frequency count over non-missing values.
        let Some(brand) = row[brand_idx].as_ref() else {
            continue;
        };
        let entry = per_brand.entry(brand.as_display()).or_default();
        entry.listings += 1;
        if let Some(price) = price.filter(|p| *p > 0.0) {
            entry.price_sum += price;
            entry.priced += 1;
        }
        if let Some(rating) = row[rating_idx]
            .as_ref()
            .and_then(Value::to_float)
            .filter(|r| *r > 0.0)
        {
            entry.rating_sum += rating;
            entry.rated += 1;
        }
    }

    let distinct_brands = per_brand.len();
    let brands = per_brand
        .into_iter()
        .map(|(brand, acc)| BrandBreakdown {
            brand,
            listings: acc.listings,
            mean_new_price: (acc.priced > 0).then(|| acc.price_sum / acc.priced as f64),
            mean_rating: (acc.rated > 0).then(|| acc.rating_sum / acc.rated as f64),
        })
        .sorted_by(|a, b| b.listings.cmp(&a.listings).then(a.brand.cmp(&b.brand)))
        .collect();

    Ok(Summary {
        total_listings: frame.len(),
        distinct_brands,
        mean_new_price: (price_count > 0).then(|| price_sum / price_count as f64),
        brands,
    })
}

fn render(summary: &Summary) {
    let kpi_headers = vec!["metric".to_string(), "value".to_string()];
    let kpi_rows = vec![
        vec!["total_listings".to_string(), summary.total_listings.to_string()],
        vec![
            "distinct_brands".to_string(),
            summary.distinct_brands.to_string(),
        ],
        vec![
            "mean_new_price".to_string(),
            format_mean(summary.mean_new_price),
        ],
    ];
    table::print_table(&kpi_headers, &kpi_rows);

    println!();
    let brand_headers = vec![
        "brand".to_string(),
        "listings".to_string(),
        "mean_new_price".to_string(),
        "mean_rating".to_string(),
    ];
    let brand_rows = summary
        .brands
        .iter()
        .map(|b| {
            vec![
                b.brand.clone(),
                b.listings.to_string(),
                format_mean(b.mean_new_price),
                format_mean(b.mean_rating),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&brand_headers, &brand_rows);
}

fn format_mean(mean: Option<f64>) -> String {
    mean.map(|m| format!("{m:.2}")).unwrap_or_default()
}
