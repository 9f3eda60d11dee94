//! Integration tests for the report subcommand over a freshly transformed
//! table.

mod common;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

use common::{SAMPLE_LISTINGS, TestWorkspace};

fn prepare_database(ws: &TestWorkspace) -> std::path::PathBuf {
    let input = ws.write("listings.csv", SAMPLE_LISTINGS);
    let database = ws.join("listings.db");
    Command::cargo_bin("mercado-etl")
        .expect("binary exists")
        .args([
            "transform",
            "-i",
            input.to_str().unwrap(),
            "-d",
            database.to_str().unwrap(),
        ])
        .assert()
        .success();
    database
}

#[test]
fn report_renders_kpis_and_brand_breakdown() {
    let ws = TestWorkspace::new();
    let database = prepare_database(&ws);

    Command::cargo_bin("mercado-etl")
        .expect("binary exists")
        .args(["report", "-d", database.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            contains("total_listings")
                .and(contains("distinct_brands"))
                .and(contains("mean_rating"))
                .and(contains("Nike"))
                .and(contains("Olympikus")),
        );
}

#[test]
fn report_json_is_machine_readable() {
    let ws = TestWorkspace::new();
    let database = prepare_database(&ws);

    let output = Command::cargo_bin("mercado-etl")
        .expect("binary exists")
        .args(["report", "-d", database.to_str().unwrap(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value =
        serde_json::from_slice(&output).expect("report --json emits valid JSON");
    assert_eq!(summary["total_listings"], 3);
    assert_eq!(summary["distinct_brands"], 3);
    let brands = summary["brands"].as_array().expect("brands array");
    assert_eq!(brands.len(), 3);
    let fila = brands
        .iter()
        .find(|b| b["brand"] == "Fila")
        .expect("Fila present");
    let fila_rating = fila["mean_rating"].as_f64().expect("Fila rating");
    assert!((fila_rating - 4.2).abs() < 1e-9);
    // Nike's only listing had no rating in the scrape, so after the
    // zero-default it carries no satisfaction figure.
    let nike = brands
        .iter()
        .find(|b| b["brand"] == "Nike")
        .expect("Nike present");
    assert!(nike["mean_rating"].is_null());
}

#[test]
fn report_on_missing_database_fails_with_guidance() {
    let ws = TestWorkspace::new();

    Command::cargo_bin("mercado-etl")
        .expect("binary exists")
        .args(["report", "-d", ws.join("absent.db").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("run the transform step first"));
}
