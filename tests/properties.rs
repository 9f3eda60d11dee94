//! Property tests for the cleaning stages.

use proptest::prelude::*;

use mercado_etl::data::Value;
use mercado_etl::frame::Frame;
use mercado_etl::transform::{self, NUMERIC_DEFAULT_COLUMNS};

/// Builds a frame holding only the five numeric columns, with every present
/// cell as raw loader text.
fn numeric_frame(rows: &[[Option<u32>; 5]]) -> Frame {
    let mut frame = Frame::new(NUMERIC_DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect());
    for row in rows {
        frame.push_row(
            row.iter()
                .map(|cell| cell.map(|n| Value::String(n.to_string())))
                .collect(),
        );
    }
    frame
}

fn row_strategy() -> impl Strategy<Value = Vec<[Option<u32>; 5]>> {
    prop::collection::vec(prop::array::uniform5(prop::option::of(0u32..100_000)), 0..32)
}

proptest! {
    #[test]
    fn normalizer_leaves_no_missing_numeric_cells(rows in row_strategy()) {
        let frame = transform::fill_missing_numeric(numeric_frame(&rows)).unwrap();
        for column in NUMERIC_DEFAULT_COLUMNS {
            let idx = frame.column_index(column).unwrap();
            for row in frame.rows() {
                prop_assert!(matches!(row[idx], Some(Value::Float(_))));
            }
        }
    }

    #[test]
    fn normalizer_is_idempotent(rows in row_strategy()) {
        let once = transform::fill_missing_numeric(numeric_frame(&rows)).unwrap();
        let twice = transform::fill_missing_numeric(once.clone()).unwrap();
        prop_assert_eq!(once.rows(), twice.rows());
    }

    #[test]
    fn reconstructed_prices_are_non_negative(rows in row_strategy()) {
        let frame = transform::fill_missing_numeric(numeric_frame(&rows)).unwrap();
        let frame = transform::reconstruct_prices(frame).unwrap();
        for column in ["old_price", "new_price"] {
            let idx = frame.column_index(column).unwrap();
            for row in frame.rows() {
                match &row[idx] {
                    Some(Value::Float(price)) => prop_assert!(*price >= 0.0),
                    other => prop_assert!(false, "expected float price, got {other:?}"),
                }
            }
        }
    }
}
