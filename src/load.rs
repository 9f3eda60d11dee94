use std::{fs::File, io::BufReader, path::Path};

use log::debug;

use crate::{data::Value, error::EtlError, frame::Frame};

/// Reads a delimited listings file into a [`Frame`]. Every cell comes back as
/// a string (empty cell = missing); the cleaning stages own all typing.
pub fn load_csv(path: &Path, delimiter: u8) -> Result<Frame, EtlError> {
    let file = File::open(path).map_err(|source| EtlError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|source| parse_error(path, source))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    debug!("Input headers: {headers:?}");

    let mut frame = Frame::new(headers);
    for record in reader.records() {
        let record = record.map_err(|source| parse_error(path, source))?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(Value::String(field.to_string()))
                }
            })
            .collect();
        frame.push_row(row);
    }
    Ok(frame)
}

fn parse_error(path: &Path, source: csv::Error) -> EtlError {
    EtlError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).expect("create fixture");
        file.write_all(contents.as_bytes()).expect("write fixture");
        path
    }

    #[test]
    fn loads_headers_and_treats_empty_cells_as_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_csv(&dir, "listings.csv", "brand,reviews_amount\nNike,(42)\nFila,\n");
        let frame = load_csv(&path, b',').unwrap();
        assert_eq!(frame.columns(), ["brand", "reviews_amount"]);
        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame.rows()[0][1],
            Some(Value::String("(42)".to_string()))
        );
        assert_eq!(frame.rows()[1][1], None);
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.csv");
        assert!(matches!(
            load_csv(&missing, b','),
            Err(EtlError::FileAccess { .. })
        ));
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_csv(&dir, "ragged.csv", "a,b\n1,2,3\n");
        assert!(matches!(load_csv(&path, b','), Err(EtlError::Parse { .. })));
    }
}
