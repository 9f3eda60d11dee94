use std::path::Path;

use itertools::Itertools;
use log::debug;
use rusqlite::{Connection, types::Value as SqlValue, types::ValueRef};

use crate::{data::{DATETIME_FORMAT, Value}, error::EtlError, frame::Frame};

/// Replaces the named table's full contents with the frame. Drop, create,
/// and all inserts run inside one transaction, so a failure at any point
/// leaves the previous contents untouched.
pub fn replace_table(database: &Path, table: &str, frame: &Frame) -> Result<(), EtlError> {
    let mut conn = Connection::open(database)?;
    let tx = conn.transaction()?;

    tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))?;
    let create = create_table_sql(table, frame);
    debug!("Creating destination table: {create}");
    tx.execute_batch(&create)?;

    {
        let placeholders = (1..=frame.columns().len()).map(|i| format!("?{i}")).join(", ");
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            frame.columns().iter().map(|c| quote_ident(c)).join(", "),
            placeholders
        );
        let mut stmt = tx.prepare(&insert)?;
        for row in frame.rows() {
            stmt.execute(rusqlite::params_from_iter(row.iter().map(sql_value)))?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Reads the full table back into a frame (the report read path).
pub fn load_table(database: &Path, table: &str) -> Result<Frame, EtlError> {
    let conn = Connection::open(database)?;
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(table)))?;
    let columns = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    let column_count = columns.len();

    let mut frame = Frame::new(columns);
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            cells.push(match row.get_ref(idx)? {
                ValueRef::Null => None,
                ValueRef::Integer(i) => Some(Value::Integer(i)),
                ValueRef::Real(f) => Some(Value::Float(f)),
                ValueRef::Text(text) => {
                    Some(Value::String(String::from_utf8_lossy(text).into_owned()))
                }
                ValueRef::Blob(_) => None,
            });
        }
        frame.push_row(cells);
    }
    Ok(frame)
}

fn create_table_sql(table: &str, frame: &Frame) -> String {
    let columns = frame
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| format!("{} {}", quote_ident(name), column_affinity(frame, idx)))
        .join(", ");
    format!("CREATE TABLE {} ({})", quote_ident(table), columns)
}

/// Picks a SQLite type for a column from the cells it actually holds. Any
/// textual cell forces TEXT; floats beat integers; an all-missing column
/// falls back to TEXT.
fn column_affinity(frame: &Frame, idx: usize) -> &'static str {
    let mut saw_integer = false;
    let mut saw_float = false;
    for row in frame.rows() {
        match row[idx] {
            Some(Value::String(_)) | Some(Value::DateTime(_)) => return "TEXT",
            Some(Value::Float(_)) => saw_float = true,
            Some(Value::Integer(_)) => saw_integer = true,
            None => {}
        }
    }
    if saw_float {
        "REAL"
    } else if saw_integer {
        "INTEGER"
    } else {
        "TEXT"
    }
}

fn sql_value(cell: &Option<Value>) -> SqlValue {
    match cell {
        None => SqlValue::Null,
        Some(Value::String(s)) => SqlValue::Text(s.clone()),
        Some(Value::Integer(i)) => SqlValue::Integer(*i),
        Some(Value::Float(f)) => SqlValue::Real(*f),
        Some(Value::DateTime(dt)) => SqlValue::Text(dt.format(DATETIME_FORMAT).to_string()),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
