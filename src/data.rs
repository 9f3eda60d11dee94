use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used for `_data_coleta` in the destination table.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single typed cell of the in-memory dataset. Loader output is all
/// `String`; the cleaning stages coerce cells into `Integer`/`Float`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        }
    }

    /// Numeric view of the cell, if it has one. `String` cells parse their
    /// trimmed text, so re-running a coercion stage on its own output is a
    /// no-op.
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Value::String(s) => s.trim().parse().ok(),
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::DateTime(_) => None,
        }
    }

    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Value::String(s) => s.trim().parse().ok(),
            Value::Integer(i) => Some(*i),
            Value::Float(f) => {
                if f.fract() == 0.0 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            Value::DateTime(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}
