use serde::Serialize;
use std::error::Error;
use std::fmt;

/// Cell text read as a missing reading, as exported by loggers and spreadsheets
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single cell of an uploaded table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Type a raw cell. Numeric text becomes a number; empty text and the
    /// usual spreadsheet missing-value markers are absent.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let trimmed = cell.trim();
        if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
            return None;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_nan() => None,
            Ok(n) => Some(Value::Number(n)),
            Err(_) => Some(Value::Text(cell.to_string())),
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One parsed upload: trimmed header names and one row of cells per data line.
///
/// Every row has exactly `columns.len()` cells; missing trailing cells are `None`.
#[derive(Clone, Debug, Default)]
pub struct RawTable {
    /// Name of the file this table came from
    pub source: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

impl RawTable {
    /// Find column index by name
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Trait for uploaded file parsers
pub trait Parseable {
    fn parse(&self, source: &str, data: &str) -> Result<RawTable, Box<dyn Error + Send + Sync>>;
}
