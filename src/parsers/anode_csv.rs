//! Anode current logger CSV export parser
//!
//! The logger writes one comma-separated file per export with a header row,
//! a `DATE` column (`DD/MM/YYYY`), a `TIME` column (`HH:MM:SS`) and one column
//! per anode sensor channel (short codes such as `L6`, `B7`, `R8`), plus the
//! pre-computed rectifier zone totals and two alarm flag columns.

use csv::{ReaderBuilder, Trim};
use std::error::Error;

use super::types::{Parseable, RawTable, Value};

/// Mandatory date column (day/month/year)
pub const DATE_COLUMN: &str = "DATE";

/// Mandatory time column (hour:minute:second)
pub const TIME_COLUMN: &str = "TIME";

const UTF8_BOM: char = '\u{feff}';

/// Anode logger CSV parser
pub struct AnodeCsv;

impl Parseable for AnodeCsv {
    fn parse(
        &self,
        source: &str,
        file_contents: &str,
    ) -> Result<RawTable, Box<dyn Error + Send + Sync>> {
        let contents = file_contents.trim_start_matches(UTF8_BOM);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(contents.as_bytes());

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        for required in [DATE_COLUMN, TIME_COLUMN] {
            if !columns.iter().any(|c| c == required) {
                return Err(format!("missing required column '{}'", required).into());
            }
        }

        let width = columns.len();
        let mut rows = Vec::new();

        for (line_idx, record) in reader.records().enumerate() {
            let record = record?;

            // Blank lines come through as a single empty field
            if record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty()) {
                continue;
            }

            if record.len() > width {
                return Err(format!(
                    "expected {} fields, found {} on data line {}",
                    width,
                    record.len(),
                    line_idx + 1
                )
                .into());
            }

            let mut row: Vec<Option<Value>> = record.iter().map(Value::from_cell).collect();
            row.resize(width, None);
            rows.push(row);
        }

        tracing::debug!(
            "Parsed {}: {} columns, {} rows",
            source,
            columns.len(),
            rows.len()
        );

        Ok(RawTable {
            source: source.to_string(),
            columns,
            rows,
        })
    }
}
