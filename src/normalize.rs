//! Table concatenation and timestamp normalization.
//!
//! Uploaded tables are concatenated by column-name union, then each row gets an
//! absolute timestamp built from its `DATE` and `TIME` cells. Rows whose
//! timestamp does not parse under the fixed day-first layout are dropped, and
//! the survivors are sorted by time.

use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};

use crate::parsers::anode_csv::{DATE_COLUMN, TIME_COLUMN};
use crate::parsers::{RawTable, Value};

/// Layout of `"<DATE> <TIME>"`, day first
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Concatenated, time-sorted rows with their timestamps
#[derive(Clone, Debug, Default)]
pub struct NormalizedTable {
    /// Union of all column names, in first-seen order
    pub columns: Vec<String>,
    /// One timestamp per row, non-decreasing
    pub timestamps: Vec<NaiveDateTime>,
    /// Cells aligned to `columns`
    pub rows: Vec<Vec<Option<Value>>>,
    /// Rows discarded because their timestamp did not parse
    pub dropped_rows: usize,
}

impl NormalizedTable {
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Iterate one column's cells
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows.iter().map(move |row| row.get(index).and_then(|c| c.as_ref()))
    }
}

/// Parse a DATE and TIME pair under [`TIMESTAMP_FORMAT`]
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let combined = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&combined, TIMESTAMP_FORMAT).ok()
}

/// Union of column names across tables, in first-seen order
pub fn union_columns(tables: &[RawTable]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut columns = Vec::new();
    for table in tables {
        for name in &table.columns {
            if seen.insert(name.as_str()) {
                columns.push(name.clone());
            }
        }
    }
    columns
}

/// Concatenate tables, attach timestamps, drop unparseable rows and sort by time
pub fn normalize(tables: &[RawTable]) -> NormalizedTable {
    let columns = union_columns(tables);
    let index_of: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut stamped: Vec<(NaiveDateTime, Vec<Option<Value>>)> = Vec::new();
    let mut dropped_rows = 0;

    for table in tables {
        // Position of each of this table's columns in the union
        let mapping: Vec<usize> = table
            .columns
            .iter()
            .filter_map(|c| index_of.get(c.as_str()).copied())
            .collect();
        let date_idx = table.find_column(DATE_COLUMN);
        let time_idx = table.find_column(TIME_COLUMN);

        for row in &table.rows {
            let cell_text = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .and_then(|c| c.as_ref())
                    .map(Value::as_text)
            };

            let timestamp = match (cell_text(date_idx), cell_text(time_idx)) {
                (Some(date), Some(time)) => parse_timestamp(&date, &time),
                _ => None,
            };

            let Some(timestamp) = timestamp else {
                dropped_rows += 1;
                continue;
            };

            let mut aligned: Vec<Option<Value>> = vec![None; columns.len()];
            for (src, &dst) in mapping.iter().enumerate() {
                aligned[dst] = row.get(src).cloned().flatten();
            }
            stamped.push((timestamp, aligned));
        }
    }

    // Stable, so equal timestamps keep upload order
    stamped.sort_by_key(|(ts, _)| *ts);

    if dropped_rows > 0 {
        tracing::debug!("Dropped {} rows with unparseable timestamps", dropped_rows);
    }

    let (timestamps, rows) = stamped.into_iter().unzip();

    NormalizedTable {
        columns,
        timestamps,
        rows,
        dropped_rows,
    }
}
