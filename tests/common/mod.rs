//! Common test utilities shared across all test modules
//!
//! Builders for synthetic logger exports and float comparison helpers.

#![allow(dead_code)]

use anodelog::loader::UploadedFile;
use chrono::{NaiveDate, NaiveDateTime};

/// Default tolerance for float comparisons
pub const EPSILON: f64 = 1e-9;

/// Compare two floats within [`EPSILON`]
pub fn float_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Assert two floats are equal within [`EPSILON`], with a readable message
pub fn assert_float_eq(actual: f64, expected: f64, what: &str) {
    assert!(
        float_eq(actual, expected),
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

/// Timestamp on 2025-01-01 at the given hour, minute, second
pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// Synthetic logger export builder
pub mod synthetic {
    use super::*;

    /// CSV text in the logger's layout: DATE and TIME first, then channels
    pub struct CsvBuilder {
        columns: Vec<String>,
        rows: Vec<String>,
    }

    impl CsvBuilder {
        pub fn new(channels: &[&str]) -> Self {
            let mut columns = vec!["DATE".to_string(), "TIME".to_string()];
            columns.extend(channels.iter().map(|c| c.to_string()));
            Self {
                columns,
                rows: Vec::new(),
            }
        }

        /// Add a row with raw DATE and TIME text and raw cell text
        pub fn raw_row(mut self, date: &str, time: &str, cells: &[&str]) -> Self {
            let mut fields = vec![date.to_string(), time.to_string()];
            fields.extend(cells.iter().map(|c| c.to_string()));
            self.rows.push(fields.join(","));
            self
        }

        /// Add a row on 2025-01-01 with numeric readings; `None` leaves the cell empty
        pub fn row(self, time: &str, readings: &[Option<f64>]) -> Self {
            let cells: Vec<String> = readings
                .iter()
                .map(|r| r.map(|v| v.to_string()).unwrap_or_default())
                .collect();
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            self.raw_row("01/01/2025", time, &cells)
        }

        pub fn build(&self) -> String {
            let mut text = self.columns.join(",");
            text.push('\n');
            for row in &self.rows {
                text.push_str(row);
                text.push('\n');
            }
            text
        }

        pub fn upload(&self, name: &str) -> UploadedFile {
            UploadedFile::new(name, self.build())
        }
    }

    /// A file with `count` rows every `step` seconds from midnight, each
    /// channel reading a constant current
    pub fn constant_file(name: &str, channels: &[(&str, f64)], count: u32, step: u32) -> UploadedFile {
        let names: Vec<&str> = channels.iter().map(|(n, _)| *n).collect();
        let readings: Vec<Option<f64>> = channels.iter().map(|(_, v)| Some(*v)).collect();
        let mut builder = CsvBuilder::new(&names);
        for i in 0..count {
            let secs = i * step;
            let time = format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60);
            builder = builder.row(&time, &readings);
        }
        builder.upload(name)
    }
}
