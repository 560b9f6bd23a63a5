//! Combined series store.
//!
//! This module holds the time-indexed table that every later stage reads from,
//! and the per-session cache that avoids re-parsing an unchanged file set.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;

use crate::computed;
use crate::error::{FileError, PipelineError};
use crate::loader::{self, UploadedFile};
use crate::normalize::{self, NormalizedTable};

// ============================================================================
// Core Types
// ============================================================================

/// A named numeric column. `None` marks a row without a reading.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Present values only
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }
}

/// Time-ordered rows of numeric columns keyed by timestamp
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Series {
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl Series {
    /// Build a series. Timestamps must be non-decreasing and every column must
    /// have one value per timestamp.
    pub fn new(timestamps: Vec<NaiveDateTime>, columns: Vec<Column>) -> Self {
        debug_assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
        debug_assert!(columns.iter().all(|c| c.values.len() == timestamps.len()));
        Self {
            timestamps,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// First and last timestamp
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }

    /// Append a column, replacing any existing column of the same name
    pub fn set_column(&mut self, column: Column) {
        debug_assert_eq!(column.values.len(), self.timestamps.len());
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Rows `start..end` as a new series
    pub fn slice(&self, start: usize, end: usize) -> Series {
        let end = end.min(self.len());
        let start = start.min(end);
        Series {
            timestamps: self.timestamps[start..end].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.values[start..end].to_vec()))
                .collect(),
        }
    }

    /// Keep only the named columns, in the order given. Unknown names are skipped.
    pub fn select(&self, names: &[String]) -> Series {
        Series {
            timestamps: self.timestamps.clone(),
            columns: names
                .iter()
                .filter_map(|n| self.column(n).cloned())
                .collect(),
        }
    }

    /// Build the numeric series from a normalized table.
    ///
    /// A column is numeric when every present cell is a number; text and
    /// mixed columns (DATE, TIME, alarm flags) are left out.
    pub fn from_normalized(table: &NormalizedTable) -> Series {
        let columns = table
            .columns
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                let mut values = Vec::with_capacity(table.rows.len());
                for cell in table.column_cells(idx) {
                    match cell {
                        None => values.push(None),
                        Some(v) => values.push(Some(v.as_f64()?)),
                    }
                }
                Some(Column::new(name.clone(), values))
            })
            .collect();

        Series::new(table.timestamps.clone(), columns)
    }
}

// ============================================================================
// Store
// ============================================================================

/// Identity of an uploaded file set: name, size and content hash per file,
/// in upload order
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileSetKey(Vec<(String, usize, u64)>);

impl FileSetKey {
    pub fn of(files: &[UploadedFile]) -> Self {
        Self(
            files
                .iter()
                .map(|f| (f.name.clone(), f.contents.len(), f.content_hash()))
                .collect(),
        )
    }
}

/// Result of loading a file set
#[derive(Clone, Debug)]
pub struct LoadReport {
    /// The combined series, shared with the cache
    pub series: Arc<Series>,
    /// Files skipped during parsing
    pub file_errors: Vec<FileError>,
    /// Rows dropped for unparseable timestamps
    pub dropped_rows: usize,
    /// True when the series came from the cache
    pub cached: bool,
}

/// Build the combined series for a file set: parse, normalize, synthesize
pub fn build_series(files: &[UploadedFile]) -> Result<LoadReport, PipelineError> {
    let batch = loader::parse_batch(files);

    if batch.tables.is_empty() {
        return Err(PipelineError::NoFilesParsed {
            errors: batch.errors,
        });
    }

    let normalized = normalize::normalize(&batch.tables);
    if normalized.is_empty() {
        return Err(PipelineError::NoValidTimestamps);
    }

    let mut series = Series::from_normalized(&normalized);
    computed::synthesize(&mut series);

    tracing::info!(
        "Combined {} of {} files into {} rows, {} columns",
        batch.tables.len(),
        files.len(),
        series.len(),
        series.columns().len()
    );

    Ok(LoadReport {
        series: Arc::new(series),
        file_errors: batch.errors,
        dropped_rows: normalized.dropped_rows,
        cached: false,
    })
}

/// Per-session cache of the last combined series
#[derive(Default)]
pub struct SeriesStore {
    cached: Option<(FileSetKey, LoadReport)>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the combined series for `files`, rebuilding only when the file
    /// set differs from the last successful load. Failed loads are not cached
    /// and leave the previous entry intact.
    pub fn load(&mut self, files: &[UploadedFile]) -> Result<LoadReport, PipelineError> {
        let key = FileSetKey::of(files);

        if let Some((cached_key, report)) = &self.cached {
            if *cached_key == key {
                tracing::debug!("File set unchanged, reusing combined series");
                return Ok(LoadReport {
                    cached: true,
                    ..report.clone()
                });
            }
        }

        let report = build_series(files)?;
        self.cached = Some((key, report.clone()));
        Ok(report)
    }
}
