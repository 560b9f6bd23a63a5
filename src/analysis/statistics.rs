//! Per-column summary statistics.
//!
//! Provides the summary row shown for every fixed and selected column:
//! charge, average current and the observed current range.

use serde::Serialize;

use super::charge;
use super::require_column;
use crate::error::PipelineError;
use crate::state::Series;

/// Observed range of the present readings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DescriptiveStats {
    pub min: f64,
    pub max: f64,
}

/// Compute descriptive statistics, skipping absent readings.
/// Returns `None` when there is nothing to describe.
pub fn compute_descriptive_stats(values: &[Option<f64>]) -> Option<DescriptiveStats> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }

    let min = present.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = present.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    Some(DescriptiveStats { min, max })
}

/// Summary row for one column
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub coulombs: f64,
    pub amp_hours: f64,
    pub avg_current: f64,
    /// Lowest reading; absent when the column has no readings in range
    pub min: Option<f64>,
    /// Highest reading; absent when the column has no readings in range
    pub max: Option<f64>,
}

/// Summarize one column of a raw, range-filtered series
pub fn summarize(series: &Series, column: &str) -> Result<ColumnSummary, PipelineError> {
    let values = &require_column(series, column)?.values;
    let charge = charge::integrate(series, column)?;
    let stats = compute_descriptive_stats(values);

    Ok(ColumnSummary {
        column: column.to_string(),
        coulombs: charge.coulombs,
        amp_hours: charge.amp_hours,
        avg_current: charge.avg_current,
        min: stats.as_ref().map(|s| s.min),
        max: stats.as_ref().map(|s| s.max),
    })
}

/// Summarize several columns, in the order given
pub fn summarize_all(
    series: &Series,
    columns: &[String],
) -> Result<Vec<ColumnSummary>, PipelineError> {
    columns.iter().map(|c| summarize(series, c)).collect()
}
