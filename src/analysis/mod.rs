//! Analysis stages that run on every interaction.
//!
//! Each stage is a pure function over a [`Series`]:
//! - [`filters`] restricts the series to an inclusive time range
//! - [`resample`] averages it onto a coarser time grid for charting
//! - [`charge`] integrates current over time
//! - [`statistics`] builds the per-column summary rows
//!
//! Integration and summaries take the raw (range-filtered) [`Series`]. The
//! resampled output is a separate [`resample::ResampledView`] type so it
//! cannot be handed to them.

pub mod charge;
pub mod filters;
pub mod resample;
pub mod statistics;

use std::time::Instant;

use crate::error::PipelineError;
use crate::state::{Column, Series};

/// Helper function to measure execution time
pub fn timed_analyze<F, T>(f: F) -> (T, u64)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed().as_millis() as u64;
    (result, elapsed)
}

/// Helper to get a required column or return an error
pub fn require_column<'a>(series: &'a Series, name: &str) -> Result<&'a Column, PipelineError> {
    series
        .column(name)
        .ok_or_else(|| PipelineError::UnknownColumn(name.to_string()))
}
