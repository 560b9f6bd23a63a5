//! Time range filtering.

use chrono::NaiveDateTime;

use crate::error::PipelineError;
use crate::state::Series;

/// Rows with timestamp in `[start, end]`, both ends inclusive.
///
/// `start > end` is an input error. A valid range with no rows in it gives an
/// empty series; callers report that separately.
pub fn filter_range(
    series: &Series,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Series, PipelineError> {
    if start > end {
        return Err(PipelineError::InvalidRange { start, end });
    }

    let timestamps = series.timestamps();
    let first = timestamps.partition_point(|ts| *ts < start);
    let last = timestamps.partition_point(|ts| *ts <= end);

    tracing::debug!(
        "Range {} .. {} selects {} of {} rows",
        start,
        end,
        last.saturating_sub(first),
        series.len()
    );

    Ok(series.slice(first, last))
}

/// Like [`filter_range`], but an empty result is reported as
/// [`PipelineError::EmptyRange`]
pub fn filter_range_non_empty(
    series: &Series,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Series, PipelineError> {
    let filtered = filter_range(series, start, end)?;
    if filtered.is_empty() {
        return Err(PipelineError::EmptyRange { start, end });
    }
    Ok(filtered)
}
