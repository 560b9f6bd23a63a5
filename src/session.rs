//! One interactive analysis session.
//!
//! A session owns its series cache and turns an uploaded file set plus a
//! [`ViewRequest`] into a [`Dashboard`]. Every user interaction re-runs the
//! whole pass; only parsing and synthesis are cached.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::analysis::filters::filter_range_non_empty;
use crate::analysis::resample::{self, ResampledView, Timeframe};
use crate::analysis::statistics::{self, ColumnSummary};
use crate::analysis::timed_analyze;
use crate::channels::{self, ChartGroup, ColumnSets};
use crate::error::{FileError, PipelineError};
use crate::loader::UploadedFile;
use crate::state::{LoadReport, SeriesStore};

/// Parameters of one dashboard pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewRequest {
    /// Inclusive time range; the full data range when `None`
    pub range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub timeframe: Timeframe,
    /// Extra columns to chart and summarize
    pub selected: Vec<String>,
}

impl ViewRequest {
    pub fn with_range(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.range = Some((start, end));
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    pub fn with_selected<I, S>(mut self, selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = selected.into_iter().map(Into::into).collect();
        self
    }
}

/// Everything the presentation layer needs for one render
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub columns: ColumnSets,
    /// First and last timestamp of the whole combined series
    pub bounds: (NaiveDateTime, NaiveDateTime),
    /// The range actually applied
    pub range: (NaiveDateTime, NaiveDateTime),
    /// Fixed plus selected columns for the chosen range and timeframe
    pub view: ResampledView,
    pub fixed_summaries: Vec<ColumnSummary>,
    pub selected_summaries: Vec<ColumnSummary>,
    pub chart_groups: Vec<ChartGroup>,
    /// Selected names that were ignored because they are not selectable
    pub ignored_selection: Vec<String>,
    pub file_errors: Vec<FileError>,
    pub dropped_rows: usize,
}

impl Dashboard {
    pub fn summary(&self, column: &str) -> Option<&ColumnSummary> {
        self.fixed_summaries
            .iter()
            .chain(&self.selected_summaries)
            .find(|s| s.column == column)
    }
}

/// Per-user session state
#[derive(Default)]
pub struct AnalysisSession {
    store: SeriesStore,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load (or reuse) the combined series for a file set
    pub fn load(&mut self, files: &[UploadedFile]) -> Result<LoadReport, PipelineError> {
        self.store.load(files)
    }

    /// Run one full pass: load, filter, resample, summarize
    pub fn run(
        &mut self,
        files: &[UploadedFile],
        request: &ViewRequest,
    ) -> Result<Dashboard, PipelineError> {
        let report = self.load(files)?;
        let series = &report.series;

        let bounds = series.bounds().ok_or(PipelineError::NoValidTimestamps)?;
        let columns = channels::partition(series);

        let (selected, ignored_selection): (Vec<String>, Vec<String>) = request
            .selected
            .iter()
            .cloned()
            .partition(|name| columns.is_selectable(name));
        for name in &ignored_selection {
            tracing::warn!("Ignoring selection of unknown column '{}'", name);
        }

        let (start, end) = request.range.unwrap_or(bounds);
        let filtered = filter_range_non_empty(series, start, end)?;

        let mut shown = columns.fixed.clone();
        shown.extend(selected.iter().cloned());

        let (view, resample_ms) = timed_analyze(|| {
            resample::resample(&filtered.select(&shown), request.timeframe.rule())
        });
        tracing::debug!(
            "Resampled {} rows to {} ({}) in {}ms",
            filtered.len(),
            view.len(),
            request.timeframe.label(),
            resample_ms
        );

        let fixed_order = channels::summary_order(&columns.fixed);
        let (summaries, summary_ms) = timed_analyze(|| {
            Ok::<_, PipelineError>((
                statistics::summarize_all(&filtered, &fixed_order)?,
                statistics::summarize_all(&filtered, &selected)?,
            ))
        });
        let (fixed_summaries, selected_summaries) = summaries?;
        tracing::debug!(
            "Summarized {} columns in {}ms",
            fixed_summaries.len() + selected_summaries.len(),
            summary_ms
        );

        let chart_groups = channels::chart_groups(&columns.fixed);

        Ok(Dashboard {
            columns,
            bounds,
            range: (start, end),
            view,
            fixed_summaries,
            selected_summaries,
            chart_groups,
            ignored_selection,
            file_errors: report.file_errors,
            dropped_rows: report.dropped_rows,
        })
    }
}
