//! Charge integration.
//!
//! Column values are treated as instantaneous current in amperes at their
//! timestamps. Charge is the trapezoidal integral of current over elapsed
//! seconds, measured from the first row of the supplied series.

use serde::Serialize;

use super::require_column;
use crate::error::PipelineError;
use crate::state::Series;

/// Seconds per hour, for coulomb to ampere-hour conversion
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Charge figures for one column
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Charge {
    /// Ampere-seconds
    pub coulombs: f64,
    pub amp_hours: f64,
    /// Charge divided by the span of the series, in amperes
    pub avg_current: f64,
}

impl Charge {
    pub fn from_coulombs(coulombs: f64, span_seconds: f64) -> Self {
        let avg_current = if span_seconds > 0.0 {
            coulombs / span_seconds
        } else {
            0.0
        };
        Self {
            coulombs,
            amp_hours: coulombs / SECONDS_PER_HOUR,
            avg_current,
        }
    }
}

/// Trapezoidal integral of `y` over `x`
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// Integrate one column of a raw series.
///
/// Rows without a reading are skipped. A series of zero or one row, or one
/// whose rows all share a timestamp, gives zero charge and zero average.
pub fn integrate(series: &Series, column: &str) -> Result<Charge, PipelineError> {
    let column = require_column(series, column)?;

    let Some((first, last)) = series.bounds() else {
        return Ok(Charge::default());
    };

    let (elapsed, current): (Vec<f64>, Vec<f64>) = series
        .timestamps()
        .iter()
        .zip(&column.values)
        .filter_map(|(ts, value)| {
            let seconds = (*ts - first).num_milliseconds() as f64 / 1000.0;
            value.map(|v| (seconds, v))
        })
        .unzip();

    let coulombs = trapezoid(&elapsed, &current);
    let span = (last - first).num_milliseconds() as f64 / 1000.0;

    Ok(Charge::from_coulombs(coulombs, span))
}
