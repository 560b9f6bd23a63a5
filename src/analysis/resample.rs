//! Fixed-width time bucket resampling.
//!
//! Buckets are aligned to the calendar rather than to the first sample, so
//! resampling the same data always produces the same grid:
//! - seconds, minutes, hours and days are multiples of the width since the
//!   Unix epoch
//! - weeks start on Monday 00:00
//! - months start on day 1 at 00:00
//!
//! Every numeric column is averaged over the rows in each bucket. Buckets
//! without rows are omitted, and a column with no readings in a bucket is
//! absent there.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use strum::{AsRefStr, EnumIter, EnumString};
use thiserror::Error;

use crate::state::{Column, Series};

/// Unit of a resample bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResampleUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    MonthStart,
}

impl ResampleUnit {
    /// Alias used in rule strings
    pub fn alias(&self) -> &'static str {
        match self {
            ResampleUnit::Second => "S",
            ResampleUnit::Minute => "MIN",
            ResampleUnit::Hour => "H",
            ResampleUnit::Day => "D",
            ResampleUnit::Week => "W",
            ResampleUnit::MonthStart => "MS",
        }
    }

    /// Width in seconds for units of constant length
    fn fixed_seconds(&self) -> Option<i64> {
        match self {
            ResampleUnit::Second => Some(1),
            ResampleUnit::Minute => Some(60),
            ResampleUnit::Hour => Some(3_600),
            ResampleUnit::Day => Some(86_400),
            ResampleUnit::Week | ResampleUnit::MonthStart => None,
        }
    }
}

/// Errors from parsing a resample rule string
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResampleRuleError {
    #[error("Unrecognized resample rule: {0}")]
    Unrecognized(String),
    #[error("Resample bucket count must be positive: {0}")]
    ZeroCount(String),
}

/// A bucket width: `count` units
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResampleRule {
    pub count: u32,
    pub unit: ResampleUnit,
}

static RULE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?<count>\d*)\s*(?<unit>MS|MIN|S|T|H|D|W)\s*$").expect("valid regex")
});

impl ResampleRule {
    pub fn new(count: u32, unit: ResampleUnit) -> Self {
        Self {
            count: count.max(1),
            unit,
        }
    }

    /// Start of the bucket containing `ts`
    pub fn bucket_start(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let count = i64::from(self.count.max(1));

        let start = match self.unit.fixed_seconds() {
            Some(unit_secs) => {
                let width = unit_secs * count;
                let secs = ts.and_utc().timestamp();
                DateTime::from_timestamp(secs - secs.rem_euclid(width), 0).map(|d| d.naive_utc())
            }
            None if self.unit == ResampleUnit::Week => {
                // Day 0 of the common era count (0001-01-01) is a Monday
                let day = i64::from(ts.date().num_days_from_ce()) - 1;
                let week = day.div_euclid(7);
                let first_week = week - week.rem_euclid(count);
                i32::try_from(first_week * 7 + 1)
                    .ok()
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }
            None => {
                let month = i64::from(ts.year()) * 12 + i64::from(ts.month0());
                let first_month = month - month.rem_euclid(count);
                i32::try_from(first_month.div_euclid(12))
                    .ok()
                    .and_then(|year| {
                        NaiveDate::from_ymd_opt(year, first_month.rem_euclid(12) as u32 + 1, 1)
                    })
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }
        };

        // Only unrepresentable dates fall through; they get a bucket of their own
        start.unwrap_or(ts)
    }
}

impl FromStr for ResampleRule {
    type Err = ResampleRuleError;

    /// Parse aliases like `10S`, `30s`, `1H`, `1D`, `1W`, `1MS`, `5MIN` or `5T`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RULE_PATTERN
            .captures(s)
            .ok_or_else(|| ResampleRuleError::Unrecognized(s.to_string()))?;

        let count = match &caps["count"] {
            "" => 1,
            digits => digits
                .parse::<u32>()
                .map_err(|_| ResampleRuleError::Unrecognized(s.to_string()))?,
        };
        if count == 0 {
            return Err(ResampleRuleError::ZeroCount(s.to_string()));
        }

        let unit = match caps["unit"].to_uppercase().as_str() {
            "S" => ResampleUnit::Second,
            "MIN" | "T" => ResampleUnit::Minute,
            "H" => ResampleUnit::Hour,
            "D" => ResampleUnit::Day,
            "W" => ResampleUnit::Week,
            "MS" => ResampleUnit::MonthStart,
            _ => return Err(ResampleRuleError::Unrecognized(s.to_string())),
        };

        Ok(Self { count, unit })
    }
}

impl fmt::Display for ResampleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.alias())
    }
}

/// Timeframe presets offered to the user
#[derive(
    AsRefStr, Clone, Copy, Debug, Default, EnumIter, EnumString, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum Timeframe {
    /// Original logger sampling, nominally every 5 seconds
    #[default]
    #[strum(serialize = "5s (Default)")]
    Original,
    #[strum(serialize = "10s (avg)")]
    TenSeconds,
    #[strum(serialize = "30s (avg)")]
    ThirtySeconds,
    #[strum(serialize = "1 hr (avg)")]
    OneHour,
    #[strum(serialize = "1 day (avg)")]
    OneDay,
    #[strum(serialize = "1 week (avg)")]
    OneWeek,
    #[strum(serialize = "1 month (avg)")]
    OneMonth,
    #[strum(serialize = "1s (Special)")]
    OneSecond,
}

impl Timeframe {
    pub fn label(&self) -> &str {
        self.as_ref()
    }

    /// Resample rule for this preset; `None` keeps the original sampling
    pub fn rule(&self) -> Option<ResampleRule> {
        let (count, unit) = match self {
            Timeframe::Original => return None,
            Timeframe::TenSeconds => (10, ResampleUnit::Second),
            Timeframe::ThirtySeconds => (30, ResampleUnit::Second),
            Timeframe::OneHour => (1, ResampleUnit::Hour),
            Timeframe::OneDay => (1, ResampleUnit::Day),
            Timeframe::OneWeek => (1, ResampleUnit::Week),
            Timeframe::OneMonth => (1, ResampleUnit::MonthStart),
            Timeframe::OneSecond => (1, ResampleUnit::Second),
        };
        Some(ResampleRule::new(count, unit))
    }
}

/// Series prepared for charting, possibly averaged onto a coarser grid.
///
/// Deliberately not convertible back into a [`Series`]: charge and summary
/// figures must come from raw samples.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResampledView {
    rule: Option<ResampleRule>,
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl ResampledView {
    pub fn rule(&self) -> Option<ResampleRule> {
        self.rule
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Resample a series. With no rule the series is passed through unchanged.
pub fn resample(series: &Series, rule: Option<ResampleRule>) -> ResampledView {
    let Some(rule) = rule else {
        return ResampledView {
            rule: None,
            timestamps: series.timestamps().to_vec(),
            columns: series.columns().to_vec(),
        };
    };

    // Rows are sorted, so each bucket is a contiguous run
    let mut runs: Vec<(NaiveDateTime, usize, usize)> = Vec::new();
    for (row, ts) in series.timestamps().iter().enumerate() {
        let bucket = rule.bucket_start(*ts);
        match runs.last_mut() {
            Some(run) if run.0 == bucket => run.2 = row + 1,
            _ => runs.push((bucket, row, row + 1)),
        }
    }

    let columns = series
        .columns()
        .iter()
        .map(|column| {
            let values = runs
                .iter()
                .map(|&(_, from, to)| mean(&column.values[from..to]))
                .collect();
            Column::new(column.name.clone(), values)
        })
        .collect();

    tracing::debug!(
        "Resampled {} rows into {} buckets of {}",
        series.len(),
        runs.len(),
        rule
    );

    ResampledView {
        rule: Some(rule),
        timestamps: runs.into_iter().map(|(ts, _, _)| ts).collect(),
        columns,
    }
}

/// Mean of present values, absent when there are none
fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
