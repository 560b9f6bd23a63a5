//! Error types for the analysis pipeline.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A file that was skipped during loading, with a user-visible reason
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FileError {
    pub file_name: String,
    pub message: String,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error reading file {}: {}", self.file_name, self.message)
    }
}

/// Errors that halt a pipeline pass
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PipelineError {
    /// Not a single uploaded file could be parsed
    #[error("No files could be parsed ({} failed)", errors.len())]
    NoFilesParsed { errors: Vec<FileError> },

    /// Files parsed but no row had a valid DATE/TIME pair
    #[error("No rows with a valid timestamp")]
    NoValidTimestamps,

    /// Requested range starts after it ends
    #[error("Start time {start} must not be after end time {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Valid range but no rows fall inside it
    #[error("No data between {start} and {end}")]
    EmptyRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// A column was requested that the series does not contain
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

impl PipelineError {
    /// Short status code for the presentation layer
    pub fn status(&self) -> &'static str {
        match self {
            PipelineError::NoFilesParsed { .. } => "no files parsed",
            PipelineError::NoValidTimestamps => "no valid timestamps",
            PipelineError::InvalidRange { .. } => "start after end",
            PipelineError::EmptyRange { .. } => "empty range",
            PipelineError::UnknownColumn(_) => "unknown column",
        }
    }
}
