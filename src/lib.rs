//! AnodeLog - anode current log analysis
//!
//! This library combines anode current logs exported as CSV into one
//! time-ordered series, adds the bare anode aggregate columns, and computes
//! the range-filtered, resampled views and charge figures a dashboard shows.
//!
//! ## Module Structure
//!
//! - [`parsers`] - CSV log parser and raw table types
//! - [`loader`] - Uploaded file handles and batch parsing
//! - [`normalize`] - Timestamp parsing, column alignment and ordering
//! - [`computed`] - Derived bare anode columns
//! - [`channels`] - Fixed/selectable column classification and chart groups
//! - [`state`] - Combined series and the per-session series cache
//! - [`analysis`] - Range filter, resampler, charge integrator, summaries
//! - [`session`] - One full dashboard pass
//! - [`error`] - Pipeline and per-file errors
//! - [`settings`] - User settings persistence

pub mod analysis;
pub mod channels;
pub mod computed;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod parsers;
pub mod session;
pub mod settings;
pub mod state;
