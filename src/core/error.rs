use chrono::{DateTime, Local, NaiveDateTime};
use thiserror::Error;

/// Failures of the cost map computation and of the live recommendation.
///
/// None of these are fatal to the caller: every variant describes one rejected computation,
/// and the caller decides how to recover (for example, by keeping the previous recommendation).
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Empty usage sequence, zero resolution, or non-finite usage values.
    #[error("invalid appliance profile: {0}")]
    InvalidProfile(String),

    /// Empty price series or non-finite prices.
    #[error("invalid price series: {0}")]
    InvalidPriceSeries(String),

    /// The resampled price series is shorter than the appliance run.
    #[error("insufficient price horizon: {n_buckets} price buckets for a {n_usage}-bucket run")]
    InsufficientHorizon { n_buckets: usize, n_usage: usize },

    /// The bucketed time is not a known start time.
    #[error("time not found in the cost map: {0}")]
    TimeNotFound(DateTime<Local>),

    /// Less than a whole hour remains until the latest feasible start.
    #[error("no delay window between {now} and the latest start at {latest_start}")]
    NoDelayWindow { now: DateTime<Local>, latest_start: DateTime<Local> },

    /// The local time zone skips the requested wall-clock time.
    #[error("local time does not exist: {0}")]
    NonExistentLocalTime(NaiveDateTime),
}

/// Non-fatal quality signals raised while computing the cost map.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Warning {
    /// The resolution does not evenly divide an hour, so each hourly price was repeated
    /// a truncated number of times and the buckets drift away from the hour boundaries.
    ResolutionMismatch { resolution_seconds: u32, repeat: usize },
}
