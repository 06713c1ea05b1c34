//! Per-year aggregation of event records and the summary derived from it.
//!
//! [`aggregate::extract`] turns records into index-aligned year and
//! magnitude sequences, [`aggregate::aggregate_by_year`] rolls those up into
//! [`types::YearAggregate`]s, and [`summary::summarize`] reduces the rollup to
//! a [`types::Summary`].

pub mod aggregate;
pub mod summary;
pub mod types;
pub mod utility;

use thiserror::Error;

use crate::models::Record;
use types::{Summary, YearAggregate};

/// Failures of the analysis stages.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("no data: at least one earthquake record is required")]
    NoData,

    #[error("length mismatch: {years} years but {magnitudes} magnitudes")]
    LengthMismatch { years: usize, magnitudes: usize },

    #[error("timestamp {0} ms is outside the representable date range")]
    InvalidTimestamp(i64),
}

/// Runs extraction, yearly aggregation and summary over `records`, deriving
/// years in local time.
pub fn analyze(records: &[Record]) -> Result<(Vec<YearAggregate>, Summary), AnalysisError> {
    let (years, magnitudes) = aggregate::extract(records)?;
    let aggregates = aggregate::aggregate_by_year(&years, &magnitudes)?;
    let summary = summary::summarize(&aggregates)?;
    Ok((aggregates, summary))
}
