use crate::analyzers::AnalysisError;
use crate::analyzers::types::YearAggregate;
use crate::models::Record;
use chrono::{Datelike, Local, TimeZone};
use std::collections::HashMap;

/// Splits records into index-aligned calendar years (local time) and
/// magnitudes.
pub fn extract(records: &[Record]) -> Result<(Vec<i32>, Vec<f64>), AnalysisError> {
    extract_in(records, &Local)
}

/// Same as [`extract`], deriving the year in an explicit time zone.
pub fn extract_in<Tz: TimeZone>(
    records: &[Record],
    tz: &Tz,
) -> Result<(Vec<i32>, Vec<f64>), AnalysisError> {
    let mut years = Vec::with_capacity(records.len());
    let mut magnitudes = Vec::with_capacity(records.len());

    for record in records {
        let when = tz
            .timestamp_millis_opt(record.timestamp)
            .single()
            .ok_or(AnalysisError::InvalidTimestamp(record.timestamp))?;

        years.push(when.year());
        magnitudes.push(record.magnitude);
    }

    Ok((years, magnitudes))
}

/// Groups magnitudes by their paired year.
///
/// The result holds one entry per distinct year, ordered by ascending year.
/// Years with no events are absent. Sums accumulate in input order, so the
/// same input always yields bit-identical means.
///
/// # Errors
///
/// [`AnalysisError::LengthMismatch`] if the slices differ in length,
/// [`AnalysisError::NoData`] if they are empty.
pub fn aggregate_by_year(
    years: &[i32],
    magnitudes: &[f64],
) -> Result<Vec<YearAggregate>, AnalysisError> {
    if years.len() != magnitudes.len() {
        return Err(AnalysisError::LengthMismatch {
            years: years.len(),
            magnitudes: magnitudes.len(),
        });
    }
    if years.is_empty() {
        return Err(AnalysisError::NoData);
    }

    let mut totals: HashMap<i32, (usize, f64)> = HashMap::new();
    for (&year, &magnitude) in years.iter().zip(magnitudes) {
        let entry = totals.entry(year).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += magnitude;
    }

    let mut keys: Vec<i32> = totals.keys().copied().collect();
    keys.sort_unstable();

    Ok(keys
        .into_iter()
        .map(|year| {
            let (count, sum) = totals[&year];
            YearAggregate {
                year,
                count,
                average_magnitude: sum / count as f64,
            }
        })
        .collect())
}
