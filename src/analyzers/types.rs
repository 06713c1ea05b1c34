//! Data types produced by the aggregation pipeline.

use serde::Serialize;

/// Earthquake count and mean magnitude for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearAggregate {
    pub year: i32,
    pub count: usize,
    pub average_magnitude: f64,
}

/// A year paired with the value that selected it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearValue<T> {
    pub year: i32,
    pub value: T,
}

/// Extrema and means over a year-ordered rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub first_year: i32,
    pub last_year: i32,
    pub years_analyzed: usize,
    pub total_earthquakes: usize,
    pub mean_per_year: f64,
    pub most_earthquakes: YearValue<usize>,
    pub fewest_earthquakes: YearValue<usize>,
    pub overall_average_magnitude: f64,
    pub highest_average_magnitude: YearValue<f64>,
    pub lowest_average_magnitude: YearValue<f64>,
}
