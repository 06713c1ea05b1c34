use crate::analyzers::AnalysisError;
use crate::analyzers::types::{Summary, YearAggregate, YearValue};
use crate::analyzers::utility::{argmax_by, argmin_by, mean};
use std::fmt;

const RULE_WIDTH: usize = 50;

/// Reduces a year-ordered rollup to its [`Summary`].
///
/// `aggregates` is expected in ascending year order, as produced by
/// [`crate::analyzers::aggregate::aggregate_by_year`]. Extrema ties resolve to
/// the earliest year.
pub fn summarize(aggregates: &[YearAggregate]) -> Result<Summary, AnalysisError> {
    let (first, last) = match (aggregates.first(), aggregates.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AnalysisError::NoData),
    };

    let counts: Vec<f64> = aggregates.iter().map(|a| a.count as f64).collect();
    let averages: Vec<f64> = aggregates.iter().map(|a| a.average_magnitude).collect();

    let by_count = |idx: usize| YearValue {
        year: aggregates[idx].year,
        value: aggregates[idx].count,
    };
    let by_magnitude = |idx: usize| YearValue {
        year: aggregates[idx].year,
        value: aggregates[idx].average_magnitude,
    };

    let most = argmax_by(aggregates, |a| a.count).ok_or(AnalysisError::NoData)?;
    let fewest = argmin_by(aggregates, |a| a.count).ok_or(AnalysisError::NoData)?;
    let highest = argmax_by(aggregates, |a| a.average_magnitude).ok_or(AnalysisError::NoData)?;
    let lowest = argmin_by(aggregates, |a| a.average_magnitude).ok_or(AnalysisError::NoData)?;

    Ok(Summary {
        first_year: first.year,
        last_year: last.year,
        years_analyzed: aggregates.len(),
        total_earthquakes: aggregates.iter().map(|a| a.count).sum(),
        mean_per_year: mean(&counts),
        most_earthquakes: by_count(most),
        fewest_earthquakes: by_count(fewest),
        overall_average_magnitude: mean(&averages),
        highest_average_magnitude: by_magnitude(highest),
        lowest_average_magnitude: by_magnitude(lowest),
    })
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "EARTHQUAKE ANALYSIS SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Data period: {} - {}", self.first_year, self.last_year)?;
        writeln!(f, "Total years analyzed: {}", self.years_analyzed)?;
        writeln!(f, "Total earthquakes: {}", self.total_earthquakes)?;
        writeln!(f, "Average earthquakes per year: {:.1}", self.mean_per_year)?;
        writeln!(
            f,
            "Year with most earthquakes: {} ({} earthquakes)",
            self.most_earthquakes.year, self.most_earthquakes.value
        )?;
        writeln!(
            f,
            "Year with fewest earthquakes: {} ({} earthquakes)",
            self.fewest_earthquakes.year, self.fewest_earthquakes.value
        )?;
        writeln!(
            f,
            "Overall average magnitude: {:.2}",
            self.overall_average_magnitude
        )?;
        writeln!(
            f,
            "Highest average magnitude year: {} (avg: {:.2})",
            self.highest_average_magnitude.year, self.highest_average_magnitude.value
        )?;
        write!(
            f,
            "Lowest average magnitude year: {} (avg: {:.2})",
            self.lowest_average_magnitude.year, self.lowest_average_magnitude.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(year: i32, count: usize, average_magnitude: f64) -> YearAggregate {
        YearAggregate {
            year,
            count,
            average_magnitude,
        }
    }

    #[test]
    fn test_summarize_scenario() {
        let summary = summarize(&[agg(2000, 2, 3.0), agg(2001, 1, 3.0)]).unwrap();

        assert_eq!(summary.first_year, 2000);
        assert_eq!(summary.last_year, 2001);
        assert_eq!(summary.years_analyzed, 2);
        assert_eq!(summary.total_earthquakes, 3);
        assert_eq!(summary.mean_per_year, 1.5);
        assert_eq!(
            summary.most_earthquakes,
            YearValue {
                year: 2000,
                value: 2,
            }
        );
        assert_eq!(
            summary.fewest_earthquakes,
            YearValue {
                year: 2001,
                value: 1,
            }
        );
        assert_eq!(summary.overall_average_magnitude, 3.0);
        assert_eq!(summary.highest_average_magnitude.year, 2000);
        assert_eq!(summary.lowest_average_magnitude.year, 2000);
    }

    #[test]
    fn test_equal_max_count_picks_earlier_year() {
        let summary =
            summarize(&[agg(2003, 1, 2.0), agg(2005, 7, 1.5), agg(2009, 7, 2.5)]).unwrap();

        assert_eq!(
            summary.most_earthquakes,
            YearValue {
                year: 2005,
                value: 7,
            }
        );
        assert_eq!(summary.fewest_earthquakes.year, 2003);
        assert_eq!(summary.highest_average_magnitude.year, 2009);
        assert_eq!(summary.lowest_average_magnitude.year, 2005);
    }

    #[test]
    fn test_single_year() {
        let summary = summarize(&[agg(2012, 4, 1.75)]).unwrap();

        assert_eq!(summary.first_year, summary.last_year);
        assert_eq!(summary.most_earthquakes, summary.fewest_earthquakes);
        assert_eq!(summary.mean_per_year, 4.0);
    }

    #[test]
    fn test_summarize_empty_is_no_data() {
        assert_eq!(summarize(&[]), Err(AnalysisError::NoData));
    }

    #[test]
    fn test_display_layout() {
        let summary = summarize(&[agg(2000, 2, 3.0), agg(2001, 1, 3.0)]).unwrap();
        let text = summary.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "EARTHQUAKE ANALYSIS SUMMARY");
        assert_eq!(lines[3], "Data period: 2000 - 2001");
        assert_eq!(lines[6], "Average earthquakes per year: 1.5");
        assert_eq!(lines[7], "Year with most earthquakes: 2000 (2 earthquakes)");
        assert_eq!(lines[9], "Overall average magnitude: 3.00");
        assert_eq!(lines[11], "Lowest average magnitude year: 2000 (avg: 3.00)");
    }
}
