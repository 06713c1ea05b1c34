//! Text output for the yearly rollup.
//!
//! Prints the summary and a terminal bar view to stdout, and writes the
//! rollup as CSV.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{Summary, YearAggregate};

/// Width, in characters, of the longest bar in the terminal view.
const BAR_WIDTH: usize = 40;

/// Writes the summary block to stdout.
pub fn print_summary(summary: &Summary) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out)?;
    writeln!(out, "{summary}")?;
    Ok(())
}

/// Writes the rollup as CSV (`year,count,average_magnitude`), replacing `path`.
pub fn write_csv(path: &Path, aggregates: &[YearAggregate]) -> Result<()> {
    debug!(path = %path.display(), rows = aggregates.len(), "Writing CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;

    for aggregate in aggregates {
        writer.serialize(aggregate)?;
    }
    writer.flush()?;

    Ok(())
}

/// Renders one line per year: a bar scaled to the busiest year, the count,
/// and the average magnitude.
pub fn display_chart<W: Write>(out: &mut W, aggregates: &[YearAggregate]) -> io::Result<()> {
    let peak = aggregates.iter().map(|a| a.count).max().unwrap_or(0);

    writeln!(out, "Earthquakes per year (count | avg magnitude)")?;
    for aggregate in aggregates {
        let filled = bar_width(aggregate.count, peak);
        writeln!(
            out,
            "{year} {bar:<width$} {count:>5} | {avg:.2}",
            year = aggregate.year,
            bar = "#".repeat(filled),
            width = BAR_WIDTH,
            count = aggregate.count,
            avg = aggregate.average_magnitude,
        )?;
    }
    Ok(())
}

fn bar_width(count: usize, peak: usize) -> usize {
    if peak == 0 {
        return 0;
    }
    // never round a non-empty year down to nothing
    ((count * BAR_WIDTH + peak / 2) / peak).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> Vec<YearAggregate> {
        vec![
            YearAggregate {
                year: 2000,
                count: 40,
                average_magnitude: 2.0,
            },
            YearAggregate {
                year: 2004,
                count: 1,
                average_magnitude: 3.456,
            },
        ]
    }

    #[test]
    fn test_write_csv_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("years.csv");

        write_csv(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["year,count,average_magnitude", "2000,40,2.0", "2004,1,3.456"]);
    }

    #[test]
    fn test_write_csv_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("years.csv");

        write_csv(&path, &sample()).unwrap();
        write_csv(&path, &sample()[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_display_chart_scales_bars() {
        let mut buf = Vec::new();
        display_chart(&mut buf, &sample()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(&format!("2000 {}", "#".repeat(BAR_WIDTH))));
        assert!(lines[2].starts_with("2004 # "));
        assert!(lines[2].ends_with("| 3.46"));
    }

    #[test]
    fn test_bar_width_zero_peak() {
        assert_eq!(bar_width(0, 0), 0);
    }
}
