//! Dual-axis chart of the yearly rollup.
//!
//! Bars show the earthquake count per year against the left axis; a marked
//! line shows the average magnitude against the right axis. The x-axis is
//! categorical: one slot per year present, gaps are not interpolated.

use anyhow::Result;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::info;

use crate::analyzers::AnalysisError;
use crate::analyzers::types::YearAggregate;

/// Default output image.
pub const DEFAULT_CHART_PATH: &str = "earthquake_analysis_combined.svg";

const TITLE: &str = "UK Earthquake Analysis: Frequency and Average Magnitude per Year (2000-2018)";
const SIZE: (u32, u32) = (1400, 800);
const BAR_COLOR: RGBColor = RGBColor(70, 130, 180);
const LINE_COLOR: RGBColor = RED;

/// Draws the chart for `aggregates` into an SVG file at `path`.
///
/// # Errors
///
/// [`AnalysisError::NoData`] for an empty rollup, before anything is written.
/// I/O and drawing errors otherwise.
pub fn render(path: &Path, aggregates: &[YearAggregate]) -> Result<()> {
    if aggregates.is_empty() {
        return Err(AnalysisError::NoData.into());
    }

    let slots = category_range(aggregates.len() as u32);
    let last_slot = slots.end;
    let max_count = aggregates.iter().map(|a| a.count).max().unwrap_or(0) as u32;
    let (mag_lo, mag_hi) = magnitude_bounds(aggregates);
    let years: Vec<i32> = aggregates.iter().map(|a| a.year).collect();

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 26))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .right_y_label_area_size(70)
        .build_cartesian_2d(slots.clone().into_segmented(), 0u32..count_ceiling(max_count))?
        .set_secondary_coord(slots.into_segmented(), mag_lo..mag_hi);

    let year_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => years
            .get(*i as usize)
            .map(ToString::to_string)
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(years.len())
        .x_label_formatter(&year_label)
        .x_desc("Year")
        .y_desc("Number of Earthquakes")
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Average Magnitude")
        .draw()?;

    chart
        .draw_series(aggregates.iter().enumerate().map(|(i, a)| {
            let i = i as u32;
            let right = if i == last_slot {
                SegmentValue::Last
            } else {
                SegmentValue::Exact(i + 1)
            };
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0), (right, a.count as u32)],
                BAR_COLOR.mix(0.7).filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))?
        .label("Earthquake Frequency")
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 15, y + 5)], BAR_COLOR.mix(0.7).filled())
        });

    let points: Vec<(SegmentValue<u32>, f64)> = aggregates
        .iter()
        .enumerate()
        .map(|(i, a)| (SegmentValue::CenterOf(i as u32), a.average_magnitude))
        .collect();

    chart
        .draw_secondary_series(LineSeries::new(points.clone(), LINE_COLOR.stroke_width(3)))?
        .label("Average Magnitude")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], LINE_COLOR.stroke_width(3)));

    chart.draw_secondary_series(
        points
            .into_iter()
            .map(|p| Circle::new(p, 6, LINE_COLOR.filled())),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    info!(path = %path.display(), "Chart saved");

    Ok(())
}

/// Category indices for `slots` years. Integer segmented ranges are
/// inclusive, so the range ends at the last year's index. plotters cannot map
/// a one-value range, so a single year keeps one empty trailing slot.
fn category_range(slots: u32) -> Range<u32> {
    0..slots.saturating_sub(1).max(1)
}

/// Upper bound of the count axis with some headroom above the tallest bar.
fn count_ceiling(max_count: u32) -> u32 {
    max_count + max_count / 10 + 1
}

/// Magnitude axis bounds padded around the observed averages.
fn magnitude_bounds(aggregates: &[YearAggregate]) -> (f64, f64) {
    let (lo, hi) = aggregates
        .iter()
        .map(|a| a.average_magnitude)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
            (lo.min(m), hi.max(m))
        });
    let pad = ((hi - lo) * 0.1).max(0.1);
    (lo - pad, hi + pad)
}
