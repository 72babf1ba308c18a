//! Static Chart Renderer
//! Draws the five exploratory charts into in-memory RGB rasters.
//!
//! Charts:
//! 1. Rating histogram (20 bins) with a KDE overlay
//! 2. Horizontal bar chart of apps per category, largest on top
//! 3. Sentiment pie with the positive slice exploded
//! 4. Apps updated per year as a line with markers
//! 5. Annotated correlation heatmap with a colorbar

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::DataFrame;
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::debug;

use super::data::{
    apps_per_year, column_value_counts, histogram_bins, kde_curve, pie_slices, PieSlice,
};
use super::palette::{
    diverging, sentiment_color, viridis, SHADOW, SKY_BLUE, STEEL_BLUE, TEAL,
};
use super::{ChartKind, RenderError, RenderedChart};
use crate::data::{apps, reviews};
use crate::stats::{CorrelationMatrix, StatsCalculator};

const FONT: &str = "sans-serif";
const CAPTION_SIZE: u32 = 24;
const AXIS_DESC_SIZE: u32 = 18;
const LABEL_SIZE: u32 = 14;

const RATING_BINS: usize = 20;
const KDE_POINTS: usize = 200;

const PIE_START_DEG: f64 = 140.0;
const PIE_EXPLODE: f64 = 0.1;
const EXPLODED_SENTIMENT: &str = "Positive";

const COLORBAR_WIDTH: u32 = 110;
const COLORBAR_STEPS: usize = 100;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart from the cleaned tables, in display order.
    pub fn render_all(
        apps_df: &DataFrame,
        reviews_df: &DataFrame,
        correlation: &CorrelationMatrix,
    ) -> Result<Vec<RenderedChart>, RenderError> {
        let ratings =
            StatsCalculator::present(&StatsCalculator::column_values(apps_df, apps::RATING)?);
        let categories = column_value_counts(apps_df, apps::CATEGORY)?;
        let sentiments = column_value_counts(reviews_df, reviews::SENTIMENT)?;
        let per_year = apps_per_year(apps_df, apps::LAST_UPDATED)?;

        Ok(vec![
            Self::rating_distribution(&ratings)?,
            Self::apps_per_category(&categories)?,
            Self::sentiment_distribution(&sentiments)?,
            Self::apps_over_time(&per_year)?,
            Self::correlation_heatmap(correlation)?,
        ])
    }

    pub fn rating_distribution(ratings: &[f64]) -> Result<RenderedChart, RenderError> {
        Self::render(ChartKind::RatingDistribution, |root| {
            draw_rating_distribution(root, ratings)
        })
    }

    /// `counts` must be sorted by count, descending.
    pub fn apps_per_category(counts: &[(String, usize)]) -> Result<RenderedChart, RenderError> {
        Self::render(ChartKind::AppsPerCategory, |root| {
            draw_apps_per_category(root, counts)
        })
    }

    pub fn sentiment_distribution(
        counts: &[(String, usize)],
    ) -> Result<RenderedChart, RenderError> {
        Self::render(ChartKind::SentimentDistribution, |root| {
            draw_sentiment_distribution(root, counts)
        })
    }

    pub fn apps_over_time(per_year: &BTreeMap<i32, usize>) -> Result<RenderedChart, RenderError> {
        Self::render(ChartKind::AppsOverTime, |root| {
            draw_apps_over_time(root, per_year)
        })
    }

    pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> Result<RenderedChart, RenderError> {
        Self::render(ChartKind::CorrelationHeatmap, |root| {
            draw_correlation_heatmap(root, matrix)
        })
    }

    fn render<F>(kind: ChartKind, draw: F) -> Result<RenderedChart, RenderError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), RenderError>,
    {
        let (width, height) = kind.size();
        let mut pixels = vec![255u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            draw(&root)?;
            root.present()?;
        }
        debug!(chart = ?kind, width, height, "Rendered chart");

        Ok(RenderedChart {
            kind,
            width,
            height,
            pixels,
        })
    }
}

fn draw_rating_distribution<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    ratings: &[f64],
) -> Result<(), RenderError> {
    let bins = histogram_bins(ratings, RATING_BINS);
    let curve = kde_curve(ratings, &bins, KDE_POINTS);
    let peak = curve
        .iter()
        .map(|(_, y)| *y)
        .fold(bins.max_count() as f64, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(ChartKind::RatingDistribution.title(), (FONT, CAPTION_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(bins.lower()..bins.upper(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Rating")
        .y_desc("Frequency")
        .axis_desc_style((FONT, AXIS_DESC_SIZE))
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    chart.draw_series(bins.iter().map(|(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], SKY_BLUE.filled())
    }))?;
    chart.draw_series(bins.iter().map(|(left, right, count)| {
        Rectangle::new([(left, 0.0), (right, count as f64)], WHITE.stroke_width(1))
    }))?;

    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(curve, STEEL_BLUE.stroke_width(2)))?;
    }
    Ok(())
}

fn draw_apps_per_category<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    counts: &[(String, usize)],
) -> Result<(), RenderError> {
    let n = counts.len() as u32;
    let largest = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let x_max = (largest as f64 * 1.05).ceil() as u32 + 1;
    // Slot 0 is the bottom row, so the ranking is laid out in reverse.
    let labels: Vec<&str> = counts.iter().rev().map(|(name, _)| name.as_str()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(ChartKind::AppsPerCategory.title(), (FONT, CAPTION_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(220)
        .build_cartesian_2d(0u32..x_max, segment_range(n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(counts.len().max(1))
        .y_label_formatter(&|slot: &SegmentValue<u32>| segment_label(slot, &labels))
        .x_desc("Count of Apps")
        .y_desc("Category")
        .axis_desc_style((FONT, AXIS_DESC_SIZE))
        .label_style((FONT, LABEL_SIZE - 2))
        .draw()?;

    let shades = (counts.len().max(2) - 1) as f64;
    chart.draw_series(counts.iter().enumerate().map(|(rank, (_, count))| {
        let slot = n - 1 - rank as u32;
        let mut bar = Rectangle::new(
            [
                (0, SegmentValue::Exact(slot)),
                (*count as u32, SegmentValue::Exact(slot + 1)),
            ],
            viridis(rank as f64 / shades).filled(),
        );
        bar.set_margin(2, 2, 0, 0);
        bar
    }))?;
    Ok(())
}

fn draw_sentiment_distribution<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    counts: &[(String, usize)],
) -> Result<(), RenderError> {
    let area = root.titled(
        ChartKind::SentimentDistribution.title(),
        (FONT, CAPTION_SIZE),
    )?;
    let (width, height) = area.dim_in_pixel();
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 * 0.33;
    let shadow_offset = radius * 0.03;

    let slices = pie_slices(counts, PIE_START_DEG, EXPLODED_SENTIMENT);
    let centers: Vec<(f64, f64)> = slices
        .iter()
        .map(|slice| {
            if slice.exploded {
                polar(center, radius * PIE_EXPLODE, slice.mid_deg())
            } else {
                center
            }
        })
        .collect();

    for (slice, &(cx, cy)) in slices.iter().zip(&centers) {
        let shadow_center = (cx + shadow_offset, cy + shadow_offset);
        area.draw(&Polygon::new(
            wedge(shadow_center, radius, slice),
            SHADOW.mix(0.5).filled(),
        ))?;
    }

    let label_style = |size: u32| {
        (FONT, size)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center))
    };

    for (slice, &slice_center) in slices.iter().zip(&centers) {
        area.draw(&Polygon::new(
            wedge(slice_center, radius, slice),
            sentiment_color(&slice.label).filled(),
        ))?;

        let percent = polar(slice_center, radius * 0.6, slice.mid_deg());
        area.draw(&Text::new(
            format!("{:.1}%", slice.fraction * 100.0),
            to_pixel(percent),
            label_style(LABEL_SIZE + 4),
        ))?;

        let name = polar(slice_center, radius * 1.15, slice.mid_deg());
        area.draw(&Text::new(
            slice.label.clone(),
            to_pixel(name),
            label_style(LABEL_SIZE + 6),
        ))?;
    }
    Ok(())
}

fn draw_apps_over_time<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    per_year: &BTreeMap<i32, usize>,
) -> Result<(), RenderError> {
    let (first, last) = match (per_year.keys().next(), per_year.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => (2000, 2000),
    };
    let peak = per_year.values().copied().max().unwrap_or(0) as f64;
    let points: Vec<(i32, f64)> = per_year
        .iter()
        .map(|(year, count)| (*year, *count as f64))
        .collect();

    let mut chart = ChartBuilder::on(root)
        .caption(ChartKind::AppsOverTime.title(), (FONT, CAPTION_SIZE))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((first - 1)..(last + 1), 0f64..(peak * 1.1 + 1.0))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Number of Apps Added")
        .x_label_formatter(&|year: &i32| year.to_string())
        .axis_desc_style((FONT, AXIS_DESC_SIZE))
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    chart.draw_series(LineSeries::new(points.clone(), TEAL.stroke_width(2)))?;
    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 5, TEAL.filled())),
    )?;
    Ok(())
}

fn draw_correlation_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    matrix: &CorrelationMatrix,
) -> Result<(), RenderError> {
    let k = matrix.len() as u32;
    let names: Vec<&str> = matrix.columns.iter().map(String::as_str).collect();
    // Row 0 of the matrix is drawn at the top.
    let rows: Vec<&str> = names.iter().rev().copied().collect();

    let (plot_width, _) = root.dim_in_pixel();
    let (plot_area, bar_area) =
        root.split_horizontally(plot_width.saturating_sub(COLORBAR_WIDTH));

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(ChartKind::CorrelationHeatmap.title(), (FONT, CAPTION_SIZE))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(
            segment_range(k).into_segmented(),
            segment_range(k).into_segmented(),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(names.len().max(1))
        .y_labels(names.len().max(1))
        .x_label_formatter(&|slot: &SegmentValue<u32>| segment_label(slot, &names))
        .y_label_formatter(&|slot: &SegmentValue<u32>| segment_label(slot, &rows))
        .label_style((FONT, LABEL_SIZE))
        .draw()?;

    let cells: Vec<(u32, u32, f64)> = (0..k)
        .flat_map(|i| (0..k).map(move |j| (i, j)))
        .map(|(i, j)| (j, k - 1 - i, matrix.get(i as usize, j as usize)))
        .collect();

    chart.draw_series(cells.iter().map(|&(x, y, value)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
            ],
            diverging(value, 1.0).filled(),
        )
    }))?;

    chart.draw_series(cells.iter().map(|&(x, y, value)| {
        let color = if value.abs() > 0.6 { WHITE } else { BLACK };
        Text::new(
            format_cell(value),
            (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
            (FONT, LABEL_SIZE + 4)
                .into_font()
                .color(&color)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        )
    }))?;

    draw_colorbar(&bar_area)
}

/// Vertical coolwarm scale from -1 to 1.
fn draw_colorbar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(70)
        .margin_bottom(60)
        .margin_right(10)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;

    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(9)
        .y_label_formatter(&|v: &f64| format!("{:.2}", v))
        .label_style((FONT, LABEL_SIZE - 2))
        .draw()?;

    let step = 2.0 / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|i| {
        let lo = -1.0 + step * i as f64;
        let hi = lo + step;
        Rectangle::new([(0.0, lo), (1.0, hi)], diverging((lo + hi) / 2.0, 1.0).filled())
    }))?;
    Ok(())
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", value)
    }
}

/// `n` categorical slots. Plotters adds one segment past the range end.
fn segment_range(n: u32) -> Range<u32> {
    if n >= 2 {
        0..n - 1
    } else {
        0..1
    }
}

fn segment_label(slot: &SegmentValue<u32>, labels: &[&str]) -> String {
    match slot {
        SegmentValue::CenterOf(i) => labels
            .get(*i as usize)
            .map(|label| label.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Point at `radius` from `center`, `deg` counterclockwise on screen.
fn polar(center: (f64, f64), radius: f64, deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (center.0 + radius * rad.cos(), center.1 - radius * rad.sin())
}

fn to_pixel(point: (f64, f64)) -> (i32, i32) {
    (point.0.round() as i32, point.1.round() as i32)
}

fn wedge(center: (f64, f64), radius: f64, slice: &PieSlice) -> Vec<(i32, i32)> {
    let sweep = slice.end_deg - slice.start_deg;
    let steps = (sweep.ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(to_pixel(center));
    for i in 0..=steps {
        let deg = slice.start_deg + sweep * i as f64 / steps as f64;
        points.push(to_pixel(polar(center, radius, deg)));
    }
    points
}
