use std::collections::HashMap;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use polars::prelude::DataFrame;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::{PipelineError, Result};
use crate::features::DAY_ORDER;
use crate::insights::{self, AVG_PROFIT};
use crate::schema;
use crate::stats;

const PALETTE: [RGBColor; 6] = [
    RGBColor(102, 153, 204),
    RGBColor(153, 204, 153),
    RGBColor(229, 153, 153),
    RGBColor(204, 178, 127),
    RGBColor(153, 153, 204),
    RGBColor(178, 127, 178),
];

fn chart_err<E: std::fmt::Display>(err: E) -> PipelineError {
    PipelineError::Chart(err.to_string())
}

/// Renders the full set of charts into `out_dir` and returns the written
/// paths, in the order they were produced.
pub fn render_all(df: &DataFrame, config: &AnalysisConfig, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    let written = vec![
        cost_distribution_pie(df, config, out_dir)?,
        commission_costs_profit_bar(df, config, out_dir)?,
        profit_histogram(df, config, out_dir)?,
        profit_by_day_boxplot(df, config, out_dir)?,
        profit_by_hour_line(df, config, out_dir)?,
        correlation_heatmap(df, config, out_dir)?,
        duration_vs_profit_scatter(df, config, out_dir)?,
    ];

    info!(charts = written.len(), dir = %out_dir.display(), "rendered charts");
    Ok(written)
}

/// Pie of the three cost-component totals, slices in column order.
pub fn cost_distribution_pie(
    df: &DataFrame,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join("cost_distribution.png");
    let totals = insights::cost_component_totals(df)?;

    let sizes: Vec<f64> = totals.iter().map(|(_, total)| total.max(0.0)).collect();
    let labels: Vec<String> = totals.iter().map(|(name, _)| name.clone()).collect();
    let colors: Vec<RGBColor> = PALETTE.iter().copied().take(totals.len()).collect();

    let side = config.chart_width.min(config.chart_height);
    {
        let root = BitMapBackend::new(&path, (side, side)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        root.titled("Cost Distribution", ("sans-serif", 28))
            .map_err(chart_err)?;

        let center = (side as i32 / 2, side as i32 / 2);
        let radius = side as f64 * 0.32;
        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(90.0);
        pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
        pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
        root.draw(&pie).map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(path)
}

/// Bar chart of total commission vs total costs vs total profit.
pub fn commission_costs_profit_bar(
    df: &DataFrame,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join("commission_costs_profit.png");

    let labels = [schema::COMMISSION_FEE, schema::COSTS, schema::PROFIT];
    let mut totals = Vec::with_capacity(labels.len());
    for name in labels {
        totals.push(stats::non_null_values(df, name)?.iter().sum::<f64>());
    }

    let y_min = totals.iter().copied().fold(0.0f64, f64::min) * 1.05;
    let y_max = totals.iter().copied().fold(0.0f64, f64::max) * 1.05;

    {
        let root = BitMapBackend::new(&path, (config.chart_width, config.chart_height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Commission vs Costs vs Profit", ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(0f64..labels.len() as f64, y_min..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| {
                let idx = x.floor() as usize;
                labels.get(idx).map(|s| s.to_string()).unwrap_or_default()
            })
            .y_desc("Amount")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(totals.iter().enumerate().map(|(idx, &total)| {
                Rectangle::new(
                    [(idx as f64 + 0.15, 0.0), (idx as f64 + 0.85, total)],
                    PALETTE[idx % PALETTE.len()].filled(),
                )
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(path)
}

/// Histogram of per-order profit.
pub fn profit_histogram(
    df: &DataFrame,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join("profit_distribution.png");
    let values = stats::non_null_values(df, schema::PROFIT)?;
    if values.is_empty() {
        return Err(PipelineError::Chart(
            "profit histogram needs at least one non-null profit value".to_string(),
        ));
    }

    let bins = config.histogram_bins.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let width = span / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in &values {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let tallest = counts.iter().copied().max().unwrap_or(1) as f64;

    {
        let root = BitMapBackend::new(&path, (config.chart_width, config.chart_height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Profit Distribution", ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(min..min + span, 0.0..tallest * 1.05)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Profit")
            .y_desc("Frequency")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(counts.iter().enumerate().map(|(idx, &count)| {
                let x0 = min + idx as f64 * width;
                Rectangle::new(
                    [(x0, 0.0), (x0 + width, count as f64)],
                    RGBColor(135, 206, 235).filled(),
                )
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(path)
}

/// Per-day boxplots of profit, weekday order.
pub fn profit_by_day_boxplot(
    df: &DataFrame,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join("profit_by_day.png");

    let days = df.column(schema::DAY_OF_WEEK)?.str()?;
    let profit = df.column(schema::PROFIT)?.f64()?;

    let mut by_day: HashMap<&str, Vec<f32>> = HashMap::new();
    for idx in 0..df.height() {
        if let (Some(day), Some(value)) = (days.get(idx), profit.get(idx)) {
            by_day.entry(day).or_default().push(value as f32);
        }
    }

    let dataset: Vec<(&str, Quartiles)> = DAY_ORDER
        .iter()
        .filter_map(|day| {
            by_day
                .get(day)
                .filter(|values| !values.is_empty())
                .map(|values| (*day, Quartiles::new(values)))
        })
        .collect();
    if dataset.is_empty() {
        return Err(PipelineError::Chart(
            "profit boxplot needs at least one day with profit values".to_string(),
        ));
    }

    let keys: Vec<&str> = dataset.iter().map(|(day, _)| *day).collect();
    let mut y_min = f32::INFINITY;
    let mut y_max = f32::NEG_INFINITY;
    for (_, quartiles) in &dataset {
        for value in quartiles.values() {
            y_min = y_min.min(value);
            y_max = y_max.max(value);
        }
    }
    let pad = (y_max - y_min).abs().max(1.0) * 0.05;

    {
        let root = BitMapBackend::new(&path, (config.chart_width, config.chart_height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Profit by Day of Week", ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(keys[..].into_segmented(), y_min - pad..y_max + pad)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .y_desc("Profit")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(dataset.iter().map(|(day, quartiles)| {
                Boxplot::new_vertical(SegmentValue::CenterOf(day), quartiles)
                    .width(24)
                    .style(PALETTE[0])
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(path)
}

/// Mean profit per hour of day as a marked line.
pub fn profit_by_hour_line(
    df: &DataFrame,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join("profit_by_hour.png");

    let grouped = insights::average_profit_by_hour(df)?;
    let hours = grouped.column(schema::HOUR_OF_DAY)?.i32()?;
    let means = grouped.column(AVG_PROFIT)?.f64()?;

    let mut points: Vec<(i32, f64)> = hours
        .iter()
        .zip(means.iter())
        .filter_map(|(hour, mean)| Some((hour?, mean?)))
        .collect();
    points.sort_by_key(|(hour, _)| *hour);
    if points.is_empty() {
        return Err(PipelineError::Chart(
            "hourly profit line needs at least one hour with profit values".to_string(),
        ));
    }

    let y_min = points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let y_max = points
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = (y_max - y_min).abs().max(1.0) * 0.05;

    {
        let root = BitMapBackend::new(&path, (config.chart_width, config.chart_height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Average Profit by Hour of Day", ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0i32..24i32, y_min - pad..y_max + pad)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Hour of Day")
            .y_desc("Average Profit")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
            .map_err(chart_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|point| Circle::new(*point, 4, BLUE.filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(path)
}

pub const CORRELATION_COLUMNS: [&str; 6] = [
    schema::ORDER_VALUE,
    schema::DISCOUNTS,
    schema::DELIVERY_FEE,
    schema::PAYMENT_FEE,
    schema::COMMISSION_FEE,
    schema::PROFIT,
];

/// Annotated Pearson-correlation heatmap over the financial columns.
pub fn correlation_heatmap(
    df: &DataFrame,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join("correlation_heatmap.png");
    let n = CORRELATION_COLUMNS.len();

    let mut matrix = vec![vec![0.0f64; n]; n];
    for (row, left) in CORRELATION_COLUMNS.iter().enumerate() {
        for (col_idx, right) in CORRELATION_COLUMNS.iter().enumerate() {
            matrix[row][col_idx] = stats::pearson(df, left, right)?;
        }
    }

    {
        let root = BitMapBackend::new(&path, (config.chart_width, config.chart_height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Correlation Matrix", ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(110)
            .y_label_area_size(150)
            .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|x| label_for_cell(*x))
            .y_label_formatter(&|y| label_for_cell(*y))
            .draw()
            .map_err(chart_err)?;

        for (row, row_values) in matrix.iter().enumerate() {
            for (col_idx, &value) in row_values.iter().enumerate() {
                let x = col_idx as f64;
                // Row 0 at the top, matching the tabular reading order.
                let y = (n - 1 - row) as f64;
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(x, y), (x + 1.0, y + 1.0)],
                        correlation_color(value).filled(),
                    )))
                    .map_err(chart_err)?;
                chart
                    .draw_series(std::iter::once(Text::new(
                        format!("{value:.2}"),
                        (x + 0.35, y + 0.55),
                        ("sans-serif", 16).into_font().color(&BLACK),
                    )))
                    .map_err(chart_err)?;
            }
        }

        root.present().map_err(chart_err)?;
    }
    Ok(path)
}

fn label_for_cell(position: f64) -> String {
    let idx = position.floor() as usize;
    CORRELATION_COLUMNS
        .get(idx)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Blue for -1, white for 0, red for +1; NaN renders as grey.
fn correlation_color(value: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(180, 180, 180);
    }
    let clamped = value.clamp(-1.0, 1.0);
    if clamped >= 0.0 {
        let fade = (255.0 * (1.0 - clamped)) as u8;
        RGBColor(255, fade, fade)
    } else {
        let fade = (255.0 * (1.0 + clamped)) as u8;
        RGBColor(fade, fade, 255)
    }
}

/// Scatter of delivery duration against profit.
pub fn duration_vs_profit_scatter(
    df: &DataFrame,
    config: &AnalysisConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let path = out_dir.join("duration_vs_profit.png");

    let duration = df.column(schema::DURATION_MINS)?.f64()?;
    let profit = df.column(schema::PROFIT)?.f64()?;
    let points: Vec<(f64, f64)> = duration
        .iter()
        .zip(profit.iter())
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();
    if points.is_empty() {
        return Err(PipelineError::Chart(
            "duration scatter needs rows with both duration and profit".to_string(),
        ));
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in &points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    let x_pad = (x_max - x_min).abs().max(1.0) * 0.05;
    let y_pad = (y_max - y_min).abs().max(1.0) * 0.05;

    {
        let root = BitMapBackend::new(&path, (config.chart_width, config.chart_height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Delivery Duration vs Profit", ("sans-serif", 28))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min - x_pad..x_max + x_pad, y_min - y_pad..y_max + y_pad)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc(schema::DURATION_MINS)
            .y_desc(schema::PROFIT)
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|point| Circle::new(*point, 3, RGBColor(128, 0, 128).mix(0.6).filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(path)
}
