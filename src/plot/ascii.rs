//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Two charts, matching the dashboard's panels:
//! - cumulative: current year `*`, prior year aligned `.`
//! - yoy: YoY % `*` against the 100 baseline `-`; missing values leave gaps
//!
//! Points are spaced evenly by bucket index, not by date.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{BASELINE_PCT, DerivedPoint, Metric};

/// Minimum padding above and below the YoY line, in percentage points.
const YOY_MIN_PAD: f64 = 6.0;
/// YoY padding as a fraction of the plotted span.
const YOY_PAD_FRAC: f64 = 0.2;
/// Cumulative padding as a fraction of the plotted span.
const CUMULATIVE_PAD_FRAC: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotSeries {
    Cumulative,
    Yoy,
}

/// Render `points` as the chosen chart.
pub fn render_series_plot(
    points: &[DerivedPoint],
    metric: Metric,
    which: PlotSeries,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return "Plot: no data\n".to_string();
    };
    let x_span = (first.label.as_str(), last.label.as_str());

    match which {
        PlotSeries::Cumulative => render_cumulative(points, metric, x_span, width, height),
        PlotSeries::Yoy => render_yoy(points, x_span, width, height),
    }
}

fn render_cumulative(
    points: &[DerivedPoint],
    metric: Metric,
    (x_first, x_last): (&str, &str),
    width: usize,
    height: usize,
) -> String {
    let current: Vec<Option<f64>> = points.iter().map(|p| Some(p.cumulative_current)).collect();
    let prior: Vec<Option<f64>> = points.iter().map(|p| Some(p.cumulative_prior)).collect();

    let (y_min, y_max) = y_range(current.iter().chain(prior.iter()).flatten().copied());
    let (y_min, y_max) = pad_range(y_min, y_max, CUMULATIVE_PAD_FRAC, 0.0);

    let mut grid = vec![vec![' '; width]; height];
    // Current year first so it wins where the lines cross.
    draw_series(&mut grid, &current, y_min, y_max, '*');
    draw_series(&mut grid, &prior, y_min, y_max, '.');

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: cum_{} current (*) vs prior (.) | x=[{x_first}, {x_last}] | y=[{y_min:.0}, {y_max:.0}]\n",
        metric.as_str()
    ));
    push_grid(&mut out, grid);
    out
}

fn render_yoy(points: &[DerivedPoint], (x_first, x_last): (&str, &str), width: usize, height: usize) -> String {
    let yoy: Vec<Option<f64>> = points.iter().map(|p| p.yoy_pct).collect();

    // The baseline is always in range, even when every value is missing.
    let (y_min, y_max) = y_range(yoy.iter().flatten().copied().chain([BASELINE_PCT]));
    let (y_min, y_max) = pad_range(y_min, y_max, YOY_PAD_FRAC, YOY_MIN_PAD);

    let mut grid = vec![vec![' '; width]; height];
    draw_series(&mut grid, &yoy, y_min, y_max, '*');
    let base_row = map_y(BASELINE_PCT, y_min, y_max, height);
    draw_line(&mut grid, 0, base_row, width - 1, base_row, '-');

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: yoy_pct (*) vs baseline {BASELINE_PCT:.0} (-) | x=[{x_first}, {x_last}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    push_grid(&mut out, grid);
    out
}

fn push_grid(out: &mut String, grid: Vec<Vec<char>>) {
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
}

/// `(min, max)` of the values; `(0, 0)` when there are none.
fn y_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for y in values.filter(|y| y.is_finite()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() {
        (min_y, max_y)
    } else {
        (0.0, 0.0)
    }
}

/// Pad by `frac` of the span, at least `min_pad`, and never to a zero-height range.
fn pad_range(min: f64, max: f64, frac: f64, min_pad: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let mut pad = (span * frac).max(min_pad);
    if span + 2.0 * pad <= 1e-12 {
        pad = 1.0;
    }
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Connect consecutive present values; a `None` breaks the line.
fn draw_series(grid: &mut [Vec<char>], values: &[Option<f64>], y_min: f64, y_max: f64, ch: char) {
    let height = grid.len();
    let width = grid.first().map_or(0, Vec::len);
    let n = values.len();

    let mut prev = None;
    for (i, v) in values.iter().enumerate() {
        let Some(y) = v else {
            prev = None;
            continue;
        };
        let x = map_x(i, n, width);
        let yy = map_y(*y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, yy, ch),
            None => draw_line(grid, x, yy, x, yy, ch),
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish); only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
