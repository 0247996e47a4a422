//! Ignition charts
//!
//! - [`plot_temperature_traces`]: T(t) of every grid point, ignition marked
//! - [`plot_delay_curve`]: delay vs the swept parameter (one-axis sweeps)
//! - [`plot_delay_family`]: delay vs the inner parameter, one curve per
//!   outer value (two-axis sweeps)
//!
//! Runs that never ignite have no delay point; the curve skips them.
//! The backend is chosen from the file extension: `.svg` gives SVG, anything
//! else a bitmap.

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use crate::error::{StudyError, StudyResult};
use crate::output::visualization::config::{PlotConfig, NO_TITLE};
use crate::sweep::{SweepAxis, SweepTable};

/// One labelled curve: (x, y) points
type Series = (String, Vec<(f64, f64)>);

// =================================================================================================
// Public API
// =================================================================================================

/// Plot the temperature history of every grid point
///
/// # Example
///
/// ```rust,ignore
/// plot_temperature_traces(&table, "pressure_temperature.png", None)?;
/// ```
pub fn plot_temperature_traces(
    table: &SweepTable,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> StudyResult<()> {
    if table.is_empty() {
        return Err(StudyError::Plot("no trajectories to plot".to_string()));
    }

    let default_config = PlotConfig::temperature_traces(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    let series: Vec<Series> = table
        .records()
        .iter()
        .map(|record| {
            let points = record
                .trajectory
                .samples()
                .iter()
                .map(|s| (s.time * 1e3, s.temperature()))
                .collect();
            (format!("{} ({})", record.point, record.ignition), points)
        })
        .collect();

    let markers: Vec<(f64, f64)> = if config.mark_ignition {
        table
            .records()
            .iter()
            .filter_map(|record| {
                let index = record.ignition.sample_index?;
                let sample = record.trajectory.samples().get(index)?;
                Some((sample.time * 1e3, sample.temperature()))
            })
            .collect()
    } else {
        Vec::new()
    };

    render(output_path, config, |backend_config, root| {
        draw_series_impl(root, &series, &markers, backend_config)
    })
}

/// Plot ignition delay against the swept parameter of a one-axis sweep
///
/// Two-axis sweeps are forwarded to [`plot_delay_family`].
pub fn plot_delay_curve(table: &SweepTable, output_path: &str, config: Option<&PlotConfig>) -> StudyResult<()> {
    if table.grid().inner.is_some() {
        return plot_delay_family(table, output_path, config);
    }

    let axis = &table.grid().outer;
    let mut owned = config.cloned().unwrap_or_else(|| PlotConfig::delay_curve(NO_TITLE));
    if owned.xlabel.is_empty() {
        owned.xlabel = axis_label(axis);
    }

    let matrix = table.delay_matrix();
    let points = delay_points(axis, (0..axis.len()).map(|i| matrix[[i, 0]]));
    let series = vec![("ignition delay".to_string(), points)];

    render(output_path, &owned, |backend_config, root| {
        draw_series_impl(root, &series, &[], backend_config)
    })
}

/// Plot ignition delay against the inner parameter, one curve per outer value
pub fn plot_delay_family(table: &SweepTable, output_path: &str, config: Option<&PlotConfig>) -> StudyResult<()> {
    let grid = table.grid();
    let Some(inner) = &grid.inner else {
        return plot_delay_curve(table, output_path, config);
    };

    let mut owned = config.cloned().unwrap_or_else(|| PlotConfig::delay_curve(NO_TITLE));
    if owned.xlabel.is_empty() {
        owned.xlabel = axis_label(inner);
    }

    let matrix = table.delay_matrix();
    let series: Vec<Series> = grid
        .outer
        .values
        .iter()
        .enumerate()
        .map(|(i, outer_value)| {
            let label = format!("{} = {} {}", grid.outer.parameter, outer_value, grid.outer.parameter.unit());
            (label, delay_points(inner, (0..inner.len()).map(|j| matrix[[i, j]])))
        })
        .collect();

    render(output_path, &owned, |backend_config, root| {
        draw_series_impl(root, &series, &[], backend_config)
    })
}

// =================================================================================================
// Helpers
// =================================================================================================

fn axis_label(axis: &SweepAxis) -> String {
    format!("{} ({})", axis.parameter.label(), axis.parameter.unit())
}

/// (axis value, delay in ms) for every ignited point
fn delay_points(axis: &SweepAxis, delays: impl Iterator<Item = Option<f64>>) -> Vec<(f64, f64)> {
    axis.values
        .iter()
        .zip(delays)
        .filter_map(|(x, delay)| delay.map(|d| (*x, d * 1e3)))
        .collect()
}

/// Axis range covering `values` with a 5 % margin, never empty
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span <= 0.0 {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return (min - pad, max + pad);
    }
    (min - 0.05 * span, max + 0.05 * span)
}

/// Pick the backend from the extension and map plotting errors
fn render<F>(output_path: &str, config: &PlotConfig, draw: F) -> StudyResult<()>
where
    F: Fn(&PlotConfig, BackendArea<'_>) -> Result<(), Box<dyn Error>>,
{
    let ext = Path::new(output_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png");

    let result = match ext {
        "svg" => {
            let root = SVGBackend::new(output_path, (config.width, config.height)).into_drawing_area();
            draw(config, BackendArea::Svg(root))
        }
        _ => {
            let root = BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();
            draw(config, BackendArea::Bitmap(root))
        }
    };

    result.map_err(|e| StudyError::Plot(format!("{}: {}", output_path, e)))
}

/// Drawing area of either backend
enum BackendArea<'a> {
    Svg(DrawingArea<SVGBackend<'a>, plotters::coord::Shift>),
    Bitmap(DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>),
}

fn draw_series_impl(
    area: BackendArea<'_>,
    series: &[Series],
    markers: &[(f64, f64)],
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    match area {
        BackendArea::Svg(root) => draw_on_area(&root, series, markers, config),
        BackendArea::Bitmap(root) => draw_on_area(&root, series, markers, config),
    }
}

/// Render labelled line series (with point markers) on any drawing area
fn draw_on_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    series: &[Series],
    markers: &[(f64, f64)],
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let (x_min, x_max) = padded_range(series.iter().flat_map(|(_, p)| p.iter().map(|(x, _)| *x)));
    let (y_min, y_max) = padded_range(series.iter().flat_map(|(_, p)| p.iter().map(|(_, y)| *y)));

    root.fill(&config.background)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("sans-serif", 32).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&config.xlabel).y_desc(&config.ylabel);
    if config.show_grid {
        mesh.draw()?;
    } else {
        mesh.disable_mesh().draw()?;
    }

    for (i, (label, points)) in series.iter().enumerate() {
        let color = config.get_series_color(i);
        let style = color.stroke_width(config.line_width);

        chart
            .draw_series(LineSeries::new(points.iter().copied(), style))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));

        // Isolated points (neighbours did not ignite) would not show as lines
        chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))?;
    }

    if !markers.is_empty() {
        chart.draw_series(
            markers
                .iter()
                .map(|&(x, y)| Cross::new((x, y), 6, BLACK.stroke_width(2))),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(config.background.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
