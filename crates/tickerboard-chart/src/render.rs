use crate::model::{Axis, ChartModel};
use crate::options::Theme;
use crate::palette::Rgba;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::HSLColor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SIZE: (u32, u32) = (1280, 720);

#[derive(Error, Debug)]
#[error("failed to {stage}: {message}")]
pub struct RenderError {
    stage: &'static str,
    message: String,
}

fn fail(stage: &'static str, e: impl std::fmt::Display) -> RenderError {
    RenderError {
        stage,
        message: e.to_string(),
    }
}

/// Draw the dual-axis chart to an SVG file at `path`.
pub fn render_svg(
    model: &ChartModel,
    theme: Theme,
    path: &Path,
    size: (u32, u32),
) -> Result<(), RenderError> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw(&root, model, theme)?;
    debug!("Chart written to {}", path.display());
    Ok(())
}

/// Same as [`render_svg`], returning the document instead of writing it.
pub fn render_svg_string(
    model: &ChartModel,
    theme: Theme,
    size: (u32, u32),
) -> Result<String, RenderError> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
        draw(&root, model, theme)?;
    }
    Ok(buffer)
}

fn rgba(c: Rgba) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.a)
}

/// Pad a value range by 10% each side so lines don't sit on the frame.
fn padded(bounds: Option<(f64, f64)>, floor: f64) -> (f64, f64) {
    let (lo, hi) = bounds.unwrap_or((floor, floor + 1.0));
    let span = (hi - lo).max(hi.abs() * 0.01).max(1e-8);
    let pad = span * 0.1;
    ((lo - pad).max(floor), hi + pad)
}

fn draw(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    model: &ChartModel,
    theme: Theme,
) -> Result<(), RenderError> {
    let text = rgba(theme.text());
    let grid = rgba(theme.grid());
    let canvas = rgba(theme.canvas());

    root.fill(&canvas).map_err(|e| fail("fill canvas", e))?;

    let labels = &model.labels;
    let visible = labels.len();
    let x_max = visible.saturating_sub(1).max(1);
    let (price_lo, price_hi) = padded(model.bounds(Axis::Price), 0.0);
    let (_, volume_hi) = padded(model.bounds(Axis::Volume), 0.0);

    let mut chart = ChartBuilder::on(root)
        .caption("Stock Market Dashboard", ("sans-serif", 28.0).into_font().color(&text))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .right_y_label_area_size(90)
        .build_cartesian_2d(0usize..x_max, price_lo..price_hi)
        .map_err(|e| fail("build chart", e))?
        .set_secondary_coord(0usize..x_max, 0f64..volume_hi);

    let date_label = |i: &usize| labels.get(*i).map(|d| d.to_string()).unwrap_or_default();
    let price_label = |v: &f64| format!("{v:.2}");
    let volume_label = |v: &f64| format!("{v:.0}");

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price ($)")
        .x_labels(visible.clamp(2, 8))
        .x_label_formatter(&date_label)
        .y_label_formatter(&price_label)
        .axis_desc_style(("sans-serif", 15.0).into_font().color(&text))
        .label_style(("sans-serif", 12.0).into_font().color(&text))
        .axis_style(text.stroke_width(1))
        .bold_line_style(grid.stroke_width(1))
        .light_line_style(TRANSPARENT.stroke_width(0))
        .draw()
        .map_err(|e| fail("draw price axis", e))?;

    chart
        .configure_secondary_axes()
        .y_desc("Volume")
        .y_label_formatter(&volume_label)
        .axis_desc_style(("sans-serif", 15.0).into_font().color(&text))
        .label_style(("sans-serif", 12.0).into_font().color(&text))
        .axis_style(text.stroke_width(1))
        .draw()
        .map_err(|e| fail("draw volume axis", e))?;

    for dataset in &model.datasets {
        let c = dataset.color;
        let color = HSLColor(c.hue / 360.0, c.saturation / 100.0, c.lightness / 100.0).to_rgba();
        let points: Vec<(usize, f64)> = dataset
            .values
            .iter()
            .copied()
            .take(visible)
            .enumerate()
            .collect();

        let anno = match dataset.axis {
            Axis::Price => chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(|e| fail("draw price series", e))?,
            Axis::Volume => chart
                .draw_secondary_series(LineSeries::new(points, color.stroke_width(1)))
                .map_err(|e| fail("draw volume series", e))?,
        };
        anno.label(dataset.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if !model.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", 12.0).into_font().color(&text))
            .background_style(canvas.mix(0.8).filled())
            .border_style(text.stroke_width(1))
            .draw()
            .map_err(|e| fail("draw legend", e))?;
    }

    root.present().map_err(|e| fail("render chart", e))?;
    Ok(())
}
