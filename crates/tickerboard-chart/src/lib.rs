//! Turns tracked symbols into something a chart can draw: the date axis,
//! one price and one volume dataset per symbol, theme-aware options, the
//! summary table, and an SVG rendering of the lot.

pub mod document;
pub mod model;
pub mod options;
pub mod palette;
pub mod render;
pub mod table;

pub use document::ChartDocument;
pub use model::{build_chart_model, Axis, ChartModel, DatasetSeries};
pub use options::{ChartOptions, Theme};
pub use palette::SeriesColor;
pub use render::{render_svg, render_svg_string, RenderError};
pub use table::{summarize, summary_rows, SummaryRow};
