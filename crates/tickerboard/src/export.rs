use crate::state::AppState;
use anyhow::Result;
use std::path::Path;
use tickerboard_chart::{render_svg, ChartDocument, ChartOptions};
use tracing::info;

/// Draw the current chart to an SVG at `path`.
pub fn write_svg(state: &AppState, path: &Path, size: (u32, u32)) -> Result<()> {
    let model = state.chart_model();
    render_svg(&model, state.theme, path, size)?;
    info!(
        "Chart of {} series written to {}",
        model.datasets.len(),
        path.display()
    );
    Ok(())
}

/// Chart data and display options as one pretty-printed JSON document.
pub fn chart_json(state: &AppState) -> Result<String> {
    let model = state.chart_model();
    let options = ChartOptions::for_theme(state.theme);
    Ok(ChartDocument::new(&model, &options).to_json_pretty()?)
}

pub async fn write_json(state: &AppState, path: &Path) -> Result<()> {
    tokio::fs::write(path, chart_json(state)?).await?;
    info!("Chart document written to {}", path.display());
    Ok(())
}
