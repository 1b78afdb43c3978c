use crate::palette::SeriesColor;
use chrono::NaiveDate;
use serde::Serialize;
use tickerboard_market::TrackedSymbol;

/// Which vertical scale a dataset is plotted against.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Price,
    Volume,
}

impl Axis {
    /// Scale id the renderer knows this axis by.
    pub fn id(&self) -> &'static str {
        match self {
            Axis::Price => "y",
            Axis::Volume => "y1",
        }
    }
}

/// One line on the chart.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DatasetSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub axis: Axis,
    pub color: SeriesColor,
}

/// Everything the renderer needs, derived from the tracked symbols.
///
/// Rebuilt from scratch whenever the tracked list changes; never edited.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct ChartModel {
    pub labels: Vec<NaiveDate>,
    pub datasets: Vec<DatasetSeries>,
}

/// Assemble the date axis and the price/volume datasets, two per symbol, in
/// the order the symbols were tracked.
///
/// The label axis comes from the first symbol alone; the others are assumed
/// to cover the same days.
pub fn build_chart_model(tracked: &[TrackedSymbol]) -> ChartModel {
    let labels: Vec<NaiveDate> = tracked
        .first()
        .map(|first| first.dates().collect())
        .unwrap_or_default();

    let datasets = tracked
        .iter()
        .enumerate()
        .flat_map(|(index, stock)| {
            [
                DatasetSeries {
                    label: format!("{} Price", stock.symbol),
                    values: stock.data.iter().map(|d| d.price).collect(),
                    axis: Axis::Price,
                    color: SeriesColor::price(index),
                },
                DatasetSeries {
                    label: format!("{} Volume", stock.symbol),
                    values: stock.data.iter().map(|d| d.volume as f64).collect(),
                    axis: Axis::Volume,
                    color: SeriesColor::volume(index),
                },
            ]
        })
        .collect();

    ChartModel { labels, datasets }
}

impl ChartModel {
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn on_axis(&self, axis: Axis) -> impl Iterator<Item = &DatasetSeries> {
        self.datasets.iter().filter(move |d| d.axis == axis)
    }

    /// Smallest and largest value plotted against `axis`, limited to the
    /// points that have a label.
    pub fn bounds(&self, axis: Axis) -> Option<(f64, f64)> {
        let visible = self.labels.len();
        self.on_axis(axis)
            .flat_map(|d| d.values.iter().take(visible).copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
