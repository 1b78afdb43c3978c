use crate::model::ChartModel;
use crate::options::{ChartOptions, LINE_TENSION};
use serde::Serialize;

/// A chart model plus its options, laid out the way browser charting
/// libraries take them (`{ data: { labels, datasets }, options }`).
#[derive(Serialize, Debug)]
pub struct ChartDocument<'a> {
    pub data: ChartData<'a>,
    pub options: &'a ChartOptions,
}

#[derive(Serialize, Debug)]
pub struct ChartData<'a> {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset<'a> {
    pub label: &'a str,
    pub data: &'a [f64],
    pub border_color: String,
    pub background_color: String,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: &'static str,
    pub tension: f64,
}

impl<'a> ChartDocument<'a> {
    pub fn new(model: &'a ChartModel, options: &'a ChartOptions) -> Self {
        let labels = model.labels.iter().map(|d| d.to_string()).collect();
        let datasets = model
            .datasets
            .iter()
            .map(|d| ChartDataset {
                label: &d.label,
                data: &d.values,
                border_color: d.color.border(),
                background_color: d.color.background(),
                y_axis_id: d.axis.id(),
                tension: LINE_TENSION,
            })
            .collect();

        Self {
            data: ChartData { labels, datasets },
            options,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_chart_model;
    use crate::options::Theme;
    use chrono::NaiveDate;
    use tickerboard_market::{DailyRecord, TrackedSymbol};

    #[test]
    fn test_document_layout() {
        let tracked = vec![TrackedSymbol::new(
            "AAPL",
            vec![
                DailyRecord {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    price: 100.0,
                    volume: 1000,
                },
                DailyRecord {
                    date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                    price: 110.0,
                    volume: 1200,
                },
            ],
        )];
        let model = build_chart_model(&tracked);
        let options = ChartOptions::for_theme(Theme::Light);
        let json = serde_json::to_value(ChartDocument::new(&model, &options)).unwrap();

        assert_eq!(json["data"]["labels"][0], "2024-01-02");
        assert_eq!(json["data"]["datasets"][0]["label"], "AAPL Price");
        assert_eq!(json["data"]["datasets"][0]["yAxisID"], "y");
        assert_eq!(json["data"]["datasets"][0]["borderColor"], "hsl(0, 70%, 50%)");
        assert_eq!(json["data"]["datasets"][1]["yAxisID"], "y1");
        assert_eq!(json["data"]["datasets"][1]["data"][1], 1200.0);
        assert_eq!(json["data"]["datasets"][1]["tension"], 0.1);
        assert_eq!(json["options"]["scales"]["y1"]["title"]["text"], "Volume");
    }

    #[test]
    fn test_empty_document() {
        let model = ChartModel::default();
        let options = ChartOptions::for_theme(Theme::Dark);
        let text = ChartDocument::new(&model, &options).to_json_pretty().unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["data"]["labels"].as_array().unwrap().len(), 0);
        assert_eq!(json["data"]["datasets"].as_array().unwrap().len(), 0);
    }
}
