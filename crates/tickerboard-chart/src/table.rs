use serde::Serialize;
use tickerboard_market::TrackedSymbol;

/// One row of the summary table under the chart.
///
/// `change` and `change_percent` need two days of data; with fewer they are
/// `None` rather than computed against a missing day.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub symbol: String,
    pub latest_price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<u64>,
}

pub fn summarize(stock: &TrackedSymbol) -> SummaryRow {
    let latest = stock.latest();
    let previous = stock.previous();

    let change = latest.zip(previous).map(|(l, p)| l.price - p.price);
    let change_percent = change
        .zip(previous)
        .filter(|(_, p)| p.price != 0.0)
        .map(|(c, p)| c / p.price * 100.0);

    SummaryRow {
        symbol: stock.symbol.clone(),
        latest_price: latest.map(|l| l.price),
        change,
        change_percent,
        volume: latest.map(|l| l.volume),
    }
}

pub fn summary_rows(tracked: &[TrackedSymbol]) -> Vec<SummaryRow> {
    tracked.iter().map(summarize).collect()
}

const MISSING: &str = "-";

impl SummaryRow {
    /// `true` for a gain or no movement, `false` for a loss, `None` when
    /// there is nothing to compare.
    pub fn is_gain(&self) -> Option<bool> {
        self.change.map(|c| c >= 0.0)
    }

    pub fn price_text(&self) -> String {
        self.latest_price
            .map(|p| format!("${p:.2}"))
            .unwrap_or_else(|| MISSING.to_string())
    }

    pub fn change_text(&self) -> String {
        self.change
            .map(|c| format!("{c:+.2}"))
            .unwrap_or_else(|| MISSING.to_string())
    }

    pub fn change_percent_text(&self) -> String {
        self.change_percent
            .map(|c| format!("{c:+.2}%"))
            .unwrap_or_else(|| MISSING.to_string())
    }

    pub fn volume_text(&self) -> String {
        self.volume
            .map(group_thousands)
            .unwrap_or_else(|| MISSING.to_string())
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
