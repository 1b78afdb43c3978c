use tickerboard_chart::{build_chart_model, summary_rows, ChartModel, SummaryRow, Theme};
use tickerboard_market::{DateRange, TrackedSymbol};

/// A symbol whose last add attempt failed, shown as its own table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub symbol: String,
    pub reason: String,
}

/// Everything the dashboard holds between user actions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Insertion (or completion) order, one entry per symbol.
    pub tracked: Vec<TrackedSymbol>,
    /// Range applied to the next add; existing entries keep what they fetched.
    pub range: DateRange,
    pub theme: Theme,
    pub failures: Vec<FetchFailure>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Add(TrackedSymbol),
    Remove(String),
    SetRange(DateRange),
    ToggleTheme,
    FetchFailed { symbol: String, reason: String },
}

impl AppState {
    pub fn new(range: DateRange, theme: Theme) -> Self {
        Self {
            range,
            theme,
            ..Default::default()
        }
    }

    pub fn is_tracked(&self, symbol: &str) -> bool {
        self.tracked.iter().any(|s| s.symbol == symbol)
    }

    /// Apply one transition and hand back the resulting state.
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::Add(stock) => {
                if !self.is_tracked(&stock.symbol) {
                    self.failures.retain(|f| f.symbol != stock.symbol);
                    self.tracked.push(stock);
                }
            }

            Action::Remove(symbol) => {
                self.tracked.retain(|s| s.symbol != symbol);
                self.failures.retain(|f| f.symbol != symbol);
            }

            Action::SetRange(range) => self.range = range,

            Action::ToggleTheme => self.theme = self.theme.toggled(),

            Action::FetchFailed { symbol, reason } => {
                if !self.is_tracked(&symbol) {
                    self.failures.retain(|f| f.symbol != symbol);
                    self.failures.push(FetchFailure { symbol, reason });
                }
            }
        }
        self
    }

    pub fn chart_model(&self) -> ChartModel {
        build_chart_model(&self.tracked)
    }

    pub fn rows(&self) -> Vec<SummaryRow> {
        summary_rows(&self.tracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tickerboard_market::DailyRecord;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    fn stock(symbol: &str, price: f64) -> TrackedSymbol {
        TrackedSymbol::new(
            symbol,
            vec![DailyRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                price,
                volume: 100,
            }],
        )
    }

    fn symbols(state: &AppState) -> Vec<&str> {
        state.tracked.iter().map(|s| s.symbol.as_str()).collect()
    }

    #[test]
    fn test_add_appends_in_order() {
        let state = AppState::new(range(), Theme::Light)
            .reduce(Action::Add(stock("MSFT", 1.0)))
            .reduce(Action::Add(stock("AAPL", 2.0)));
        assert_eq!(symbols(&state), vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let before = AppState::new(range(), Theme::Light).reduce(Action::Add(stock("AAPL", 1.0)));
        let after = before.clone().reduce(Action::Add(stock("AAPL", 99.0)));
        assert_eq!(before, after);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let before = AppState::new(range(), Theme::Dark)
            .reduce(Action::Add(stock("MSFT", 1.0)))
            .reduce(Action::Add(stock("NVDA", 2.0)));
        let after = before
            .clone()
            .reduce(Action::Add(stock("AAPL", 3.0)))
            .reduce(Action::Remove("AAPL".to_string()));
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_preserves_order_of_rest() {
        let state = AppState::new(range(), Theme::Light)
            .reduce(Action::Add(stock("A", 1.0)))
            .reduce(Action::Add(stock("B", 1.0)))
            .reduce(Action::Add(stock("C", 1.0)))
            .reduce(Action::Remove("B".to_string()));
        assert_eq!(symbols(&state), vec!["A", "C"]);

        let unchanged = state.clone().reduce(Action::Remove("ZZZ".to_string()));
        assert_eq!(state, unchanged);
    }

    #[test]
    fn test_set_range_leaves_tracked_alone() {
        let state = AppState::new(range(), Theme::Light).reduce(Action::Add(stock("AAPL", 1.0)));
        let later = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
        );
        let next = state.clone().reduce(Action::SetRange(later));
        assert_eq!(next.range, later);
        assert_eq!(next.tracked, state.tracked);
    }

    #[test]
    fn test_toggle_theme() {
        let state = AppState::new(range(), Theme::Light).reduce(Action::ToggleTheme);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(state.reduce(Action::ToggleTheme).theme, Theme::Light);
    }

    #[test]
    fn test_failure_row_cleared_by_success_or_remove() {
        let failed = AppState::new(range(), Theme::Light).reduce(Action::FetchFailed {
            symbol: "AAPL".to_string(),
            reason: "timeout".to_string(),
        });
        assert!(failed.tracked.is_empty());
        assert_eq!(failed.failures.len(), 1);

        let retried = failed.clone().reduce(Action::FetchFailed {
            symbol: "AAPL".to_string(),
            reason: "rate limited".to_string(),
        });
        assert_eq!(retried.failures.len(), 1);
        assert_eq!(retried.failures[0].reason, "rate limited");

        let added = failed.clone().reduce(Action::Add(stock("AAPL", 1.0)));
        assert!(added.failures.is_empty());

        let removed = failed.reduce(Action::Remove("AAPL".to_string()));
        assert!(removed.failures.is_empty());
    }

    #[test]
    fn test_derived_views_follow_tracked() {
        let state = AppState::new(range(), Theme::Light)
            .reduce(Action::Add(stock("AAPL", 1.0)))
            .reduce(Action::Add(stock("MSFT", 2.0)));
        assert_eq!(state.chart_model().datasets.len(), 4);
        assert_eq!(state.rows().len(), 2);
        assert!(AppState::default().chart_model().is_empty());
    }
}
