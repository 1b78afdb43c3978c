//! In-memory `DailySource` for the binary's tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tickerboard_market::error::Result;
use tickerboard_market::schema::TimeSeriesDaily;
use tickerboard_market::{DailySource, FetchError};

pub const AAPL: &str = r#"{ "Time Series (Daily)": {
    "2024-01-03": { "4. close": "110.0", "5. volume": "1200" },
    "2024-01-02": { "4. close": "100.0", "5. volume": "1000" }
} }"#;

pub const MSFT: &str = r#"{ "Time Series (Daily)": {
    "2024-01-03": { "4. close": "372.5", "5. volume": "2100" },
    "2024-01-02": { "4. close": "370.0", "5. volume": "2000" }
} }"#;

/// Serves canned bodies per symbol, optionally after a delay, and counts
/// every request. Unknown symbols answer like the API does for a bad ticker.
#[derive(Default)]
pub struct StubSource {
    bodies: HashMap<&'static str, (&'static str, u64)>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn with(mut self, symbol: &'static str, body: &'static str, delay_ms: u64) -> Self {
        self.bodies.insert(symbol, (body, delay_ms));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DailySource for StubSource {
    async fn daily(&self, symbol: &str) -> Result<TimeSeriesDaily> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.bodies.get(symbol) {
            Some((body, delay_ms)) => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(serde_json::from_str(body)?)
            }
            None => Err(FetchError::MalformedResponse(format!(
                "Invalid API call for {symbol}"
            ))),
        }
    }
}
