use crate::api::DailySource;
use crate::error::{FetchError, Result};
use crate::schema::TimeSeriesDaily;
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Days covered by the range a fresh dashboard starts with.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// A single trading day, closing price and traded volume.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: u64,
}

/// A symbol the user is watching, with the series fetched when it was added.
///
/// `data` is ascending by date with no repeated dates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackedSymbol {
    pub symbol: String,
    pub data: Vec<DailyRecord>,
}

impl TrackedSymbol {
    pub fn new(symbol: impl Into<String>, data: Vec<DailyRecord>) -> Self {
        Self {
            symbol: symbol.into(),
            data,
        }
    }

    pub fn latest(&self) -> Option<&DailyRecord> {
        self.data.last()
    }

    /// The day before [`latest()`](Self::latest), when there is one.
    pub fn previous(&self) -> Option<&DailyRecord> {
        self.data.len().checked_sub(2).map(|i| &self.data[i])
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.data.iter().map(|d| d.date)
    }
}

/// Inclusive calendar range, `[start, end]`.
///
/// Nothing stops `start` from being after `end`; such a range simply
/// contains no dates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days leading up to and including `end`.
    pub fn ending(end: NaiveDate, days: i64) -> Self {
        Self {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::ending(Local::now().date_naive(), DEFAULT_RANGE_DAYS)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

// -------------------------------------------------------------------------------------------------

/// Fetch the daily history of `symbol` and keep the days inside
/// `[start, end]`, oldest first.
///
/// One request per call. Tracked state is not touched; appending the result
/// is up to the caller, as is checking for duplicates.
pub async fn fetch_series<S>(
    source: &S,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyRecord>>
where
    S: DailySource + ?Sized,
{
    trace!("Fetching daily series for [{symbol}] {start} .. {end}");
    let payload = source.daily(symbol).await?;
    let records = normalize(payload, DateRange::new(start, end))?;
    debug!("[{symbol}] {} daily records in range", records.len());
    Ok(records)
}

/// Filter a raw payload to `range` and turn each surviving day into a
/// [`DailyRecord`], ascending by date.
///
/// Days outside the range are dropped before their numbers are looked at.
pub fn normalize(payload: TimeSeriesDaily, range: DateRange) -> Result<Vec<DailyRecord>> {
    let series = payload.into_series()?;

    let mut records = Vec::with_capacity(series.len());
    for (dated, bar) in series {
        let date = NaiveDate::parse_from_str(dated.trim(), "%Y-%m-%d").map_err(|e| {
            FetchError::Parse {
                date: dated.clone(),
                message: format!("invalid date: {e}"),
            }
        })?;
        if !range.contains(date) {
            continue;
        }

        let close = bar.close.as_deref().ok_or_else(|| FetchError::Parse {
            date: dated.clone(),
            message: "missing closing price".to_string(),
        })?;
        let price = close
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| FetchError::Parse {
                date: dated.clone(),
                message: format!("invalid closing price {close:?}"),
            })?;

        let raw_volume = bar.volume.as_deref().ok_or_else(|| FetchError::Parse {
            date: dated.clone(),
            message: "missing volume".to_string(),
        })?;
        let volume = raw_volume
            .trim()
            .parse::<u64>()
            .map_err(|e| FetchError::Parse {
                date: dated.clone(),
                message: format!("invalid volume {raw_volume:?}: {e}"),
            })?;

        records.push(DailyRecord {
            date,
            price,
            volume,
        });
    }

    // upstream lists newest first
    records.sort_by_key(|r| r.date);
    records.dedup_by_key(|r| r.date);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn payload(body: &str) -> TimeSeriesDaily {
        serde_json::from_str(body).unwrap()
    }

    const WEEK: &str = r#"{
        "Time Series (Daily)": {
            "2024-01-08": { "4. close": "185.5600", "5. volume": "59144500" },
            "2024-01-05": { "4. close": "181.1800", "5. volume": "62303300" },
            "2024-01-04": { "4. close": "181.9100", "5. volume": "71983600" },
            "2024-01-03": { "4. close": "184.2500", "5. volume": "58414500" },
            "2024-01-02": { "4. close": "185.6400", "5. volume": "82488700" }
        }
    }"#;

    struct StaticSource {
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DailySource for StaticSource {
        async fn daily(&self, _symbol: &str) -> Result<TimeSeriesDaily> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_str(self.body)?)
        }
    }

    #[test]
    fn test_normalize_sorts_ascending_within_range() {
        let range = DateRange::new(date("2024-01-03"), date("2024-01-05"));
        let records = normalize(payload(WEEK), range).unwrap();

        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-03"), date("2024-01-04"), date("2024-01-05")]
        );
        assert!(records.windows(2).all(|w| w[0].date < w[1].date));
        assert!(records.iter().all(|r| range.contains(r.date)));
        assert_eq!(records[0].price, 184.25);
        assert_eq!(records[0].volume, 58_414_500);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = DateRange::new(date("2024-01-02"), date("2024-01-08"));
        let records = normalize(payload(WEEK), range).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records.first().unwrap().date, date("2024-01-02"));
        assert_eq!(records.last().unwrap().date, date("2024-01-08"));
    }

    #[test]
    fn test_range_without_trading_days_is_empty() {
        // a weekend
        let range = DateRange::new(date("2024-01-06"), date("2024-01-07"));
        assert!(normalize(payload(WEEK), range).unwrap().is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty_not_error() {
        let range = DateRange::new(date("2024-01-08"), date("2024-01-02"));
        assert!(normalize(payload(WEEK), range).unwrap().is_empty());
    }

    #[test]
    fn test_bad_price_is_parse_error() {
        let body = r#"{ "Time Series (Daily)": {
            "2024-01-02": { "4. close": "n/a", "5. volume": "1000" }
        } }"#;
        let range = DateRange::new(date("2024-01-01"), date("2024-01-31"));
        match normalize(payload(body), range) {
            Err(FetchError::Parse { date, .. }) => assert_eq!(date, "2024-01-02"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_volume_is_parse_error() {
        let body = r#"{ "Time Series (Daily)": {
            "2024-01-02": { "4. close": "100.0", "5. volume": "-5" }
        } }"#;
        let range = DateRange::new(date("2024-01-01"), date("2024-01-31"));
        assert!(matches!(
            normalize(payload(body), range),
            Err(FetchError::Parse { .. })
        ));
    }

    #[test]
    fn test_bad_date_key_is_parse_error() {
        let body = r#"{ "Time Series (Daily)": {
            "yesterday": { "4. close": "100.0", "5. volume": "5" }
        } }"#;
        let range = DateRange::new(date("2024-01-01"), date("2024-01-31"));
        assert!(matches!(
            normalize(payload(body), range),
            Err(FetchError::Parse { .. })
        ));
    }

    #[test]
    fn test_unparsable_day_outside_range_is_ignored() {
        let body = r#"{ "Time Series (Daily)": {
            "2023-12-29": { "4. close": "oops", "5. volume": "5" },
            "2024-01-02": { "4. close": "100.0", "5. volume": "1000" }
        } }"#;
        let range = DateRange::new(date("2024-01-01"), date("2024-01-31"));
        let records = normalize(payload(body), range).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_field_only_matters_inside_range() {
        let body = r#"{ "Time Series (Daily)": {
            "2023-12-29": { "4. close": "99.0" },
            "2024-01-02": { "4. close": "100.0", "5. volume": "1000" }
        } }"#;
        let january = DateRange::new(date("2024-01-01"), date("2024-01-31"));
        assert_eq!(normalize(payload(body), january).unwrap().len(), 1);

        let december = DateRange::new(date("2023-12-01"), date("2023-12-31"));
        match normalize(payload(body), december) {
            Err(FetchError::Parse { date, message }) => {
                assert_eq!(date, "2023-12-29");
                assert!(message.contains("volume"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_repeated_date_keeps_one_record() {
        // both keys trim to the same day
        let body = r#"{ "Time Series (Daily)": {
            " 2024-01-02": { "4. close": "101.0", "5. volume": "1100" },
            "2024-01-02": { "4. close": "100.0", "5. volume": "1000" },
            "2024-01-03": { "4. close": "110.0", "5. volume": "1200" }
        } }"#;
        let range = DateRange::new(date("2024-01-01"), date("2024-01-31"));
        let records = normalize(payload(body), range).unwrap();

        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2024-01-02"), date("2024-01-03")]);
        // first in key order wins
        assert_eq!(records[0].price, 101.0);
    }

    #[test]
    fn test_tracked_symbol_latest_and_previous() {
        let tracked = TrackedSymbol::new(
            "AAPL",
            vec![
                DailyRecord { date: date("2024-01-02"), price: 100.0, volume: 1000 },
                DailyRecord { date: date("2024-01-03"), price: 110.0, volume: 1200 },
            ],
        );
        assert_eq!(tracked.latest().unwrap().price, 110.0);
        assert_eq!(tracked.previous().unwrap().price, 100.0);

        let single = TrackedSymbol::new("MSFT", tracked.data[..1].to_vec());
        assert!(single.previous().is_none());
        assert!(TrackedSymbol::new("X", vec![]).latest().is_none());
    }

    #[test]
    fn test_default_range_spans_thirty_days() {
        let range = DateRange::default();
        assert_eq!((range.end - range.start).num_days(), DEFAULT_RANGE_DAYS);
        assert_eq!(range.end, Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_fetch_series_issues_one_request() {
        let source = StaticSource {
            body: WEEK,
            calls: AtomicUsize::new(0),
        };
        let records = fetch_series(&source, "AAPL", date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_series_propagates_malformed_response() {
        let source = StaticSource {
            body: r#"{ "Information": "premium endpoint" }"#,
            calls: AtomicUsize::new(0),
        };
        let result = fetch_series(&source, "AAPL", date("2024-01-01"), date("2024-01-31")).await;
        assert!(matches!(result, Err(FetchError::MalformedResponse(_))));
    }
}
