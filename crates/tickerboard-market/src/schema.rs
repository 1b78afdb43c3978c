use crate::error::{FetchError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Body of a `TIME_SERIES_DAILY` response, e.g.,
///
/// ```json
/// {
///     "Meta Data": { ... },
///     "Time Series (Daily)": {
///         "2024-01-03": {
///             "1. open": "101.0000",
///             "2. high": "111.0000",
///             "3. low": "99.0000",
///             "4. close": "110.0000",
///             "5. volume": "1200"
///         },
///         ...
///     }
/// }
/// ```
///
/// An unknown symbol or an exhausted quota comes back as a 200 with one of
/// the message fields set and no series.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct TimeSeriesDaily {
    #[serde(rename = "Time Series (Daily)")]
    pub series: Option<BTreeMap<String, DailyBar>>,

    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,

    #[serde(rename = "Note")]
    pub note: Option<String>,

    #[serde(rename = "Information")]
    pub information: Option<String>,
}

/// One day of the upstream feed; the API quotes every number as a string.
///
/// Both fields may be absent on a day; that only matters for days that end
/// up inside the requested range.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyBar {
    #[serde(rename = "4. close")]
    pub close: Option<String>,

    #[serde(rename = "5. volume")]
    pub volume: Option<String>,
}

impl TimeSeriesDaily {
    /// Unwrap the date -> bar map, or explain why it is missing.
    pub fn into_series(self) -> Result<BTreeMap<String, DailyBar>> {
        match self.series {
            Some(series) => Ok(series),
            None => {
                let reason = self
                    .error_message
                    .or(self.note)
                    .or(self.information)
                    .unwrap_or_else(|| "missing \"Time Series (Daily)\" field".to_string());
                Err(FetchError::MalformedResponse(reason))
            }
        }
    }
}
