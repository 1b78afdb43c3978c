use thiserror::Error;

/// Everything that can go wrong while acquiring a daily series.
///
/// Callers are expected to collapse all three into a single "fetch failed"
/// outcome; the variants exist so the log line says which stage broke.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent, timed out, or came back with a
    /// non-success status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body arrived but did not contain the daily time series.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A record carried a date, price or volume that would not parse.
    #[error("parse error on {date}: {message}")]
    Parse { date: String, message: String },
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::MalformedResponse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Problems reading the API settings out of the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
