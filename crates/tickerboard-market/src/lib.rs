//! Daily price/volume series for ticker symbols, fetched from the
//! Alpha Vantage `TIME_SERIES_DAILY` endpoint.

pub mod api;
pub mod config;
pub mod error;
pub mod schema;
pub mod series;

pub use api::{AlphaVantage, DailySource};
pub use config::{ApiConfig, OutputSize};
pub use error::{ConfigError, FetchError};
pub use series::{fetch_series, normalize, DailyRecord, DateRange, TrackedSymbol};
