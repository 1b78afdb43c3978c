use crate::config::ApiConfig;
use crate::error::Result;
use crate::schema::TimeSeriesDaily;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, trace};

/// Anything that can hand back the raw daily history of a symbol.
#[async_trait]
pub trait DailySource: Send + Sync {
    async fn daily(&self, symbol: &str) -> Result<TimeSeriesDaily>;
}

/// The Alpha Vantage `TIME_SERIES_DAILY` endpoint.
pub struct AlphaVantage {
    http_client: Client,
    config: ApiConfig,
}

impl AlphaVantage {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http_client = reqwest::ClientBuilder::new()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl DailySource for AlphaVantage {
    async fn daily(&self, symbol: &str) -> Result<TimeSeriesDaily> {
        let url = &self.config.base_url;
        trace!("Requesting daily series for [{symbol}] from {url}");

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", self.config.output_size.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                let e = e.without_url();
                error!("[{symbol}] daily series request error: {e}");
                e
            })?
            .bytes()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("[{symbol}] daily series body error: {e}");
                e
            })?;

        // error check the deserialization
        trace!("Deserializing daily series for [{symbol}]");
        match serde_json::from_slice::<TimeSeriesDaily>(&response) {
            Ok(data) => Ok(data),
            Err(e) => {
                error!("[{symbol}] daily series deserialization error: {e}");
                Err(e.into())
            }
        }
    }
}
