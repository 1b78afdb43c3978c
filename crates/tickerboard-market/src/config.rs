use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much history the endpoint returns per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSize {
    /// Latest 100 trading days.
    #[default]
    Compact,
    /// Entire available history.
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

impl FromStr for OutputSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(OutputSize::Compact),
            "full" => Ok(OutputSize::Full),
            _ => Err(ConfigError::Invalid {
                key: "ALPHAVANTAGE_OUTPUT_SIZE",
                value: s.to_string(),
            }),
        }
    }
}

/// Settings for talking to the market-data endpoint.
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub output_size: OutputSize,
    pub user_agent: String,
    pub timeout: Duration,
    /// Upper bound on requests in flight at once.
    pub max_in_flight: usize,
}

// keep the key out of log lines
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("output_size", &self.output_size)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("max_in_flight", &self.max_in_flight)
            .finish()
    }
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_URL.to_string(),
            output_size: OutputSize::default(),
            user_agent: concat!("tickerboard/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_in_flight: num_cpus::get(),
        }
    }

    /// Read the settings from the process environment, after `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Build the settings from any key -> value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ALPHAVANTAGE_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("ALPHAVANTAGE_API_KEY"))?;
        let mut config = Self::new(api_key.trim());

        if let Some(url) = lookup("ALPHAVANTAGE_URL") {
            config.base_url = url;
        }
        if let Some(size) = lookup("ALPHAVANTAGE_OUTPUT_SIZE") {
            config.output_size = size.parse()?;
        }
        if let Some(agent) = lookup("USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(secs) = lookup("TICKERBOARD_TIMEOUT_SECS") {
            let secs = parse_positive("TICKERBOARD_TIMEOUT_SECS", &secs)?;
            config.timeout = Duration::from_secs(secs as u64);
        }
        if let Some(n) = lookup("TICKERBOARD_MAX_IN_FLIGHT") {
            config.max_in_flight = parse_positive("TICKERBOARD_MAX_IN_FLIGHT", &n)?;
        }

        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
}
