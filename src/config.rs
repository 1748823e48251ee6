use crate::payments::errors::{SepError, SepResult};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://sep.shaparak.ir";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// SEP gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SepConfig {
    /// Gateway base URL (defaults to https://sep.shaparak.ir)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Terminal identifier assigned by the bank
    pub terminal_id: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SepConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            terminal_id: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SepConfig {
    /// Default settings for `terminal_id`.
    pub fn new(terminal_id: impl Into<String>) -> Self {
        Self {
            terminal_id: terminal_id.into(),
            ..Self::default()
        }
    }

    /// Load from `SEP_BASE_URL`, `SEP_TERMINAL_ID` and `SEP_TIMEOUT_SECS`.
    pub fn from_env() -> SepResult<Self> {
        Self::from_environment(config::Environment::with_prefix("SEP"))
    }

    fn from_environment(environment: config::Environment) -> SepResult<Self> {
        let config: SepConfig = config::Config::builder()
            .add_source(environment)
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| SepError::configuration(format!("Failed to load SEP configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check the base URL, terminal identifier and timeout.
    pub fn validate(&self) -> SepResult<()> {
        let base_url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            SepError::configuration(format!("SEP_BASE_URL is not a valid URL ({}): {}", e, self.base_url))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SepError::configuration(format!(
                "SEP_BASE_URL must be http or https, got {}",
                base_url.scheme()
            )));
        }

        if self.terminal_id.trim().is_empty() {
            return Err(SepError::configuration("SEP_TERMINAL_ID cannot be empty"));
        }
        // Sent verbatim on token requests, so it must match what verify parses.
        if self.terminal_id.trim() != self.terminal_id {
            return Err(SepError::configuration(
                "SEP_TERMINAL_ID must not have surrounding whitespace",
            ));
        }

        if self.timeout_secs == 0 {
            return Err(SepError::configuration("SEP_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(())
    }

    /// Terminal identifier as the integer the verify and reverse APIs expect.
    pub fn terminal_number(&self) -> SepResult<i64> {
        self.terminal_id.parse().map_err(|_| {
            SepError::configuration(format!(
                "Terminal identifier must be numeric, got '{}'",
                self.terminal_id
            ))
        })
    }
}
