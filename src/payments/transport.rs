//! reqwest-backed gateway transport

use crate::config::SepConfig;
use crate::payments::errors::{SepError, SepResult, TransportError};
use crate::payments::traits::GatewayTransport;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Longest response body excerpt kept in a status error.
const MAX_ERROR_BODY_CHARS: usize = 512;

pub struct HttpTransport {
    http_client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Builds the reqwest client with the configured timeout.
    pub fn new(config: &SepConfig) -> SepResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("sep-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SepError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GatewayTransport for HttpTransport {
    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Option<serde_json::Value>, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout_secs))?;

        let status = response.status();
        // The client timeout also covers reading the body.
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(e, self.timeout_secs))?;

        if !status.is_success() {
            let excerpt: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            error!("SEP gateway returned HTTP {} for {}", status, path);
            return Err(TransportError::status(status.as_u16(), excerpt));
        }

        if text.trim().is_empty() {
            debug!("Empty response body from {}", path);
            return Ok(None);
        }

        match serde_json::from_str::<serde_json::Value>(&text)? {
            serde_json::Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }
}
