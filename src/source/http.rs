//! Remote ticket source.
//!
//! Fetches a single fixed-size batch from an HTTP endpoint. There is no
//! pagination and no retry; any failure is reported to the caller.

use super::decode_payload;
use crate::error::TicketError;
use crate::models::TicketRecord;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default number of tickets requested per batch.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Settings for the remote ticket source.
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub url: String,
    /// Bearer token sent with the request, if any.
    pub token: Option<String>,
    pub batch_size: usize,
    pub timeout_seconds: u64,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_seconds: 30,
        }
    }
}

/// HTTP ticket source backed by a reusable client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    config: HttpSourceConfig,
    http_client: reqwest::Client,
}

impl HttpSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, TicketError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("ticketpulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TicketError::UpstreamFetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Fetch one batch of tickets.
    pub async fn fetch(&self) -> Result<Vec<TicketRecord>, TicketError> {
        info!(
            "Fetching up to {} tickets from {}",
            self.config.batch_size, self.config.url
        );

        let mut request = self
            .http_client
            .get(&self.config.url)
            .query(&[("per_page", self.config.batch_size)]);

        if let Some(ref token) = self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TicketError::UpstreamFetch(format!(
                    "Request timed out after {}s",
                    self.config.timeout_seconds
                ))
            } else if e.is_connect() {
                TicketError::UpstreamFetch(format!(
                    "Cannot connect to ticket source at {}",
                    self.config.url
                ))
            } else {
                TicketError::UpstreamFetch(format!("Failed to send request: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TicketError::UpstreamFetch(format!(
                "Ticket source error {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TicketError::UpstreamFetch(format!("Failed to read response: {}", e)))?;

        let mut tickets = decode_payload(&body)?;

        if tickets.len() > self.config.batch_size {
            warn!(
                "Source returned {} tickets; keeping the first {}",
                tickets.len(),
                self.config.batch_size
            );
            tickets.truncate(self.config.batch_size);
        }

        debug!("Fetched {} tickets", tickets.len());
        Ok(tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpSourceConfig::default();
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.token.is_none());
    }

    #[tokio::test]
    async fn test_connect_failure_is_upstream_error() {
        let source = HttpSource::new(HttpSourceConfig {
            url: "http://127.0.0.1:9/tickets".to_string(),
            timeout_seconds: 2,
            ..HttpSourceConfig::default()
        })
        .unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, TicketError::UpstreamFetch(_)));
        assert_eq!(source.url(), "http://127.0.0.1:9/tickets");
    }
}
