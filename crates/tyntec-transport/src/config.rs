use std::fmt;
use std::time::Duration;

use crate::error::{Result, TransportError};

pub const DEFAULT_BASE_URL: &str = "https://api.tyntec.com/conversations/v3";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry settings. Accepted and carried, not acted on by any transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Connection settings for the Conversations API.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    whatsapp_account_id: Option<String>,
    timeout: Duration,
    retry: Option<RetryConfig>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            whatsapp_account_id: None,
            timeout: DEFAULT_TIMEOUT,
            retry: None,
        }
    }

    /// Point the client at another API root. Must be an absolute http(s) URL;
    /// a trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = url::Url::parse(base_url).map_err(|err| TransportError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Default account for template endpoints.
    pub fn with_whatsapp_account(mut self, account_id: impl Into<String>) -> Self {
        self.whatsapp_account_id = Some(account_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn whatsapp_account_id(&self) -> Option<&str> {
        self.whatsapp_account_id.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry(&self) -> Option<RetryConfig> {
        self.retry
    }

    /// Absolute URL of `endpoint`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("whatsapp_account_id", &self.whatsapp_account_id)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}
