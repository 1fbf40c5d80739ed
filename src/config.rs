use std::time::Duration;

/// Configuration for the Edgar client
///
/// There is no `Default`: every request carries the caller's contact string.
#[derive(Debug, Clone)]
pub struct EdgarConfig {
    /// User agent string for HTTP requests, e.g. "AppName contact@example.com"
    pub user_agent: String,
    /// Rate limit in requests per second
    pub rate_limit: u32,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Pause taken after the ticker directory and concept requests
    pub request_delay: Duration,
    /// Retries for 429 responses and connection failures
    pub max_retries: u32,
    /// Base URLs for different EDGAR services
    pub base_urls: EdgarUrls,
}

/// Base URLs for different EDGAR services
#[derive(Debug, Clone)]
pub struct EdgarUrls {
    /// Base URL for EDGAR archives (filing documents)
    pub archives: String,
    /// Base URL for EDGAR data (submissions, XBRL concepts)
    pub data: String,
    /// Base URL for EDGAR files (ticker directory)
    pub files: String,
}

impl Default for EdgarUrls {
    fn default() -> Self {
        Self {
            archives: "https://www.sec.gov/Archives/edgar".to_string(),
            data: "https://data.sec.gov".to_string(),
            files: "https://www.sec.gov/files".to_string(),
        }
    }
}

impl EdgarConfig {
    pub const DEFAULT_RATE_LIMIT: u32 = 10;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(200);
    pub const DEFAULT_MAX_RETRIES: u32 = 5;

    /// Creates a configuration for the given contact string with default limits.
    ///
    /// # Basic usage
    ///
    /// ```rust
    /// use mdnakit::{Edgar, EdgarConfig};
    /// use std::time::Duration;
    ///
    /// let config = EdgarConfig::new("YourAppName contact@example.com")
    ///     .with_rate_limit(5)
    ///     .with_request_delay(Duration::from_millis(500));
    /// let edgar = Edgar::with_config(config)?;
    /// # Ok::<(), mdnakit::EdgarError>(())
    /// ```
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            rate_limit: Self::DEFAULT_RATE_LIMIT,
            timeout: Self::DEFAULT_TIMEOUT,
            request_delay: Self::DEFAULT_REQUEST_DELAY,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_urls: EdgarUrls::default(),
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the fixed pause after directory and concept requests. `Duration::ZERO` disables it.
    pub fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_urls(mut self, base_urls: EdgarUrls) -> Self {
        self.base_urls = base_urls;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_defaults() {
        let config = EdgarConfig::new("research contact@example.com");
        assert_eq!(config.user_agent, "research contact@example.com");
        assert_eq!(config.rate_limit, 10);
        assert_eq!(config.request_delay, Duration::from_millis(200));
        assert_eq!(config.base_urls.data, "https://data.sec.gov");
    }

    #[test]
    fn builders_override() {
        let config = EdgarConfig::new("ua")
            .with_rate_limit(2)
            .with_request_delay(Duration::ZERO)
            .with_max_retries(0);
        assert_eq!(config.rate_limit, 2);
        assert!(config.request_delay.is_zero());
        assert_eq!(config.max_retries, 0);
    }
}
