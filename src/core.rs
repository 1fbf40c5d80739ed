use governor::{
    Quota, RateLimiter, clock::DefaultClock, middleware::NoOpMiddleware, state::InMemoryState,
    state::NotKeyed,
};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::config::EdgarConfig;
use super::error::{EdgarError, Result};

const INITIAL_BACKOFF_MS: u64 = 1000; // 1 second
const PREVIEW_CHARS: usize = 200;

type Governor = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// HTTP client for the SEC EDGAR endpoints used by the MD&A pipeline.
///
/// `Edgar` carries everything a request needs: the caller's contact string (sent as
/// `User-Agent` on every request), a token bucket limiter shared by all clones, and
/// the base URLs of the archive, data and files hosts. It holds no per-call state, so
/// one client can serve any number of independent operations.
///
/// # Rate Limiting
///
/// SEC.gov fair access allows at most 10 requests per second. Every request waits on
/// a token bucket sized by [`EdgarConfig::rate_limit`]:
///
/// ```text
/// Token Bucket (capacity: rate_limit tokens)
/// ┌──────────────────────────┐
/// │ ████████████████████████ │  ← Tokens refill at rate_limit/sec
/// └──────────────────────────┘
///      ↓ consume on request
/// ```
///
/// On top of the bucket, the ticker directory and concept requests are followed by a
/// fixed pause ([`EdgarConfig::request_delay`], 200ms by default).
///
/// # Examples
///
/// ```rust
/// # use mdnakit::Edgar;
/// let edgar = Edgar::new("my_app/1.0 (my@email.com)")?;
/// # Ok::<(), mdnakit::EdgarError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Edgar {
    /// HTTP client for making requests
    pub(crate) client: reqwest::Client,

    /// Token bucket rate limiter for SEC compliance
    pub(crate) rate_limiter: Arc<Governor>,

    /// Pause after directory and concept requests
    pub(crate) request_delay: Duration,

    /// Retries for 429 and connection failures
    pub(crate) max_retries: u32,

    /// Base URL for EDGAR archives
    pub(crate) edgar_archives_url: String,

    /// Base URL for EDGAR data API
    pub(crate) edgar_data_url: String,

    /// Base URL for EDGAR files
    pub(crate) edgar_files_url: String,
}

impl Edgar {
    /// Creates a new Edgar client with default limits.
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Contact string identifying the caller to the SEC, following the
    ///   format "AppName contact@example.com". Must not be blank.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` if the user agent is blank or not a valid header value.
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_config(EdgarConfig::new(user_agent))
    }

    /// Creates an Edgar client with custom configuration settings.
    ///
    /// Use this constructor to change the rate limit, the post-request pause, the retry
    /// budget, or to point the client at a mirror.
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::ConfigError` if the user agent is blank or malformed, the rate
    /// limit is zero, or the HTTP client cannot be built.
    pub fn with_config(config: EdgarConfig) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            return Err(EdgarError::ConfigError(
                "User agent must identify the caller (e.g. \"AppName contact@example.com\")"
                    .to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| EdgarError::ConfigError(format!("Invalid user agent: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| EdgarError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(config.rate_limit).ok_or_else(|| {
                EdgarError::ConfigError("Rate limit must be greater than zero".to_string())
            })?,
        )));

        Ok(Edgar {
            client,
            rate_limiter,
            request_delay: config.request_delay,
            max_retries: config.max_retries,
            edgar_archives_url: config.base_urls.archives,
            edgar_data_url: config.base_urls.data,
            edgar_files_url: config.base_urls.files,
        })
    }

    /// Exponential backoff with ±20% jitter: 1s, 2s, 4s, ...
    fn calculate_backoff(retry: u32) -> Duration {
        let backoff_ms = INITIAL_BACKOFF_MS * (2_u64.pow(retry));
        let jitter = (backoff_ms as f64 * 0.2 * (fastrand::f64() - 0.5)) as i64;
        Duration::from_millis((backoff_ms as i64 + jitter) as u64)
    }

    /// Fixed pause after requests the SEC asks callers to space out.
    pub(crate) async fn pause(&self) {
        if !self.request_delay.is_zero() {
            sleep(self.request_delay).await;
        }
    }

    /// Fetches a document as text, waiting on the rate limiter before every attempt.
    ///
    /// Connection failures and HTTP 429 are retried up to `max_retries` times. A 429
    /// waits for `Retry-After` when the SEC sends it, otherwise for an exponential
    /// backoff with jitter. Every other status is returned to the caller at once.
    ///
    /// The SEC occasionally labels JSON as `text/html`; for `.json` URLs such a body is
    /// accepted when it looks like JSON.
    ///
    /// # Errors
    ///
    /// * `EdgarError::NotFound` - HTTP 404, with the URL
    /// * `EdgarError::RateLimitExceeded` - retries exhausted on 429
    /// * `EdgarError::RequestError` - network failure after retries
    /// * `EdgarError::UnexpectedStatus` - any other status, with a body preview
    /// * `EdgarError::UnexpectedContentType` - JSON URL answered with an HTML page
    pub async fn get(&self, url: &str) -> Result<String> {
        let mut attempt = 0;

        loop {
            self.rate_limiter.until_ready().await;
            tracing::debug!("GET {}", url);

            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) if attempt < self.max_retries => {
                    let wait = Self::calculate_backoff(attempt);
                    tracing::warn!(
                        "GET {} failed: {}. Retry {}/{} in {:?}",
                        url,
                        e,
                        attempt + 1,
                        self.max_retries,
                        wait
                    );
                    sleep(wait).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(EdgarError::RequestError(e)),
            };

            match response.status() {
                StatusCode::OK => {
                    let content_type = response
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);
                    let body = response.text().await?;
                    return accept_body(url, content_type.as_deref(), body);
                }
                StatusCode::NOT_FOUND => return Err(EdgarError::NotFound(url.to_string())),
                StatusCode::TOO_MANY_REQUESTS if attempt < self.max_retries => {
                    let wait = retry_after(response.headers())
                        .unwrap_or_else(|| Self::calculate_backoff(attempt));
                    tracing::warn!(
                        "Rate limited (429) on {}. Retry {}/{} in {:?}",
                        url,
                        attempt + 1,
                        self.max_retries,
                        wait
                    );
                    sleep(wait).await;
                    attempt += 1;
                }
                StatusCode::TOO_MANY_REQUESTS => return Err(EdgarError::RateLimitExceeded),
                status => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(EdgarError::UnexpectedStatus(format!(
                        "{} for URL: {}. Response preview: {}",
                        status,
                        url,
                        preview(&body)
                    )));
                }
            }
        }
    }

    /// Returns the base URL for EDGAR archives.
    pub fn archives_url(&self) -> &str {
        &self.edgar_archives_url
    }

    /// Returns the base URL for EDGAR data.
    pub fn data_url(&self) -> &str {
        &self.edgar_data_url
    }

    /// Returns the base URL for EDGAR files.
    pub fn files_url(&self) -> &str {
        &self.edgar_files_url
    }
}

/// Seconds from a `Retry-After` header; HTTP dates are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

/// Rejects an HTML page served for a `.json` URL unless the body is JSON anyway.
fn accept_body(url: &str, content_type: Option<&str>, body: String) -> Result<String> {
    let html = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"));
    if !url.ends_with(".json") || !html {
        return Ok(body);
    }

    let trimmed = body.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        tracing::warn!("{} is labelled text/html but carries JSON", url);
        return Ok(body);
    }

    Err(EdgarError::UnexpectedContentType {
        url: url.to_string(),
        expected_pattern: "application/json".to_string(),
        got_content_type: content_type.unwrap_or_default().to_string(),
        content_preview: preview(&body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgarUrls;

    #[test]
    fn test_calculate_backoff() {
        let backoff0 = Edgar::calculate_backoff(0);
        let backoff1 = Edgar::calculate_backoff(1);
        let backoff2 = Edgar::calculate_backoff(2);

        assert!(backoff0 < backoff1);
        assert!(backoff1 < backoff2);

        assert!(backoff0.as_millis() >= 800 && backoff0.as_millis() <= 1200);
        assert!(backoff1.as_millis() >= 1600 && backoff1.as_millis() <= 2400);
        assert!(backoff2.as_millis() >= 3200 && backoff2.as_millis() <= 4800);
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        for ua in ["", "   "] {
            let result = Edgar::new(ua);
            assert!(matches!(result, Err(EdgarError::ConfigError(_))));
        }
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let config = EdgarConfig::new("test_agent example@example.com").with_rate_limit(0);
        assert!(matches!(
            Edgar::with_config(config),
            Err(EdgarError::ConfigError(_))
        ));
    }

    #[test]
    fn test_custom_base_urls() {
        let config = EdgarConfig::new("test_agent example@example.com").with_base_urls(EdgarUrls {
            archives: "http://localhost:8080/archives".to_string(),
            data: "http://localhost:8080/data".to_string(),
            files: "http://localhost:8080/files".to_string(),
        });
        let edgar = Edgar::with_config(config).unwrap();
        assert_eq!(edgar.archives_url(), "http://localhost:8080/archives");
        assert_eq!(edgar.data_url(), "http://localhost:8080/data");
        assert_eq!(edgar.files_url(), "http://localhost:8080/files");
    }

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(3)));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn test_accept_body_json_labelled_html() {
        let url = "https://data.sec.gov/submissions/CIK0000320193.json";

        let body = accept_body(url, Some("text/html; charset=utf-8"), " {\"cik\": 1}".into());
        assert_eq!(body.unwrap(), " {\"cik\": 1}");

        let err = accept_body(url, Some("text/html"), "<html>Request Rate Threshold Exceeded</html>".into())
            .unwrap_err();
        assert!(matches!(err, EdgarError::UnexpectedContentType { .. }));
        assert!(err.to_string().contains("Threshold"));
    }

    #[test]
    fn test_accept_body_documents_pass_through() {
        let url = "https://www.sec.gov/Archives/edgar/data/320193/000032019324000069/aapl-20240330.htm";
        let body = accept_body(url, Some("text/html"), "<html></html>".into()).unwrap();
        assert_eq!(body, "<html></html>");

        let json = "https://data.sec.gov/api/xbrl/companyconcept/CIK0000320193/us-gaap/Revenues.json";
        assert!(accept_body(json, None, "[]".into()).is_ok());
    }
}
