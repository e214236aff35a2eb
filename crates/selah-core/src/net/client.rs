//! Resilient fetch client
//!
//! Wraps outbound JSON API calls with a per-attempt timeout, retry with
//! exponential backoff, and error classification. Each call is independent:
//! no retry state is shared across calls and attempts within one call are
//! strictly sequential.
//!
//! There is deliberately no circuit breaker across calls; callers needing to
//! abort a retry sequence early can drop the returned future.

use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::FetchError;

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default retry count (total attempts = retries + 1)
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay for exponential backoff
pub const DEFAULT_BASE_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// Per-request settings
///
/// Everything has a default; callers usually tweak one or two fields with
/// struct update syntax.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// Extra request headers
    pub headers: HeaderMap,
    /// JSON request body
    pub body: Option<Value>,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base backoff delay, doubled after each retryable failure
    pub base_retry_delay: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            base_retry_delay: DEFAULT_BASE_RETRY_DELAY,
        }
    }
}

/// A successful result, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    /// The decoded value
    pub data: T,
    /// True when the value came from the fallback producer, not the network
    pub from_cache: bool,
}

/// HTTP client with timeout, retry, and fallback semantics
#[derive(Debug, Clone, Default)]
pub struct FetchClient {
    http: reqwest::Client,
}

impl FetchClient {
    /// Create a client with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Perform a request, retrying transient failures with backoff
    ///
    /// Runs up to `max_retries + 1` attempts. Timeouts, transport errors,
    /// HTTP 5xx, and 429 are retried after an exponentially growing delay;
    /// other 4xx responses and application-level errors in a 2xx body stop
    /// immediately. On exhaustion the last error is returned; this method
    /// never panics.
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        opts: &RequestOptions,
    ) -> Result<T, FetchError> {
        retry(opts, |attempt| self.attempt::<T>(url, opts, attempt)).await
    }

    /// Like `request`, but resolves a locally produced value on failure
    ///
    /// When every network attempt fails, the fallback producer is invoked
    /// and its value is returned tagged `from_cache: true`. If the producer
    /// also fails, both failures are reported together.
    pub async fn request_with_fallback<T, F, Fut>(
        &self,
        url: &str,
        opts: &RequestOptions,
        fallback: F,
    ) -> Result<Fetched<T>, FetchError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.request(url, opts).await {
            Ok(data) => Ok(Fetched {
                data,
                from_cache: false,
            }),
            Err(primary) => {
                warn!("Request to {} failed ({}), resolving fallback", url, primary);
                match fallback().await {
                    Ok(data) => Ok(Fetched {
                        data,
                        from_cache: true,
                    }),
                    Err(fb) => Err(FetchError::FallbackFailed {
                        primary: primary.to_string(),
                        fallback: fb.to_string(),
                    }),
                }
            }
        }
    }

    /// One attempt: send, enforce the timeout, classify the response
    ///
    /// The timeout window covers the entire attempt, from sending the
    /// request through reading the body.
    async fn attempt<T: DeserializeOwned>(
        &self,
        url: &str,
        opts: &RequestOptions,
        attempt: u32,
    ) -> Result<T, FetchError> {
        debug!("Attempt {} for {} {}", attempt, opts.method, url);

        let perform = async {
            let mut request = self
                .http
                .request(opts.method.clone(), url)
                .headers(opts.headers.clone());
            if let Some(body) = &opts.body {
                request = request.json(body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let payload: Value = response
                .json()
                .await
                .map_err(|e| FetchError::Payload(e.to_string()))?;

            // Some upstream APIs report failure inside a 200 body
            if let Some(message) = api_error(&payload) {
                return Err(FetchError::Api(message));
            }

            serde_json::from_value(payload).map_err(|e| FetchError::Payload(e.to_string()))
        };

        tokio::time::timeout(opts.timeout, perform)
            .await
            .map_err(|_| FetchError::Timeout(opts.timeout))?
    }
}

/// Run an attempt function under the retry policy
///
/// Attempts are numbered from 1. After a retryable failure the loop sleeps
/// `base_retry_delay * 2^(attempt-1)` before trying again.
pub(crate) async fn retry<T, F, Fut>(opts: &RequestOptions, mut run: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = opts.max_retries + 1;

    for attempt in 1..=attempts {
        match run(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Attempt {} succeeded after {} failures", attempt, attempt - 1);
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < attempts => {
                let delay = backoff_delay(opts.base_retry_delay, attempt);
                warn!(
                    "Attempt {}/{} failed: {}; retrying in {:?}",
                    attempt, attempts, e, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                warn!("Giving up after attempt {}/{}: {}", attempt, attempts, e);
                return Err(e);
            }
        }
    }

    unreachable!("retry loop always returns within the attempt budget")
}

/// Backoff delay before the attempt after `attempt`: `base * 2^(attempt-1)`
///
/// Saturates instead of overflowing, so absurd `max_retries` values degrade
/// to a flat (very long) delay rather than a panic.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1).min(31));
    base.saturating_mul(factor)
}

/// Extract an application-level error message from a 2xx JSON body
fn api_error(payload: &Value) -> Option<String> {
    let obj = payload.as_object()?;

    for key in ["error", "err"] {
        match obj.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(message)) => return Some(message.clone()),
            Some(other) => return Some(other.to_string()),
        }
    }

    None
}
