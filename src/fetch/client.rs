//! HTTP client with per-attempt timeouts and bounded retries

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::RetryPolicy;
use crate::error::FetchError;

/// Method, headers and optional JSON body of a request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Client for the school REST backend
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    base_url: Url,
    policy: RetryPolicy,
}

impl FetchClient {
    /// Creates a client rooted at `base_url`. Paths are joined onto it, so the
    /// base should end with `/`.
    pub fn new(base_url: &str, policy: RetryPolicy) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            http: Client::new(),
            base_url,
            policy,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Resolves `path` against the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// GETs `path` relative to the base URL using the client's retry policy.
    pub async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url_for(path)?;
        self.fetch_with_retry(
            url.as_str(),
            &RequestOptions::default(),
            self.policy.retries,
            self.policy.timeout,
        )
        .await
    }

    /// Performs one logical request, making up to `retries` attempts.
    ///
    /// 404 and other 4xx answers fail immediately. 5xx answers, transport
    /// failures and timeouts are retried with exponential backoff; once the
    /// attempts run out the last error is returned. A `retries` of 0 still
    /// makes one attempt.
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        options: &RequestOptions,
        retries: u32,
        timeout: Duration,
    ) -> Result<Value, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        let attempts = retries.max(1);
        let mut attempt = 0;

        loop {
            match self.attempt(&url, options, timeout).await {
                Ok(body) => return Ok(body),
                Err(e) if !e.is_retryable() => {
                    warn!("Request to {} failed: {}", url, e);
                    return Err(e);
                }
                Err(e) if attempt + 1 >= attempts => {
                    warn!("Request to {} failed after {} attempts: {}", url, attempts, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.policy.backoff_delay(attempt);
                    debug!(
                        "Attempt {}/{} for {} failed ({}), retrying in {}ms",
                        attempt + 1,
                        attempts,
                        url,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// One attempt, cancelled by dropping the in-flight future at the deadline.
    async fn attempt(
        &self,
        url: &Url,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<Value, FetchError> {
        let mut request = self.http.request(options.method.clone(), url.clone());
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound {
                    url: url.to_string(),
                });
            }
            if !status.is_success() {
                let status_text = status.canonical_reason().unwrap_or_default().to_string();
                return Err(if status.is_server_error() {
                    FetchError::Server {
                        status: status.as_u16(),
                        status_text,
                    }
                } else {
                    FetchError::Client {
                        status: status.as_u16(),
                        status_text,
                    }
                });
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                millis: timeout.as_millis() as u64,
            }),
        }
    }
}
