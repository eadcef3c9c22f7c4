//! URL reachability checking
//!
//! # Classification
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | HTTP 2xx (after redirects) | Reachable |
//! | HTTP 405 / 501 on HEAD | retried with GET |
//! | Any other HTTP status | Unreachable with status |
//! | Timeout | Unreachable |
//! | Connection refused / DNS / TLS failure | Unreachable |
//! | Unparseable URL or non-HTTP scheme | Error |

use crate::model::{Item, ValidityOutcome};
use crate::source::build_http_client;
use crate::verify::ItemCheck;
use crate::{Result, ShioriError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Reports whether a URL can be reached
#[async_trait]
pub trait ReachabilityChecker: Send + Sync {
    /// Checks one URL
    ///
    /// # Returns
    ///
    /// * `Ok(ValidityOutcome)` - The checker reached a verdict
    /// * `Err(ShioriError)` - The check could not be carried out
    async fn check(&self, url: &str) -> Result<ValidityOutcome>;
}

/// Checks URLs with a HEAD request, falling back to GET
#[derive(Debug, Clone)]
pub struct HttpReachabilityChecker {
    client: Client,
}

impl HttpReachabilityChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }

    async fn send(&self, url: Url) -> std::result::Result<Response, reqwest::Error> {
        let response = self.client.head(url.clone()).send().await?;

        // Plenty of servers reject HEAD outright
        if matches!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            return self.client.get(url).send().await;
        }

        Ok(response)
    }
}

#[async_trait]
impl ReachabilityChecker for HttpReachabilityChecker {
    async fn check(&self, url: &str) -> Result<ValidityOutcome> {
        let parsed = Url::parse(url).map_err(|e| ShioriError::Check {
            url: url.to_string(),
            message: format!("invalid URL: {}", e),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ShioriError::Check {
                url: url.to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        match self.send(parsed).await {
            Ok(response) => Ok(classify_status(response.status())),
            Err(e) if e.is_timeout() => Ok(ValidityOutcome::unreachable(None, "Request timeout")),
            Err(e) if e.is_connect() => Ok(ValidityOutcome::unreachable(None, "Connection failed")),
            Err(e) if e.is_redirect() => Ok(ValidityOutcome::unreachable(None, "Too many redirects")),
            Err(e) => Err(ShioriError::Check {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Maps a final HTTP status to an outcome
fn classify_status(status: StatusCode) -> ValidityOutcome {
    if status.is_success() {
        return ValidityOutcome::Reachable;
    }

    let reason = match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => "Dead link",
        StatusCode::TOO_MANY_REQUESTS => "Rate limited",
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "Access denied",
        s if s.is_server_error() => "Server error",
        _ => status.canonical_reason().unwrap_or("Unexpected status"),
    };

    ValidityOutcome::unreachable(Some(status.as_u16()), reason)
}

/// Item check recording URL reachability under the `url` key
#[derive(Clone)]
pub struct UrlCheck {
    checker: Arc<dyn ReachabilityChecker>,
    timeout: Duration,
}

impl UrlCheck {
    pub const NAME: &'static str = "url";

    /// Creates the check
    ///
    /// # Arguments
    ///
    /// * `checker` - The reachability checker to consult
    /// * `timeout` - Upper bound for a single check
    pub fn new(checker: Arc<dyn ReachabilityChecker>, timeout: Duration) -> Self {
        Self { checker, timeout }
    }
}

#[async_trait]
impl ItemCheck for UrlCheck {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn run(&self, item: &Item) -> Result<ValidityOutcome> {
        let outcome = match tokio::time::timeout(self.timeout, self.checker.check(&item.url)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => ValidityOutcome::error(e.to_string()),
            Err(_) => ValidityOutcome::error(format!("check timed out after {:?}", self.timeout)),
        };
        Ok(outcome)
    }
}
