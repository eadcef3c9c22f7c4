//! HTTP page source
//!
//! Pages are requested from `<endpoint>/<account>?page=<id>`. There is no
//! retry: a failed request or a non-success status fails the whole harvest.

use crate::model::PageId;
use crate::source::PageSource;
use crate::{Result, ShioriError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with the harvester's user agent and timeouts
///
/// # Arguments
///
/// * `timeout` - Total time allowed for one request
///
/// # Example
///
/// ```no_run
/// use shiori_harvest::source::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> std::result::Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages from the collection endpoint
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    base: Url,
}

impl HttpPageSource {
    /// Creates a page source for one account
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the collection API
    /// * `account` - Account identifier appended to the endpoint path
    /// * `timeout` - Request timeout
    pub fn new(endpoint: &str, account: &str, timeout: Duration) -> Result<Self> {
        let client = build_http_client(timeout)?;
        Self::with_client(client, endpoint, account)
    }

    /// Creates a page source that reuses an existing client
    pub fn with_client(client: Client, endpoint: &str, account: &str) -> Result<Self> {
        let mut endpoint = Url::parse(endpoint)?;

        // Without a trailing slash `join` would replace the last segment
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let base = endpoint.join(account)?;
        Ok(Self { client, base })
    }

    /// Returns the request URL for one page
    pub fn page_url(&self, page: &PageId) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair("page", page.as_str());
        url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn load_page(&self, page: &PageId) -> Result<String> {
        let url = self.page_url(page);
        tracing::debug!("Requesting page {} from {}", page, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ShioriError::Http {
                page: page.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShioriError::PageStatus {
                page: page.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| ShioriError::Http {
            page: page.to_string(),
            source,
        })
    }
}
