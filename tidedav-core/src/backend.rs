//! HTTP client for the TorrServer backend.
//!
//! Two calls matter: the list action (browse) and the play endpoint
//! (stream). Listing degrades to an empty result on any failure so that an
//! unreachable backend renders as an empty share instead of an error page.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::torrent::Torrent;
use crate::{BackendError, Result};

/// An open byte stream from the backend's play endpoint.
///
/// Carries the upstream status verbatim plus the header subset the proxy
/// mirrors. Dropping `body` closes the upstream connection, which is how
/// client disconnects propagate to the backend.
pub struct BackendStream {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub content_range: Option<String>,
    pub accept_ranges: Option<String>,
    pub body: BoxStream<'static, std::io::Result<Bytes>>,
}

/// Interface to the TorrServer backend.
///
/// Object-safe so the web layer can run against a scripted double in tests.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Fetches the current torrent list.
    ///
    /// Transport or decode failures are logged and yield an empty list;
    /// this call never fails from the caller's perspective.
    async fn list_torrents(&self) -> Vec<Torrent>;

    /// Opens a byte stream for one file, forwarding optional `Range` and
    /// `User-Agent` headers.
    ///
    /// Upstream non-success statuses are returned as data so the proxy can
    /// mirror them; only transport failures are errors.
    ///
    /// # Errors
    /// - `BackendError::Transport` - Connection or protocol failure
    async fn open_stream(
        &self,
        hash: &str,
        file_id: i64,
        range: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<BackendStream>;

    /// Queries the backend's echo endpoint, used by the health check.
    ///
    /// # Errors
    /// - `BackendError::Transport` - Backend unreachable
    async fn ping(&self) -> Result<String>;
}

/// Production `BackendClient` backed by reqwest.
pub struct HttpBackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackendClient {
    /// Creates a client for the configured backend URL.
    ///
    /// Follows up to 5 redirects, matching what media backends behind
    /// reverse proxies need.
    ///
    /// # Errors
    /// - `BackendError::InvalidUrl` - The configured backend URL does not
    ///   parse as an absolute URL
    ///
    /// # Panics
    /// Panics if the TLS backend cannot be initialized.
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let base_url = config.backend_url.trim_end_matches('/').to_string();
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(BackendError::InvalidUrl { url: base_url });
        }

        Ok(Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(config.user_agent)
                .redirect(reqwest::redirect::Policy::limited(5))
                .build()
                .expect("HTTP client creation should not fail"),
        })
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn list_torrents(&self) -> Vec<Torrent> {
        let url = format!("{}/torrents", self.base_url);

        let response = match self
            .client
            .post(&url)
            .json(&json!({ "action": "list" }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Error fetching torrents from {}: {}", url, e);
                return Vec::new();
            }
        };

        match response.json::<Vec<Torrent>>().await {
            Ok(torrents) => {
                debug!("Backend listed {} torrents", torrents.len());
                torrents
            }
            Err(e) => {
                warn!("Error decoding torrent list: {}", e);
                Vec::new()
            }
        }
    }

    async fn open_stream(
        &self,
        hash: &str,
        file_id: i64,
        range: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<BackendStream> {
        let url = format!("{}/play/{}/{}", self.base_url, hash, file_id);
        debug!("Opening backend stream: {} (range: {:?})", url, range);

        let mut request = self.client.get(&url);
        if let Some(range) = range {
            request = request.header(reqwest::header::RANGE, range);
        }
        if let Some(user_agent) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, user_agent);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let header_string = |name: reqwest::header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let content_type = header_string(reqwest::header::CONTENT_TYPE);
        let content_range = header_string(reqwest::header::CONTENT_RANGE);
        let accept_ranges = header_string(reqwest::header::ACCEPT_RANGES);
        let content_length =
            header_string(reqwest::header::CONTENT_LENGTH).and_then(|v| v.parse::<u64>().ok());

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other))
            .boxed();

        Ok(BackendStream {
            status,
            content_type,
            content_length,
            content_range,
            accept_ranges,
            body,
        })
    }

    async fn ping(&self) -> Result<String> {
        let url = format!("{}/echo", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.error_for_status()?.text().await?)
    }
}
