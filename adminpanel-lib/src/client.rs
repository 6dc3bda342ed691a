//! Main PanelClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Default backend address used by the panel.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3005";

/// Client for the admin panel REST backend.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely.
///
/// # Example
///
/// ```ignore
/// use adminpanel_lib::PanelClient;
///
/// let client = PanelClient::builder()
///     .url("http://localhost:3005")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let users = client.fetch_users().await?;
/// ```
#[derive(Clone)]
pub struct PanelClient {
    inner: Arc<PanelClientInner>,
}

struct PanelClientInner {
    base_url: String,
    token: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl PanelClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> PanelClientBuilder<Missing> {
        PanelClientBuilder::new()
    }

    /// Returns the base URL of the backend.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns `true` if requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.inner.token.is_some()
    }

    /// Returns a client sharing this one's connection pool that sends
    /// `token` as bearer authorization.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(PanelClientInner {
                base_url: self.inner.base_url.clone(),
                token: Some(token.into()),
                http_client: self.inner.http_client.clone(),
                timeout: self.inner.timeout,
            }),
        }
    }

    pub(crate) fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url.trim_end_matches('/'), path)
    }

    /// Sends a request and returns the successful response.
    ///
    /// Non-2xx responses become [`ApiError::Http`] carrying the body.
    pub(crate) async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.build_url(path);
        log::debug!("[client] {method} {url}");

        let mut request = self.inner.http_client.request(method, &url);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| match self.inner.timeout {
            Some(timeout) if e.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(e),
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::http(status.as_u16(), body))
        }
    }

    /// Sends a request and decodes a JSON response body.
    pub(crate) async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::parse_with_body(e.to_string(), text))
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`PanelClient`].
///
/// The base URL is required; everything else is optional.
///
/// # Example
///
/// ```ignore
/// let client = PanelClient::builder()
///     .url("http://localhost:3005")
///     .token(token)
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct PanelClientBuilder<Url> {
    url: Url,
    token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl PanelClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the backend base URL.
    pub fn url(self, url: impl Into<String>) -> PanelClientBuilder<Set<String>> {
        PanelClientBuilder {
            url: Set(url.into()),
            token: self.token,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for PanelClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> PanelClientBuilder<U> {
    /// Sets a bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl PanelClientBuilder<Set<String>> {
    /// Builds the [`PanelClient`].
    ///
    /// Fails if the URL is not an absolute http(s) URL or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<PanelClient, ApiError> {
        let base_url = self.url.0;
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ApiError::InvalidUrl(base_url));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(PanelClient {
            inner: Arc::new(PanelClientInner {
                base_url,
                token: self.token,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let client = PanelClient::builder()
            .url("http://localhost:3005/")
            .build()
            .unwrap();
        assert_eq!(client.build_url("/api/usuarios"), "http://localhost:3005/api/usuarios");
    }

    #[test]
    fn test_rejects_invalid_urls() {
        for url in ["http://:3005", "localhost:3005", "ftp://example.com", ""] {
            let err = PanelClient::builder().url(url).build().err();
            assert!(matches!(err, Some(ApiError::InvalidUrl(_))), "url {url:?}");
        }
    }

    #[test]
    fn test_with_token() {
        let client = PanelClient::builder().url(DEFAULT_BASE_URL).build().unwrap();
        assert!(!client.is_authenticated());
        let authed = client.with_token("abc");
        assert!(authed.is_authenticated());
        assert_eq!(authed.base_url(), DEFAULT_BASE_URL);
    }
}
