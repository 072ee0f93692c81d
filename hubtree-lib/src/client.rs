//! HTTP catalog client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::model::FolderEntry;
use crate::model::FolderSummary;
use crate::model::HubSummary;
use crate::model::ProjectSummary;
use crate::model::VersionSummary;
use crate::source::DataSource;

/// [`DataSource`] backed by the catalog REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely. It never caches or retries; the tree store and
/// the user decide when to fetch again.
///
/// # Example
///
/// ```ignore
/// use hubtree_lib::{CatalogClient, auth::StaticTokenProvider};
///
/// let provider = StaticTokenProvider::new("my-token");
/// let client = CatalogClient::builder()
///     .url("http://localhost:8080")
///     .token_provider(provider)
///     .build();
///
/// let hubs = client.fetch_hubs().await?;
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    base_url: String,
    api_prefix: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl CatalogClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> CatalogClientBuilder<Missing, Missing> {
        CatalogClientBuilder::new()
    }

    /// Returns the base URL of the catalog API.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the path prefix put in front of every endpoint.
    pub fn api_prefix(&self) -> &str {
        &self.inner.api_prefix
    }

    /// Builds an endpoint URL from raw path segments and query pairs.
    ///
    /// Segments are percent-encoded, so remote ids containing `:` or `/`
    /// survive intact.
    pub(crate) fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut path = String::new();
        let prefix = self.inner.api_prefix.trim_matches('/');
        if !prefix.is_empty() {
            path.push('/');
            path.push_str(prefix);
        }
        for segment in segments {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }

        let raw = format!("{}{}", self.inner.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GETs a JSON list. A `null` body counts as an empty list.
    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ApiError> {
        let token = self
            .inner
            .token_provider
            .get_token(&self.inner.base_url)
            .await?;

        let mut request = self
            .inner
            .http_client
            .get(url.clone())
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| match self.inner.timeout {
            Some(timeout) if e.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::from(e),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(ApiError::http(status.as_u16(), message));
        }

        let body = response.text().await.map_err(ApiError::from)?;
        let list: Option<Vec<T>> = serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(format!("{}: {}", url.path(), e), body.clone()))?;
        Ok(list.unwrap_or_default())
    }
}

#[async_trait]
impl DataSource for CatalogClient {
    async fn fetch_hubs(&self) -> Result<Vec<HubSummary>, ApiError> {
        let url = self.endpoint(&["hubs"], &[])?;
        self.get_list(url).await
    }

    async fn fetch_projects(&self, hub_id: &str) -> Result<Vec<ProjectSummary>, ApiError> {
        let url = self.endpoint(&["hubs", hub_id, "projects"], &[])?;
        self.get_list(url).await
    }

    async fn fetch_top_folders(
        &self,
        hub_id: &str,
        project_id: &str,
    ) -> Result<Vec<FolderSummary>, ApiError> {
        let url = self.endpoint(&["hubs", hub_id, "projects", project_id, "contents"], &[])?;
        self.get_list(url).await
    }

    async fn fetch_folder_contents(
        &self,
        hub_id: &str,
        project_id: &str,
        folder_id: &str,
    ) -> Result<Vec<FolderEntry>, ApiError> {
        let url = self.endpoint(
            &["hubs", hub_id, "projects", project_id, "contents"],
            &[("folder_id", folder_id)],
        )?;
        // Entries of other types (links, etc.) are not part of the tree.
        let raw: Vec<serde_json::Value> = self.get_list(url).await?;
        let entries = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<FolderEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::debug!("skipping folder entry: {}", e);
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    async fn fetch_versions(
        &self,
        hub_id: &str,
        project_id: &str,
        item_id: &str,
    ) -> Result<Vec<VersionSummary>, ApiError> {
        let url = self.endpoint(
            &["hubs", hub_id, "projects", project_id, "items", item_id, "versions"],
            &[],
        )?;
        self.get_list(url).await
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url)
            .field("api_prefix", &self.inner.api_prefix)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`CatalogClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The catalog API base URL
/// - `token_provider` - A [`TokenProvider`] implementation
///
/// # Example
///
/// ```ignore
/// let client = CatalogClient::builder()
///     .url("http://localhost:8080")
///     .token_provider(my_provider)
///     .api_prefix("/api")
///     .timeout(Duration::from_secs(30))
///     .build();
/// ```
pub struct CatalogClientBuilder<U, P> {
    url: U,
    token_provider: P,
    api_prefix: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl CatalogClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            api_prefix: "/api".to_string(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for CatalogClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> CatalogClientBuilder<Missing, P> {
    /// Sets the catalog API base URL.
    pub fn url(self, url: impl Into<String>) -> CatalogClientBuilder<Set<String>, P> {
        CatalogClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            api_prefix: self.api_prefix,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> CatalogClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> CatalogClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        CatalogClientBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            api_prefix: self.api_prefix,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> CatalogClientBuilder<U, P> {
    /// Sets the path prefix of every endpoint.
    ///
    /// Defaults to `/api`. Pass an empty string for none.
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
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

impl CatalogClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`CatalogClient`].
    ///
    /// This method is only available when both `url` and `token_provider` have been set.
    pub fn build(self) -> CatalogClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        CatalogClient {
            inner: Arc::new(CatalogClientInner {
                base_url: self.url.0,
                api_prefix: self.api_prefix,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        }
    }
}
