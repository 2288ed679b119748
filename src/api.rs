//! Read-only client for the editions backend.
//!
//! ## Routes consumed
//!
//! ```text
//! GET {base}/api/ediciones                 → [Edition]   (envelope or bare)
//! GET {base}/api/ediciones/{id}            → Edition     (lookup = "direct" only)
//! GET {base}/api/ediciones/{id}/{pages}    → [Page]      (pages = "pages" | "paginas")
//! GET {base}/api/images/{key}              → image bytes (used as <img src>, never fetched here)
//! ```
//!
//! Every call is a single attempt. Failures surface as [`ApiError`] and the
//! views turn them into an error page; nothing is retried.

use crate::config::{ApiConfig, LookupStrategy, PagesRoute};
use crate::types::{Edition, Envelope, Page};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid API base URL {0:?}")]
    InvalidBase(String),
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response shape from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{url} reported failure: {message}")]
    Rejected { url: String, message: String },
}

impl ApiError {
    /// True for an HTTP 404 answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Read-only source of editions and pages.
///
/// The views depend on this trait rather than on [`ApiClient`] so they can
/// be exercised against in-memory data.
pub trait Catalog: Send + Sync {
    /// Every edition the backend returns, published or not.
    fn list_editions(&self) -> impl Future<Output = Result<Vec<Edition>, ApiError>> + Send;

    /// Pages of one edition in whatever order the backend sends them.
    fn list_pages(
        &self,
        edition_id: &str,
    ) -> impl Future<Output = Result<Vec<Page>, ApiError>> + Send;

    /// Look up a single edition; `Ok(None)` when it does not exist.
    fn find_edition(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Edition>, ApiError>> + Send {
        async move {
            let editions = self.list_editions().await?;
            Ok(editions.into_iter().find(|e| e.id == id))
        }
    }

    /// Base URL image keys are resolved against.
    fn image_base(&self) -> &str;

    fn image_url(&self, reference: &str) -> String {
        image_url(self.image_base(), reference)
    }
}

/// Resolve an image reference to something an `<img src>` can load.
///
/// Absolute URLs pass through; storage keys are served by the backend's
/// image route. An empty reference maps to the backend's `placeholder` key.
pub fn image_url(base: &str, reference: &str) -> String {
    let reference = reference.trim();
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    let key = if reference.is_empty() {
        "placeholder"
    } else {
        reference.trim_start_matches('/')
    };
    format!("{}/api/images/{}", base.trim_end_matches('/'), key)
}

/// HTTP implementation of [`Catalog`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    base_str: String,
    pages_path: PagesRoute,
    lookup: LookupStrategy,
}

impl ApiClient {
    /// Build a client for `base` (already resolved, see
    /// [`crate::config::resolve_api_base`]).
    pub fn new(base: &str, api: &ApiConfig) -> Result<Self, ApiError> {
        let base_str = base.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_str).map_err(|_| ApiError::InvalidBase(base.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBase(base.to_string()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .user_agent(concat!("revista/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            http,
            base: parsed,
            base_str,
            pages_path: api.pages_path,
            lookup: api.lookup,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_str
    }

    /// `{base}/api/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let url_str = url.to_string();
        debug!(url = %url_str, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url_str.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                url: url_str.clone(),
                source,
            })?;
        let envelope: Envelope<T> =
            serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
                url: url_str.clone(),
                source,
            })?;
        envelope
            .into_data()
            .map_err(|message| ApiError::Rejected {
                url: url_str,
                message,
            })
    }
}

impl Catalog for ApiClient {
    async fn list_editions(&self) -> Result<Vec<Edition>, ApiError> {
        self.get(self.endpoint(&["ediciones"])).await
    }

    async fn list_pages(&self, edition_id: &str) -> Result<Vec<Page>, ApiError> {
        self.get(self.endpoint(&["ediciones", edition_id, self.pages_path.as_str()]))
            .await
    }

    async fn find_edition(&self, id: &str) -> Result<Option<Edition>, ApiError> {
        match self.lookup {
            LookupStrategy::List => {
                let editions = self.list_editions().await?;
                Ok(editions.into_iter().find(|e| e.id == id))
            }
            LookupStrategy::Direct => {
                match self.get::<Edition>(self.endpoint(&["ediciones", id])).await {
                    Ok(edition) => Ok(Some(edition)),
                    Err(err) if err.is_not_found() => Ok(None),
                    Err(err) => Err(err),
                }
            }
        }
    }

    fn image_base(&self) -> &str {
        &self.base_str
    }
}
