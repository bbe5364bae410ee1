//! Catalog API client: the trait the engine consumes and its HTTP implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::search::SearchResults;
use super::types::{ArtistDetail, Collection, Timeframe};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog returned HTTP {status}")]
    Status { status: u16 },
    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid catalog url: {0}")]
    Url(String),
}

pub type CatalogResult<T> = Result<Option<T>, CatalogError>;

/// Source of catalog data.
///
/// `Ok(None)` means the catalog answered but had no data; it is not an error.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// `query` is already normalized (words joined with `+`)
    async fn search(&self, query: &str) -> CatalogResult<SearchResults>;
    async fn album(&self, id: &str) -> CatalogResult<Collection>;
    async fn playlist(&self, id: &str) -> CatalogResult<Collection>;
    async fn artist(&self, id: &str) -> CatalogResult<ArtistDetail>;
    async fn genre(&self, genre: &str) -> CatalogResult<Vec<Collection>>;
    async fn chart(&self, timeframe: Timeframe) -> CatalogResult<Collection>;
}

/// Response envelope used by every endpoint
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: Option<bool>,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self, operation: &str) -> Option<T> {
        if self.success == Some(false) {
            tracing::debug!(operation, message = ?self.message, "Catalog reported no success");
            return None;
        }
        if self.data.is_none() {
            tracing::debug!(operation, message = ?self.message, "Catalog returned no data");
        }
        self.data
    }
}

/// Decode an envelope and pull out its payload
fn decode_envelope<T: DeserializeOwned>(operation: &str, body: &str) -> CatalogResult<T> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    Ok(envelope.into_data(operation))
}

/// Catalog client over HTTP
#[derive(Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str, param: &str, value: &str) -> Result<Url, CatalogError> {
        // The value is interpolated as-is so `+` separators reach the server untouched
        let raw = format!("{}/{}?{}={}", self.base_url, path, param, value);
        Url::parse(&raw).map_err(|e| CatalogError::Url(format!("{}: {}", raw, e)))
    }

    async fn get<T: DeserializeOwned>(&self, operation: &str, url: Url) -> CatalogResult<T> {
        crate::log_api_request!(operation, url = %url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match decode_envelope(operation, &body) {
            Ok(data) => {
                tracing::info!(operation, status = status.as_u16(), found = data.is_some(), "API request successful");
                Ok(data)
            }
            // An unreadable error page is a failure; an unreadable 2xx is a decode error
            Err(_) if !status.is_success() => Err(CatalogError::Status { status: status.as_u16() }),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl CatalogClient for HttpCatalog {
    async fn search(&self, query: &str) -> CatalogResult<SearchResults> {
        let url = self.url("search", "query", query)?;
        self.get("search", url).await
    }

    async fn album(&self, id: &str) -> CatalogResult<Collection> {
        let url = self.url("albums", "id", id)?;
        self.get("album", url).await
    }

    async fn playlist(&self, id: &str) -> CatalogResult<Collection> {
        let url = self.url("playlists", "id", id)?;
        self.get("playlist", url).await
    }

    async fn artist(&self, id: &str) -> CatalogResult<ArtistDetail> {
        let url = self.url("artists", "id", id)?;
        self.get("artist", url).await
    }

    async fn genre(&self, genre: &str) -> CatalogResult<Vec<Collection>> {
        let url = self.url("genres", "name", genre)?;
        self.get("genre", url).await
    }

    async fn chart(&self, timeframe: Timeframe) -> CatalogResult<Collection> {
        let url = self.url("charts", "period", timeframe.id())?;
        self.get("chart", url).await
    }
}
