use super::{Catalog, CatalogError, CatalogResult};
use crate::types::{Movie, Video};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";

/// Client for the TMDB v3 REST API
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

// TMDB wraps every list in a paged envelope
#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

impl TmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    async fn get_results<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> CatalogResult<Vec<T>> {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::MissingApiKey)?;

        let url = format!("{}{}", self.base_url, path);
        let mut query = vec![("api_key", api_key)];
        query.extend_from_slice(extra);

        tracing::debug!(path, "catalog request");
        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Request(e.without_url()))?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let page: Page<T> = serde_json::from_str(&body)?;
        Ok(page.results)
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn popular(&self) -> CatalogResult<Vec<Movie>> {
        self.get_results("/movie/popular", &[]).await
    }

    async fn search(&self, query: &str) -> CatalogResult<Vec<Movie>> {
        self.get_results("/search/movie", &[("query", query)]).await
    }

    async fn videos(&self, movie_id: u64) -> CatalogResult<Vec<Video>> {
        self.get_results(&format!("/movie/{}/videos", movie_id), &[])
            .await
    }
}
