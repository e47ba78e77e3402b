//! Catalog module for Movie Night
//!
//! Fetches listings, search results and trailer links from the remote movie
//! catalog. Network failures never reach the screen as errors: the popular
//! listing falls back to the last cached copy, everything else degrades to an
//! empty result.
//!
//! # Architecture
//!
//! - `Catalog` - async seam over the remote service
//! - `tmdb` - `TmdbClient`, the reqwest-backed implementation
//!
//! # Usage
//!
//! ```rust,no_run
//! use movienight::catalog::{TmdbClient, load_popular};
//! use movienight::store::MemoryStore;
//!
//! # async fn example() {
//! let client = TmdbClient::new("https://api.themoviedb.org/3", Some("key".into()));
//! let store = MemoryStore::new();
//! let listing = load_popular(&client, &store).await;
//! println!("{} movies", listing.movies.len());
//! # }
//! ```
mod tmdb;

pub use tmdb::{DEFAULT_API_BASE, TmdbClient};

use crate::store::{self, Store, StoreError, keys};
use crate::types::{Movie, Video};
use async_trait::async_trait;

pub const TRAILER_TYPE: &str = "Trailer";
pub const TRAILER_SITE: &str = "YouTube";
pub const YOUTUBE_WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no catalog API key configured")]
    MissingApiKey,

    #[error("catalog request failed: {0}")]
    Request(reqwest::Error),

    #[error("catalog error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn popular(&self) -> CatalogResult<Vec<Movie>>;
    async fn search(&self, query: &str) -> CatalogResult<Vec<Movie>>;
    async fn videos(&self, movie_id: u64) -> CatalogResult<Vec<Video>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingSource {
    Live,
    Cached,
    Empty,
}

#[derive(Debug)]
pub struct Listing {
    pub movies: Vec<Movie>,
    pub source: ListingSource,
    /// Set when a live listing could not be written to the cache.
    pub cache_error: Option<StoreError>,
}

/// Fetch the popular listing, refreshing the cache on success and falling back to it on failure.
pub async fn load_popular(catalog: &dyn Catalog, store: &dyn Store) -> Listing {
    match catalog.popular().await {
        Ok(movies) => {
            let cache_error = store::set_json(store, keys::CACHED_MOVIES, &movies).err();
            if let Some(err) = &cache_error {
                tracing::warn!(error = %err, "failed to cache popular listing");
            }
            tracing::info!(count = movies.len(), "loaded popular listing");
            Listing {
                movies,
                source: ListingSource::Live,
                cache_error,
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "popular listing unavailable, using cache");
            match store::get_json::<Vec<Movie>>(store, keys::CACHED_MOVIES) {
                Some(movies) => Listing {
                    movies,
                    source: ListingSource::Cached,
                    cache_error: None,
                },
                None => Listing {
                    movies: Vec::new(),
                    source: ListingSource::Empty,
                    cache_error: None,
                },
            }
        }
    }
}

/// Search the catalog. Failures are logged and yield no results.
pub async fn search_movies(catalog: &dyn Catalog, query: &str) -> Vec<Movie> {
    match catalog.search(query).await {
        Ok(movies) => movies,
        Err(err) => {
            tracing::warn!(query, error = %err, "search failed");
            Vec::new()
        }
    }
}

/// Watch URL of the movie's YouTube trailer, if the catalog lists one.
pub async fn find_trailer_url(catalog: &dyn Catalog, movie_id: u64) -> Option<String> {
    let videos = match catalog.videos(movie_id).await {
        Ok(videos) => videos,
        Err(err) => {
            tracing::warn!(movie_id, error = %err, "video lookup failed");
            return None;
        }
    };

    pick_trailer(&videos).map(|video| format!("{}{}", YOUTUBE_WATCH_BASE, video.key))
}

pub fn pick_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|video| video.kind == TRAILER_TYPE && video.site == TRAILER_SITE)
}

pub fn poster_url(image_base: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path?.trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(format!("{}/{}", image_base.trim_end_matches('/'), path))
}
