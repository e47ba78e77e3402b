//! Session state for the single-screen app
//!
//! Owned by the presentation layer. Mutations land in memory first and are then
//! written through to the store; a failed write is returned to the caller while
//! the in-memory change stays in place.

use crate::catalog::{self, Catalog};
use crate::entitlement::{self, CodeBook, EntitlementError, Tier, TrialRecord};
use crate::store::{self, Store, StoreError, keys};
use crate::types::{Movie, ThemeMode};
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Couldn't save your changes: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Entitlement(#[from] EntitlementError),

    #[error("Ratings go from 1 to 5, got {0}")]
    InvalidRating(u8),

    #[error("Message is empty")]
    EmptyMessage,
}

pub type SessionResult<T> = Result<T, SessionError>;

pub struct Session {
    store: Arc<dyn Store>,
    codes: CodeBook,
    tier: Tier,
    query: String,
    movies: Vec<Movie>,
    favorites: Vec<Movie>,
    ratings: HashMap<u64, u8>,
    chat: Vec<String>,
    trial: Option<TrialRecord>,
    dark_mode: bool,
    listing_request: u64,
}

impl Session {
    /// Rebuild the session from whatever the store holds.
    pub fn restore(store: Arc<dyn Store>, codes: CodeBook) -> Self {
        let favorites = store::get_json(store.as_ref(), keys::FAVORITES).unwrap_or_default();
        let chat = store::get_json(store.as_ref(), keys::CHAT_LOG).unwrap_or_default();
        let trial = store
            .get(keys::TRIAL_START)
            .and_then(|raw| match TrialRecord::decode(&raw) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring stored trial start");
                    None
                }
            });

        Self {
            store,
            codes,
            tier: Tier::Free,
            query: String::new(),
            movies: Vec::new(),
            favorites,
            ratings: HashMap::new(),
            chat,
            trial,
            dark_mode: true,
            listing_request: 0,
        }
    }

    /// Restore from the store and load the popular listing.
    pub async fn initialize(
        store: Arc<dyn Store>,
        codes: CodeBook,
        catalog: &dyn Catalog,
    ) -> Self {
        let mut session = Self::restore(store, codes);
        let listing = catalog::load_popular(catalog, session.store.as_ref()).await;
        session.show_movies(listing.movies);
        session
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn favorites(&self) -> &[Movie] {
        &self.favorites
    }

    pub fn chat(&self) -> &[String] {
        &self.chat
    }

    pub fn trial(&self) -> Option<&TrialRecord> {
        self.trial.as_ref()
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn theme(&self) -> ThemeMode {
        if self.dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Replace the displayed listing and pick up any stored ratings for it.
    pub fn show_movies(&mut self, movies: Vec<Movie>) {
        for movie in &movies {
            if self.ratings.contains_key(&movie.id) {
                continue;
            }
            if let Some(score) = store::get_json::<u8>(self.store.as_ref(), &keys::rating_key(movie.id)) {
                self.ratings.insert(movie.id, score);
            }
        }
        self.movies = movies;
    }

    /// Claim a ticket for a listing fetch. Newer tickets supersede older ones.
    pub fn begin_listing(&mut self) -> u64 {
        self.listing_request += 1;
        self.listing_request
    }

    /// Show a fetched listing unless a newer fetch was started since.
    pub fn finish_listing(&mut self, request: u64, movies: Vec<Movie>) -> bool {
        if request != self.listing_request {
            tracing::debug!(request, latest = self.listing_request, "dropping stale listing");
            return false;
        }
        self.show_movies(movies);
        true
    }

    /// Append to favorites. Duplicates are kept.
    pub fn save_favorite(&mut self, movie: Movie) -> SessionResult<()> {
        tracing::info!(movie_id = movie.id, "saving favorite");
        self.favorites.push(movie);
        store::set_json(self.store.as_ref(), keys::FAVORITES, &self.favorites)?;
        Ok(())
    }

    pub fn rate(&mut self, movie_id: u64, score: u8) -> SessionResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&score) {
            return Err(SessionError::InvalidRating(score));
        }

        self.ratings.insert(movie_id, score);
        store::set_json(self.store.as_ref(), &keys::rating_key(movie_id), &score)?;
        Ok(())
    }

    pub fn rating(&self, movie_id: u64) -> Option<u8> {
        self.ratings.get(&movie_id).copied()
    }

    /// Redeem a code for a tier. The tier is kept for this session only.
    pub fn redeem(&mut self, code: &str) -> SessionResult<Tier> {
        match self.codes.redeem(code) {
            Ok(tier) => {
                tracing::info!(tier = %tier, "code redeemed");
                self.tier = tier;
                Ok(tier)
            }
            Err(err) => {
                tracing::info!("rejected redemption code");
                Err(err.into())
            }
        }
    }

    pub fn start_trial(&mut self, now: OffsetDateTime) -> SessionResult<TrialRecord> {
        let record = entitlement::start_trial(self.trial.as_ref(), now)?;
        self.trial = Some(record);
        tracing::info!(started_at = %record.encode(), "trial started");
        self.store.set(keys::TRIAL_START, &record.encode())?;
        Ok(record)
    }

    pub fn trial_active(&self, now: OffsetDateTime) -> bool {
        entitlement::is_trial_active(self.trial.as_ref(), now)
    }

    pub fn send_message(&mut self, text: impl Into<String>) -> SessionResult<()> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        self.chat.push(text);
        store::set_json(self.store.as_ref(), keys::CHAT_LOG, &self.chat)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::DEFAULT_GOLD_MARKER;
    use crate::store::MemoryStore;
    use time::macros::datetime;

    fn session() -> (Arc<MemoryStore>, Session) {
        let store = Arc::new(MemoryStore::new());
        let codes = CodeBook::new(["MOVIEGOLD2025", "SILVERPASS"], DEFAULT_GOLD_MARKER);
        let session = Session::restore(store.clone(), codes);
        (store, session)
    }

    #[test]
    fn test_defaults() {
        let (_, session) = session();
        assert_eq!(session.tier(), Tier::Free);
        assert!(session.dark_mode());
        assert_eq!(session.theme(), ThemeMode::Dark);
        assert!(session.favorites().is_empty());
        assert!(session.trial().is_none());
    }

    #[test]
    fn test_invalid_code_keeps_tier() {
        let (_, mut session) = session();
        session.redeem("SILVERPASS").unwrap();

        let err = session.redeem("FAKE").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Entitlement(EntitlementError::InvalidCode)
        ));
        assert_eq!(session.tier(), Tier::Silver);
    }

    #[test]
    fn test_last_redemption_wins() {
        let (store, mut session) = session();
        assert_eq!(session.redeem("MOVIEGOLD2025").unwrap(), Tier::Gold);
        assert_eq!(session.redeem("SILVERPASS").unwrap(), Tier::Silver);
        assert_eq!(session.tier(), Tier::Silver);

        // Tier lives in memory only.
        let restored = Session::restore(store, CodeBook::new(["SILVERPASS"], "GOLD"));
        assert_eq!(restored.tier(), Tier::Free);
    }

    #[test]
    fn test_rating_is_stored_per_movie() {
        let (store, mut session) = session();
        session.rate(550, 5).unwrap();
        session.rate(550, 3).unwrap();

        assert_eq!(store.get("rating-550").as_deref(), Some("3"));
        assert_eq!(session.rating(550), Some(3));
        assert!(matches!(session.rate(550, 0), Err(SessionError::InvalidRating(0))));
        assert!(matches!(session.rate(550, 6), Err(SessionError::InvalidRating(6))));
        assert_eq!(session.rating(550), Some(3));
    }

    #[test]
    fn test_show_movies_loads_ratings() {
        let (store, _) = session();
        store.set("rating-7", "4").unwrap();

        let mut session = Session::restore(store, CodeBook::new(Vec::<String>::new(), "GOLD"));
        session.show_movies(vec![Movie::new(7, "Se7en"), Movie::new(8, "Other")]);

        assert_eq!(session.rating(7), Some(4));
        assert_eq!(session.rating(8), None);
    }

    #[test]
    fn test_blank_message_rejected() {
        let (store, mut session) = session();
        assert!(matches!(session.send_message("   "), Err(SessionError::EmptyMessage)));
        assert!(session.chat().is_empty());
        assert_eq!(store.get(keys::CHAT_LOG), None);
    }

    #[test]
    fn test_trial_written_as_timestamp() {
        let (store, mut session) = session();
        let now = datetime!(2025-06-01 09:15:30.250 UTC);

        session.start_trial(now).unwrap();

        assert_eq!(
            store.get(keys::TRIAL_START).as_deref(),
            Some("2025-06-01T09:15:30.250Z")
        );
        assert!(session.trial_active(now));
        assert!(matches!(
            session.start_trial(now),
            Err(SessionError::Entitlement(
                EntitlementError::TrialAlreadyStarted { .. }
            ))
        ));
    }

    #[test]
    fn test_stale_listing_is_dropped() {
        let (_, mut session) = session();
        let popular = session.begin_listing();
        let search = session.begin_listing();

        assert!(session.finish_listing(search, vec![Movie::new(1, "Alien")]));
        assert!(!session.finish_listing(popular, vec![Movie::new(2, "Top Gun")]));
        assert_eq!(session.movies(), &[Movie::new(1, "Alien")]);
    }

    #[test]
    fn test_query_and_dark_mode() {
        let (_, mut session) = session();
        session.set_query("alien");
        session.toggle_dark_mode();
        assert_eq!(session.query(), "alien");
        assert_eq!(session.theme(), ThemeMode::Light);
    }
}
