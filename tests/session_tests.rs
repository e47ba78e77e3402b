//! Integration tests for session state over the store and catalog
//!
//! Covers write-through, restart recovery, listing fallback and trial timing

use async_trait::async_trait;
use movienight::catalog::{Catalog, CatalogError, CatalogResult, TmdbClient};
use movienight::entitlement::{CodeBook, EntitlementError, TRIAL_WINDOW, Tier};
use movienight::session::{Session, SessionError};
use movienight::store::{self, MemoryStore, Store, StoreError, StoreResult, keys};
use movienight::types::{Movie, Video};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use time::Duration;
use time::macros::datetime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn codes() -> CodeBook {
    CodeBook::new(["MOVIEGOLD2025", "SILVERPASS"], "GOLD")
}

/// Catalog whose popular listing can be switched between success and failure.
struct ScriptedCatalog {
    movies: Vec<Movie>,
    online: AtomicBool,
}

impl ScriptedCatalog {
    fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            online: AtomicBool::new(true),
        }
    }

    fn go_offline(&self) {
        self.online.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn popular(&self) -> CatalogResult<Vec<Movie>> {
        if self.online.load(Ordering::SeqCst) {
            Ok(self.movies.clone())
        } else {
            Err(CatalogError::Status {
                status: 503,
                body: "offline".into(),
            })
        }
    }

    async fn search(&self, _query: &str) -> CatalogResult<Vec<Movie>> {
        Ok(Vec::new())
    }

    async fn videos(&self, _movie_id: u64) -> CatalogResult<Vec<Video>> {
        Ok(Vec::new())
    }
}

/// Store that reads from an inner store but rejects every write once tripped.
struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: AtomicBool::new(false),
        }
    }

    fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl Store for FlakyStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("disk full writing {key}")));
        }
        self.inner.set(key, value)
    }
}

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_fetch_yields_previous_listing() {
        let store = Arc::new(MemoryStore::new());
        let listing = vec![
            Movie::new(1, "Alien").with_poster("/alien.jpg"),
            Movie::new(2, "Aliens"),
            Movie::new(3, "Alien 3"),
        ];
        let catalog = ScriptedCatalog::new(listing.clone());

        let first = Session::initialize(store.clone(), codes(), &catalog).await;
        assert_eq!(first.movies(), listing.as_slice());

        catalog.go_offline();
        let second = Session::initialize(store.clone(), codes(), &catalog).await;
        assert_eq!(second.movies(), listing.as_slice());
    }

    #[tokio::test]
    async fn test_no_cache_and_failed_fetch_is_empty() {
        let catalog = ScriptedCatalog::new(Vec::new());
        catalog.go_offline();

        let session = Session::initialize(Arc::new(MemoryStore::new()), codes(), &catalog).await;
        assert!(session.movies().is_empty());
    }

    #[tokio::test]
    async fn test_http_failure_falls_back_to_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let cached = vec![Movie::new(680, "Pulp Fiction")];
        store::set_json(store.as_ref(), keys::CACHED_MOVIES, &cached).unwrap();

        let client = TmdbClient::new(server.uri(), Some("key".into()));
        let session = Session::initialize(store, codes(), &client).await;
        assert_eq!(session.movies(), cached.as_slice());
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn test_chat_log_keeps_call_order() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::restore(store.clone(), codes());
        let texts: Vec<String> = (1..=12).map(|n| format!("note #{n}")).collect();

        for text in &texts {
            session.send_message(text.clone()).unwrap();
        }

        let persisted: Vec<String> = store::get_json(store.as_ref(), keys::CHAT_LOG).unwrap();
        assert_eq!(persisted, texts);
        assert_eq!(session.chat(), texts.as_slice());
    }

    #[test]
    fn test_state_survives_restart() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::restore(store.clone(), codes());
        let movie = Movie::new(603, "The Matrix");

        session.save_favorite(movie.clone()).unwrap();
        session.save_favorite(movie.clone()).unwrap();
        session.send_message("tonight?").unwrap();
        session.start_trial(datetime!(2025-05-01 20:00 UTC)).unwrap();
        session.rate(603, 4).unwrap();
        session.redeem("MOVIEGOLD2025").unwrap();

        let mut restored = Session::restore(store.clone(), codes());
        assert_eq!(restored.favorites(), &[movie.clone(), movie]);
        assert_eq!(restored.chat(), &["tonight?".to_string()]);
        assert_eq!(
            restored.trial().map(|t| t.encode()).as_deref(),
            Some("2025-05-01T20:00:00.000Z")
        );
        assert_eq!(restored.tier(), Tier::Free);

        restored.show_movies(vec![Movie::new(603, "The Matrix")]);
        assert_eq!(restored.rating(603), Some(4));
    }

    #[test]
    fn test_failed_write_keeps_memory_and_reports() {
        let store = Arc::new(FlakyStore::new());
        let mut session = Session::restore(store.clone(), codes());
        session.send_message("first").unwrap();

        store.fail_writes();
        let err = session.send_message("second").unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert!(err.to_string().starts_with("Couldn't save your changes"));

        // Memory keeps the change, the store keeps the last good value.
        assert_eq!(session.chat(), &["first".to_string(), "second".to_string()]);
        let persisted: Vec<String> = store::get_json(store.as_ref(), keys::CHAT_LOG).unwrap();
        assert_eq!(persisted, vec!["first".to_string()]);

        let err = session.save_favorite(Movie::new(1, "Heat")).unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert_eq!(session.favorites().len(), 1);

        let err = session.rate(1, 4).unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert_eq!(session.rating(1), Some(4));
        assert_eq!(store.get(&keys::rating_key(1)), None);
    }

    #[test]
    fn test_failed_trial_write_still_blocks_restart() {
        let store = Arc::new(FlakyStore::new());
        store.fail_writes();
        let mut session = Session::restore(store.clone(), codes());
        let start = datetime!(2025-01-01 00:00 UTC);

        let err = session.start_trial(start).unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert!(session.trial_active(start));

        let err = session.start_trial(start + Duration::days(1)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Entitlement(EntitlementError::TrialAlreadyStarted { .. })
        ));
        assert_eq!(err.to_string(), "Trial already started on 2025-01-01T00:00:00.000Z");
        assert_eq!(store.get(keys::TRIAL_START), None);
    }

    #[test]
    fn test_corrupt_values_are_ignored_on_restore() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::FAVORITES, "{broken").unwrap();
        store.set(keys::TRIAL_START, "not a date").unwrap();

        let session = Session::restore(store, codes());
        assert!(session.favorites().is_empty());
        assert!(session.trial().is_none());
    }
}

mod entitlement_tests {
    use super::*;

    #[test]
    fn test_trial_timeline() {
        let mut session = Session::restore(Arc::new(MemoryStore::new()), codes());
        let start = datetime!(2025-02-10 08:00 UTC);

        assert!(!session.trial_active(start));
        session.start_trial(start).unwrap();

        assert!(session.trial_active(start));
        assert!(session.trial_active(start + TRIAL_WINDOW - Duration::seconds(1)));
        assert!(!session.trial_active(start + TRIAL_WINDOW + Duration::seconds(1)));
    }

    #[test]
    fn test_trial_start_is_immutable() {
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::restore(store.clone(), codes());
        session.start_trial(datetime!(2025-02-10 08:00 UTC)).unwrap();

        let mut restarted = Session::restore(store.clone(), codes());
        let err = restarted
            .start_trial(datetime!(2025-03-10 08:00 UTC))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Entitlement(EntitlementError::TrialAlreadyStarted { .. })
        ));
        assert_eq!(
            store.get(keys::TRIAL_START).as_deref(),
            Some("2025-02-10T08:00:00.000Z")
        );
    }

    #[test]
    fn test_reads_trial_start_written_by_older_builds() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::TRIAL_START, "2025-02-10T08:00:00.000Z").unwrap();

        let session = Session::restore(store, codes());
        assert!(session.trial_active(datetime!(2025-02-12 00:00 UTC)));
        assert!(!session.trial_active(datetime!(2025-02-18 00:00 UTC)));
    }

    #[test]
    fn test_redemption_is_idempotent() {
        let mut session = Session::restore(Arc::new(MemoryStore::new()), codes());
        for _ in 0..3 {
            assert_eq!(session.redeem("MOVIEGOLD2025").unwrap(), Tier::Gold);
        }
        for code in ["", "GOLD", "MOVIEGOLD2026", "silverpass"] {
            assert!(session.redeem(code).is_err());
            assert_eq!(session.tier(), Tier::Gold);
        }
    }
}
