use super::shared::{Notice, Services, report};
use crate::catalog::{find_trailer_url, load_popular, poster_url, search_movies};
use crate::session::{MAX_RATING, MIN_RATING, Session};
use crate::types::Movie;
use dioxus::events::Key;
use dioxus::prelude::*;

/// Reload the popular listing (with cache fallback) into the session.
pub fn refresh_popular(services: &Services, session: Signal<Session>, notice: Signal<Option<Notice>>) {
    let services = services.clone();
    let mut session = session;
    spawn(async move {
        // Not claimed at the call site: the mount-time call runs during render.
        let request = session.write().begin_listing();
        let listing = load_popular(services.catalog.as_ref(), services.store.as_ref()).await;
        session.with_mut(|s| s.finish_listing(request, listing.movies));
        if let Some(err) = listing.cache_error {
            report(notice, Err(err.into()));
        }
    });
}

#[component]
pub fn SearchBar(session: Signal<Session>, notice: Signal<Option<Notice>>) -> Element {
    let services = use_context::<Services>();
    let mut session = session;
    let query = session.read().query().to_string();

    let mut run_search = move || {
        let query = session.read().query().trim().to_string();
        if query.is_empty() {
            refresh_popular(&services, session, notice);
            return;
        }
        let catalog = services.catalog.clone();
        let request = session.write().begin_listing();
        spawn(async move {
            let movies = search_movies(catalog.as_ref(), &query).await;
            session.with_mut(|s| s.finish_listing(request, movies));
        });
    };

    rsx! {
        input {
            class: "input",
            r#type: "search",
            placeholder: "Search movies...",
            value: "{query}",
            oninput: move |ev| session.write().set_query(ev.value()),
            onkeydown: move |ev| {
                if ev.key() == Key::Enter {
                    ev.prevent_default();
                    run_search();
                }
            },
        }
    }
}

#[component]
pub fn MovieList(session: Signal<Session>, notice: Signal<Option<Notice>>) -> Element {
    let movies = session.read().movies().to_vec();

    rsx! {
        if movies.is_empty() {
            p { class: "text-muted", "No movies to show." }
        }
        for movie in movies {
            MovieCard { key: "{movie.id}", movie: movie.clone(), session, notice }
        }
    }
}

#[component]
fn MovieCard(movie: Movie, session: Signal<Session>, notice: Signal<Option<Notice>>) -> Element {
    let services = use_context::<Services>();
    let mut session = session;
    let poster = poster_url(&services.image_base, movie.poster_path.as_deref());
    let rating = session.read().rating(movie.id).unwrap_or(0);
    let movie_id = movie.id;

    let favorite = movie.clone();
    let on_save = move |_| {
        let result = session.write().save_favorite(favorite.clone());
        report(notice, result);
    };

    let catalog = services.catalog.clone();
    let on_trailer = move |_| {
        let catalog = catalog.clone();
        spawn(async move {
            match find_trailer_url(catalog.as_ref(), movie_id).await {
                Some(url) => {
                    tracing::info!(movie_id, url = %url, "opening trailer");
                    let _ = document::eval(&format!("window.open({:?}, '_blank');", url));
                }
                None => tracing::debug!(movie_id, "no trailer available"),
            }
        });
    };

    rsx! {
        div { class: "movie-card",
            if let Some(src) = poster {
                img { class: "poster", src: "{src}", alt: "{movie.title}" }
            }
            h3 { "{movie.title}" }
            div { class: "hstack",
                button { class: "btn", r#type: "button", onclick: on_trailer, "Watch Trailer" }
                button { class: "btn", r#type: "button", onclick: on_save, "❤️ Save" }
            }
            div { class: "stars",
                for score in MIN_RATING..=MAX_RATING {
                    button {
                        class: format_args!("{}", if score <= rating { "on" } else { "" }),
                        r#type: "button",
                        title: "Rate {score}",
                        onclick: move |_| {
                            let result = session.write().rate(movie_id, score);
                            report(notice, result);
                        },
                        "★"
                    }
                }
            }
        }
    }
}

#[component]
pub fn FavoritesList(session: Signal<Session>) -> Element {
    let favorites = session.read().favorites().to_vec();
    if favorites.is_empty() {
        return rsx! {};
    }

    rsx! {
        h3 { class: "section-title", "Favorites" }
        for (i, movie) in favorites.iter().enumerate() {
            div { key: "{i}", class: "chat-line", "{movie.title}" }
        }
    }
}
