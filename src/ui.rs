use crate::config::AppConfig;
use crate::session::Session;
use crate::theme::{BASE_CSS, theme_definition};
use crate::types::ThemeMode;
use crate::views::catalog::refresh_popular;
use crate::views::shared::{Notice, NoticeBanner, Services};
use crate::views::{AccountView, ChatView, FavoritesList, MovieList, ReminderButton, SearchBar};
use dioxus::prelude::*;

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let services = use_context_provider(|| Services::from_config(&config));
    let session = use_signal(|| Session::restore(services.store.clone(), config.code_book()));
    let notice = use_signal(|| Option::<Notice>::None);

    use_initial_listing(&services, session, notice);

    let theme = session.read().theme();

    rsx! {
        ThemeStyles { theme }
        div { class: "main-container",
            h1 { class: "title", "🎬 Movie Night" }
            NoticeBanner { notice }
            SearchBar { session, notice }
            AccountView { session, notice }
            MovieList { session, notice }
            FavoritesList { session }
            ChatView { session, notice }
            ReminderButton { notice }
        }
    }
}

fn use_initial_listing(services: &Services, session: Signal<Session>, notice: Signal<Option<Notice>>) {
    use_hook(|| refresh_popular(services, session, notice));
}

#[component]
fn ThemeStyles(theme: ThemeMode) -> Element {
    let definition = theme_definition(theme);
    rsx! {
        style { dangerous_inner_html: "{BASE_CSS}" }
        style { dangerous_inner_html: "{definition.css}" }
    }
}
