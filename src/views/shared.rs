use crate::catalog::{Catalog, TmdbClient};
use crate::config::AppConfig;
use crate::entitlement::Tier;
use crate::session::SessionResult;
use crate::store::{self, Store};
use dioxus::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// Long-lived collaborators shared through the component context.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn Store>,
    pub catalog: Arc<dyn Catalog>,
    pub image_base: String,
    pub reminder_delay: Duration,
}

impl Services {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            store: store::open_store(config.data_dir.clone()),
            catalog: Arc::new(TmdbClient::new(
                config.api_base.clone(),
                config.api_key.clone(),
            )),
            image_base: config.image_base.clone(),
            reminder_delay: config.reminder_delay,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Surface a failed action on the notice banner. The session keeps its in-memory change.
pub fn report(mut notice: Signal<Option<Notice>>, result: SessionResult<()>) {
    match result {
        Ok(()) => notice.set(None),
        Err(err) => {
            tracing::warn!(error = %err, "action failed");
            notice.set(Some(Notice::Error(err.to_string())));
        }
    }
}

pub fn unlocked_message(tier: Tier) -> String {
    format!("🎉 Unlocked {} Tier!", tier)
}

pub const INVALID_CODE_MESSAGE: &str = "❌ Invalid Code";

pub fn trial_status_label(active: bool) -> &'static str {
    if active { "✅ Trial Active" } else { "⏳ No Trial" }
}

#[component]
pub fn NoticeBanner(notice: Signal<Option<Notice>>) -> Element {
    let mut notice = notice;
    let Some(current) = notice() else {
        return rsx! {};
    };
    let (class, text) = match current {
        Notice::Info(text) => ("notice", text),
        Notice::Error(text) => ("notice error", text),
    };

    rsx! {
        div { class: class, role: "status",
            onclick: move |_| notice.set(None),
            "{text}"
        }
    }
}
