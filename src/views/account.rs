use super::shared::{INVALID_CODE_MESSAGE, Notice, report, trial_status_label, unlocked_message};
use crate::entitlement::EntitlementError;
use crate::session::{Session, SessionError};
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use dioxus::prelude::*;
use time::OffsetDateTime;

#[component]
pub fn AccountView(session: Signal<Session>, notice: Signal<Option<Notice>>) -> Element {
    let mut session = session;
    let mut notice = notice;
    let mut code = use_signal(String::new);

    let trial_active = session.read().trial_active(OffsetDateTime::now_utc());
    let tier = session.read().tier();
    let other_theme = theme_definition(match session.read().theme() {
        ThemeMode::Dark => ThemeMode::Light,
        ThemeMode::Light => ThemeMode::Dark,
    });

    let redeem = move |_| {
        let entered = code();
        match session.write().redeem(&entered) {
            Ok(tier) => {
                notice.set(Some(Notice::Info(unlocked_message(tier))));
                code.set(String::new());
            }
            Err(SessionError::Entitlement(EntitlementError::InvalidCode)) => {
                notice.set(Some(Notice::Error(INVALID_CODE_MESSAGE.to_string())));
            }
            Err(err) => notice.set(Some(Notice::Error(err.to_string()))),
        }
    };

    rsx! {
        div { class: "settings-section",
            button {
                class: "btn",
                r#type: "button",
                onclick: move |_| session.write().toggle_dark_mode(),
                "Switch to {other_theme.label} Mode"
            }
        }
        div { class: "settings-section hstack",
            button {
                class: "btn",
                r#type: "button",
                onclick: move |_| {
                    let result = session.write().start_trial(OffsetDateTime::now_utc()).map(|_| ());
                    report(notice, result);
                },
                "Start Free Trial"
            }
            span { "{trial_status_label(trial_active)}" }
        }
        div { class: "settings-section",
            input {
                class: "input",
                r#type: "text",
                placeholder: "Enter gift code",
                value: "{code}",
                oninput: move |ev| code.set(ev.value()),
            }
            div { class: "hstack",
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: code().is_empty(),
                    onclick: redeem,
                    "Redeem Code"
                }
                span { "Tier: {tier}" }
            }
        }
    }
}
