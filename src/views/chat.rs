use super::shared::{Notice, Services, report};
use crate::notify::Reminder;
use crate::session::Session;
use dioxus::events::Key;
use dioxus::prelude::*;

#[component]
pub fn ChatView(session: Signal<Session>, notice: Signal<Option<Notice>>) -> Element {
    let mut session = session;
    let mut input = use_signal(String::new);
    let lines = session.read().chat().to_vec();

    let mut send_message = move || {
        let text = input();
        if text.trim().is_empty() {
            return;
        }
        let result = session.write().send_message(text);
        // Clear even when the write failed; the message is already in the log.
        input.set(String::new());
        report(notice, result);
    };

    rsx! {
        h3 { class: "section-title", "Chat" }
        input {
            class: "input",
            r#type: "text",
            placeholder: "Chat...",
            value: "{input}",
            oninput: move |ev| input.set(ev.value()),
            onkeydown: move |ev| {
                if ev.key() == Key::Enter {
                    ev.prevent_default();
                    send_message();
                }
            },
        }
        button {
            class: "btn",
            r#type: "button",
            disabled: input().trim().is_empty(),
            onclick: move |_| send_message(),
            "Send Message"
        }
        for (i, line) in lines.iter().enumerate() {
            div { key: "{i}", class: "chat-line", "{line}" }
        }
    }
}

#[component]
pub fn ReminderButton(notice: Signal<Option<Notice>>) -> Element {
    let services = use_context::<Services>();
    let mut notice = notice;

    rsx! {
        button {
            class: "btn",
            r#type: "button",
            onclick: move |_| {
                let reminder = Reminder::movie_night(services.reminder_delay);
                spawn(async move {
                    reminder
                        .fire_after_delay(|fired| {
                            notice.set(Some(Notice::Info(format!("{} {}", fired.title, fired.body))));
                        })
                        .await;
                });
            },
            "🔔 Schedule Reminder"
        }
    }
}
