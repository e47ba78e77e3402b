use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
    pub label: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            label: "Dark",
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            label: "Light",
        },
    }
}

/// Layout shared by both themes; colors come from the theme variables.
pub const BASE_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, system-ui, sans-serif; background: var(--color-bg-primary); color: var(--color-text-primary); }
.main-container { padding: 10px; display: flex; flex-direction: column; gap: 0.5rem; }
.title { font-size: 24px; margin: 0 0 10px; }
.input { width: 100%; padding: 10px; margin: 5px 0; border: 1px solid var(--color-input-border); background: var(--color-input-bg); color: var(--color-text-primary); }
.btn { padding: 0.5rem 0.75rem; border: 1px solid var(--color-border); background: transparent; color: var(--color-text-primary); border-radius: 6px; }
.btn:disabled { opacity: 0.5; }
.hstack { display: flex; gap: 0.5rem; align-items: center; }
.settings-section { margin: 0.25rem 0; }
.text-muted { color: var(--color-text-muted); }
.section-title { margin: 1rem 0 0.25rem; color: var(--color-text-muted); }
.notice { padding: 0.5rem 0.75rem; border-radius: 6px; background: var(--color-surface-muted); }
.notice.error { border-left: 4px solid var(--color-error); }
.movie-card { margin-bottom: 20px; }
.poster { width: 100%; height: 300px; object-fit: cover; border-radius: 10px; background: var(--color-surface-muted); }
.stars button { border: none; background: transparent; font-size: 1.25rem; color: var(--color-star-off); }
.stars button.on { color: var(--color-star-on); }
.chat-line { padding: 0.25rem 0; border-bottom: 1px solid var(--color-surface-muted); }
"#;

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #000000;
    --color-text-primary: #ffffff;
    --color-text-muted: #cfcfcf;
    --color-border: #ffffff;
    --color-surface-muted: #111111;
    --color-input-border: #2a2a2a;
    --color-input-bg: #eeeeee;
    --color-star-on: gold;
    --color-star-off: #444444;
    --color-error: #ff3509;
}
.input { color: #000000; }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-text-primary: #000000;
    --color-text-muted: #4a4a4a;
    --color-border: #000000;
    --color-surface-muted: #e6e6e6;
    --color-input-border: #c2c2c2;
    --color-input-bg: #eeeeee;
    --color-star-on: #d4a000;
    --color-star-off: #c2c2c2;
    --color-error: #c62800;
}
"#;
