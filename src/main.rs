use anyhow::Context;
use movienight::config::{AppConfig, parse_env_lines};
use tracing_subscriber::EnvFilter;

/// Bundled config for mobile builds (iOS/Android)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if std::env::var(&key).is_err() {
            // SAFETY: We're setting env vars at startup before any threads are spawned
            unsafe {
                std::env::set_var(&key, &value);
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("movienight=info"));
    // The UI runtime may install its own subscriber later; first one wins.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    let config = AppConfig::from_env().context("invalid Movie Night configuration")?;
    tracing::info!(
        api_base = %config.api_base,
        codes = config.redeem_codes.len(),
        "starting Movie Night"
    );

    dioxus::LaunchBuilder::new()
        .with_context(config)
        .launch(movienight::ui::App);
    Ok(())
}
