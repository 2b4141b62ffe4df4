//! Ultistats client binary: talks to the statistics backend and manages local preferences.

use std::{env, sync::Arc};

use anyhow::{Context, bail};
use reqwest::Method;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ultistats_client::{
    config::AppConfig,
    dao::preferences::FilePreferences,
    display::{ConsoleDisplay, DisplayEnvironment},
    services::api_client::RequestOptions,
    state::{AppState, SharedState, Theme},
};

const USAGE: &str = "usage:
  ultistats-client fetch <endpoint> [METHOD] [JSON_BODY]
  ultistats-client theme [light|dark|toggle]
  ultistats-client styling";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = AppConfig::load();

    match args.first().map(String::as_str) {
        Some("fetch") => {
            let state = build_state(&config, None)?;
            run_fetch(&state, &args[1..]).await
        }
        Some("theme") => {
            let display: Arc<dyn DisplayEnvironment> =
                Arc::new(ConsoleDisplay::new(config.prefers_dark));
            let state = build_state(&config, Some(display))?;
            run_theme(&state, args.get(1).map(String::as_str))
        }
        Some("styling") => {
            let state = build_state(&config, None)?;
            let rendered = state
                .styling()
                .to_json_pretty()
                .context("rendering styling config")?;
            println!("{rendered}");
            Ok(())
        }
        _ => bail!("{USAGE}"),
    }
}

fn build_state(
    config: &AppConfig,
    display: Option<Arc<dyn DisplayEnvironment>>,
) -> anyhow::Result<SharedState> {
    let preferences = Arc::new(FilePreferences::new(&config.preferences_path));
    AppState::new(config, preferences, display).context("initializing client state")
}

async fn run_fetch(state: &SharedState, args: &[String]) -> anyhow::Result<()> {
    let [endpoint, rest @ ..] = args else {
        bail!("{USAGE}");
    };

    let mut options = RequestOptions::new();
    if let Some(method) = rest.first() {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("invalid HTTP method `{method}`"))?;
        options = options.method(method);
    }
    if let Some(body) = rest.get(1) {
        options = options.body(body.clone());
    }

    let value = state
        .api()
        .fetch_with_auth(endpoint, options)
        .await
        .with_context(|| format!("fetching `{endpoint}`"))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&value).context("rendering response")?
    );
    Ok(())
}

fn run_theme(state: &SharedState, command: Option<&str>) -> anyhow::Result<()> {
    let store = state.theme();
    let theme = match command {
        None => store.get(),
        Some("toggle") => store.toggle().context("toggling theme")?,
        Some(name) => {
            let theme: Theme = name.parse()?;
            store.set(theme).context("storing theme")?
        }
    };
    info!(%theme, "theme preference");
    println!("{theme}");
    Ok(())
}

/// Configure tracing subscribers; logs go to stderr so stdout stays machine readable.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
