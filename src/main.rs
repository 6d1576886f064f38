use anyhow::{bail, Context, Result};
use awwfeed::accessibility::transcript;
use awwfeed::app::{App, AppEvent};
use awwfeed::config::Config;
use awwfeed::feed::{build_client, FeedLoader};
use awwfeed::rating::Rating;
use awwfeed::theme::ThemeVariant;
use awwfeed::ui;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Get the default config file path (~/.config/awwfeed/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("awwfeed")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "awwfeed",
    version,
    about = "Accessible terminal viewer for a JSON post feed"
)]
struct Args {
    /// Feed URL to load instead of the configured one
    #[arg(long, value_name = "URL")]
    feed_url: Option<String>,

    /// Config file (default: ~/.config/awwfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Load once and print what a screen reader would announce, without the TUI
    #[arg(long)]
    screen_reader: bool,

    /// Theme: dark, light or high-contrast
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the transcript or the TUI frame
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(url) = args.feed_url {
        config.feed_url = url;
    }
    let feed_url = config.feed_url().context("Invalid feed URL")?;

    let theme = match args.theme.as_deref() {
        Some(name) => match ThemeVariant::from_str_name(name) {
            Some(variant) => variant,
            None => bail!("Unknown theme '{}' (expected dark, light or high-contrast)", name),
        },
        None => ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme in config, using dark");
            ThemeVariant::Dark
        }),
    };

    let client = build_client(&config.user_agent).context("Failed to create HTTP client")?;
    let mut loader = FeedLoader::new(client, feed_url).with_timeout(config.request_timeout());
    let rating = Rating::new(config.initial_rating);

    if args.screen_reader || config.screen_reader {
        loader.load().await;
        for line in transcript(&rating, loader.state()) {
            println!("{}", line);
        }
        if loader.state().error().is_some() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut app = App::new(loader, theme);
    app.rating = rating;
    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
