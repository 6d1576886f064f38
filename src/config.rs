//! Configuration file parser for ~/.config/awwfeed/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are silently ignored by serde (with `deny_unknown_fields` off),
//! though we log a warning when the file contains potential typos.
use crate::util::{validate_feed_url, UrlValidationError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Feed loaded when nothing else is configured.
pub const DEFAULT_FEED_URL: &str = "https://www.reddit.com/r/aww.json";

/// Sent with every request; the default feed host throttles generic agents.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "awwfeed/",
    env!("CARGO_PKG_VERSION"),
    " (terminal accessibility demo)"
);

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid feed_url: {0}")]
    InvalidFeedUrl(#[from] UrlValidationError),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`. Command-line flags are
/// applied on top after loading.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the JSON feed to load.
    pub feed_url: String,

    /// `User-Agent` header sent with the feed request.
    pub user_agent: String,

    /// Per-load timeout in seconds. 0 falls back to the default (30).
    pub request_timeout_secs: u64,

    /// Theme variant name ("dark", "light" or "high-contrast").
    pub theme: String,

    /// Print the accessibility transcript instead of starting the TUI.
    pub screen_reader: bool,

    /// Rating shown when the app starts (clamped to 1..=5).
    pub initial_rating: u8,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            theme: "dark".to_string(),
            screen_reader: false,
            initial_rating: 1,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "feed_url",
        "user_agent",
        "request_timeout_secs",
        "theme",
        "screen_reader",
        "initial_rating",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check size before reading
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content, path)
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(path = %path.display(), feed_url = %config.feed_url, "Loaded configuration");
        Ok(config)
    }

    /// The validated feed URL.
    pub fn feed_url(&self) -> Result<Url, ConfigError> {
        Ok(validate_feed_url(&self.feed_url)?)
    }

    /// Per-load timeout.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("awwfeed_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.screen_reader);
        assert_eq!(config.initial_rating, 1);
        assert!(config.keybindings.is_empty());
        assert!(config.user_agent.starts_with("awwfeed/"));
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/awwfeed_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let path = write_config("empty", "");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("partial", "theme = \"high-contrast\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "high-contrast");
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert!(!config.screen_reader);
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
feed_url = "https://www.reddit.com/r/rarepuppers.json"
user_agent = "custom/1.0"
request_timeout_secs = 5
theme = "light"
screen_reader = true
initial_rating = 4

[keybindings]
quit = "Ctrl+q"
refresh = "F5"
"#;
        let path = write_config("full", content);
        let config = Config::load(&path).unwrap();

        assert_eq!(
            config.feed_url().unwrap().as_str(),
            "https://www.reddit.com/r/rarepuppers.json"
        );
        assert_eq!(config.user_agent, "custom/1.0");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.theme, "light");
        assert!(config.screen_reader);
        assert_eq!(config.initial_rating, 4);
        assert_eq!(
            config.keybindings.get("refresh").map(String::as_str),
            Some("F5")
        );
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config("unknown", "theme = \"light\"\nfavourite_dog = \"corgi\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "light");
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let path = write_config("wrong_type", "screen_reader = \"yes\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_invalid_feed_url() {
        let config = Config {
            feed_url: "gopher://example.com/feed".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.feed_url(),
            Err(ConfigError::InvalidFeedUrl(_))
        ));
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let big = format!("theme = \"{}\"\n", "x".repeat(1_100_000));
        let path = write_config("too_large", &big);
        assert!(matches!(Config::load(&path), Err(ConfigError::TooLarge(_))));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
