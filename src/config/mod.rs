// SPDX-License-Identifier: MPL-2.0
//! Loading of user preferences from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and theme mode
//! - `[feed]` - Backend location and optional polling
//! - `[tts]` - Speech service endpoint, voice parameters and key lookup
//! - `[video]` - Video source, initial volume and control auto-hide
//!
//! Every field is optional; anything missing falls back to [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use pitchside::config;
//!
//! let (config, warning) = config::load();
//! if let Some(key) = warning {
//!     log::warn!("{key}");
//! }
//! println!("feed at {}", config.feed.live_feed_url());
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::Result;
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default)]
    pub theme_mode: ThemeMode,
}

/// Where the commentary feed comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Re-fetch interval. `None` fetches once on startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u32>,
}

impl FeedConfig {
    /// Full URL of the live feed endpoint.
    #[must_use]
    pub fn live_feed_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            LIVE_FEED_PATH
        )
    }

    /// Polling interval, never shorter than [`MIN_POLL_INTERVAL_SECS`].
    #[must_use]
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_secs
            .map(|secs| Duration::from_secs(u64::from(secs.max(MIN_POLL_INTERVAL_SECS))))
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            poll_interval_secs: None,
        }
    }
}

/// Text-to-speech service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TtsConfig {
    /// Service root; `/v1/text-to-speech/{voice_id}` is appended.
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_tts_voice_id")]
    pub voice_id: String,

    #[serde(default = "default_tts_model_id")]
    pub model_id: String,

    #[serde(default = "default_tts_stability")]
    pub stability: f32,

    #[serde(default = "default_tts_similarity_boost")]
    pub similarity_boost: f32,

    #[serde(default = "default_tts_style")]
    pub style: f32,

    #[serde(default = "default_tts_use_speaker_boost")]
    pub use_speaker_boost: bool,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_tts_api_key_env")]
    pub api_key_env: String,
}

impl TtsConfig {
    /// Reads the API key from the configured environment variable.
    ///
    /// Empty values count as absent.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// True when requests go straight to the vendor rather than a proxy.
    #[must_use]
    pub fn targets_vendor(&self) -> bool {
        self.endpoint.trim_end_matches('/') == DEFAULT_TTS_ENDPOINT
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            voice_id: default_tts_voice_id(),
            model_id: default_tts_model_id(),
            stability: DEFAULT_TTS_STABILITY,
            similarity_boost: DEFAULT_TTS_SIMILARITY_BOOST,
            style: DEFAULT_TTS_STYLE,
            use_speaker_boost: DEFAULT_TTS_USE_SPEAKER_BOOST,
            api_key_env: default_tts_api_key_env(),
        }
    }
}

/// Video player settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoConfig {
    #[serde(default = "default_video_source")]
    pub source: PathBuf,

    /// Initial volume (0.0 to 1.0).
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Seconds of pointer inactivity before controls hide during playback.
    #[serde(default = "default_controls_hide_secs")]
    pub controls_hide_secs: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            source: default_video_source(),
            volume: DEFAULT_VOLUME,
            controls_hide_secs: DEFAULT_CONTROLS_HIDE_SECS,
        }
    }
}

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub tts: TtsConfig,

    #[serde(default)]
    pub video: VideoConfig,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_tts_endpoint() -> String {
    DEFAULT_TTS_ENDPOINT.to_string()
}

fn default_tts_voice_id() -> String {
    DEFAULT_TTS_VOICE_ID.to_string()
}

fn default_tts_model_id() -> String {
    DEFAULT_TTS_MODEL_ID.to_string()
}

fn default_tts_stability() -> f32 {
    DEFAULT_TTS_STABILITY
}

fn default_tts_similarity_boost() -> f32 {
    DEFAULT_TTS_SIMILARITY_BOOST
}

fn default_tts_style() -> f32 {
    DEFAULT_TTS_STYLE
}

fn default_tts_use_speaker_boost() -> bool {
    DEFAULT_TTS_USE_SPEAKER_BOOST
}

fn default_tts_api_key_env() -> String {
    DEFAULT_TTS_API_KEY_ENV.to_string()
}

fn default_video_source() -> PathBuf {
    PathBuf::from(DEFAULT_VIDEO_SOURCE)
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_controls_hide_secs() -> u32 {
    DEFAULT_CONTROLS_HIDE_SECS
}

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with an i18n key describing the problem.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    log::warn!("Ignoring unreadable config {}: {}", path.display(), err);
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults_without_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn invalid_file_yields_defaults_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "not = valid = toml").unwrap();

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "not = valid = toml").unwrap();

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(
            &config_path,
            "[feed]\napi_base_url = \"http://feed.local:8080/\"\n\n[tts]\nvoice_id = \"abc\"\n",
        )
        .unwrap();

        let config = load_from_path(&config_path).unwrap();
        assert_eq!(config.feed.live_feed_url(), "http://feed.local:8080/live_feed");
        assert_eq!(config.tts.voice_id, "abc");
        assert_eq!(config.tts.model_id, DEFAULT_TTS_MODEL_ID);
        assert_eq!(config.video, VideoConfig::default());
    }

    #[test]
    fn theme_mode_parses_lowercase() {
        let config: Config = toml::from_str("[general]\ntheme_mode = \"light\"\n").unwrap();
        assert_eq!(config.general.theme_mode, ThemeMode::Light);
    }

    #[test]
    fn poll_interval_is_clamped_to_minimum() {
        let feed = FeedConfig {
            poll_interval_secs: Some(0),
            ..FeedConfig::default()
        };
        assert_eq!(
            feed.poll_interval(),
            Some(Duration::from_secs(u64::from(MIN_POLL_INTERVAL_SECS)))
        );
        assert_eq!(FeedConfig::default().poll_interval(), None);
    }

    #[test]
    fn default_tts_targets_vendor() {
        assert!(TtsConfig::default().targets_vendor());
        let proxied = TtsConfig {
            endpoint: "http://localhost:5000/tts-proxy".to_string(),
            ..TtsConfig::default()
        };
        assert!(!proxied.targets_vendor());
    }

    #[test]
    fn api_key_reads_named_env_var() {
        let tts = TtsConfig {
            api_key_env: "PITCHSIDE_TEST_TTS_KEY_PRESENT".to_string(),
            ..TtsConfig::default()
        };
        std::env::set_var("PITCHSIDE_TEST_TTS_KEY_PRESENT", "sk_test");
        assert_eq!(tts.api_key().as_deref(), Some("sk_test"));
        std::env::set_var("PITCHSIDE_TEST_TTS_KEY_PRESENT", "  ");
        assert_eq!(tts.api_key(), None);
        std::env::remove_var("PITCHSIDE_TEST_TTS_KEY_PRESENT");
    }
}
