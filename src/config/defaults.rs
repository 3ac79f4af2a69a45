// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Feed**: Backend location for the live commentary feed
//! - **TTS**: Speech service endpoint and voice parameters
//! - **Video**: Source, volume, playback speed and control auto-hide

// ==========================================================================
// Feed Defaults
// ==========================================================================

/// Base URL of the backend serving `/live_feed`.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Path appended to the base URL for the feed request.
pub const LIVE_FEED_PATH: &str = "/live_feed";

/// Shortest accepted feed polling interval (in seconds).
pub const MIN_POLL_INTERVAL_SECS: u32 = 2;

// ==========================================================================
// TTS Defaults
// ==========================================================================

/// Vendor endpoint. Point `tts.endpoint` at a proxy to keep keys server-side.
pub const DEFAULT_TTS_ENDPOINT: &str = "https://api.elevenlabs.io";

pub const DEFAULT_TTS_VOICE_ID: &str = "EXAVITQu4vr4xnSDxMaL";

pub const DEFAULT_TTS_MODEL_ID: &str = "eleven_monolingual_v1";

pub const DEFAULT_TTS_STABILITY: f32 = 0.5;

pub const DEFAULT_TTS_SIMILARITY_BOOST: f32 = 0.8;

pub const DEFAULT_TTS_STYLE: f32 = 0.6;

pub const DEFAULT_TTS_USE_SPEAKER_BOOST: bool = true;

/// Environment variable read at runtime for the TTS API key.
pub const DEFAULT_TTS_API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

// ==========================================================================
// Video Defaults
// ==========================================================================

/// Video opened when neither the CLI nor the config names one.
pub const DEFAULT_VIDEO_SOURCE: &str = "videos/feature-6.mp4";

/// Initial playback volume (0.0 to 1.0).
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Minimum volume level.
pub const MIN_VOLUME: f32 = 0.0;

/// Maximum volume level.
pub const MAX_VOLUME: f32 = 1.0;

/// Volume slider granularity.
pub const VOLUME_STEP: f32 = 0.1;

/// Relative seek applied by the skip buttons and arrow keys (in seconds).
pub const SKIP_STEP_SECS: f64 = 10.0;

/// Playback speeds offered by the speed button, in cycling order.
pub const PLAYBACK_SPEED_PRESETS: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Default delay before playback controls hide (in seconds).
pub const DEFAULT_CONTROLS_HIDE_SECS: u32 = 3;

/// Minimum controls hide delay (in seconds).
pub const MIN_CONTROLS_HIDE_SECS: u32 = 1;

/// Maximum controls hide delay (in seconds).
pub const MAX_CONTROLS_HIDE_SECS: u32 = 30;

/// Interval between time-update notifications while playing (in milliseconds).
pub const TIME_UPDATE_INTERVAL_MS: u64 = 250;
