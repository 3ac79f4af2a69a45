// SPDX-License-Identifier: MPL-2.0
//! The media element interface driven by the video player.
//!
//! Mirrors the small surface a player needs from whatever actually decodes
//! and renders media: transport, position, and output controls. Player logic
//! is written against this trait so it can run against a fake in tests.

/// Controls exposed by a loaded media resource.
pub trait MediaElement {
    /// Starts or resumes playback.
    fn play(&mut self);

    /// Pauses playback, keeping the current position.
    fn pause(&mut self);

    /// True when playback is not running.
    fn is_paused(&self) -> bool;

    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Seeks to `secs`.
    fn set_current_time(&mut self, secs: f64);

    /// Total length in seconds; 0.0 when unknown.
    fn duration(&self) -> f64;

    /// Output volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);

    fn set_muted(&mut self, muted: bool);

    /// Playback speed multiplier.
    fn set_playback_rate(&mut self, rate: f64);
}
