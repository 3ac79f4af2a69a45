// SPDX-License-Identifier: MPL-2.0
//! Volume domain type for the player.
//!
//! Wraps a linear gain in `[0.0, 1.0]`. Mute is tracked separately in
//! [`PlayerState`](super::PlayerState) so the slider keeps its position while
//! muted.

use crate::config::{DEFAULT_VOLUME, MAX_VOLUME, MIN_VOLUME};

/// Volume level, guaranteed to be within `[0.0, 1.0]`.
///
/// # Example
///
/// ```
/// use pitchside::video_player::Volume;
///
/// let vol = Volume::new(0.5);
/// assert_eq!(vol.value(), 0.5);
///
/// // Values outside range are clamped
/// assert_eq!(Volume::new(2.0).value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Creates a new volume level, clamping to valid range.
    ///
    /// Non-finite input is treated as silence.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        if volume.is_finite() {
            Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
        } else {
            Self(MIN_VOLUME)
        }
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// True at exactly zero, the level that implies mute.
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 <= MIN_VOLUME
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}
