// SPDX-License-Identifier: MPL-2.0
//! Playback speed domain type.
//!
//! Speeds are restricted to the fixed preset list and cycle in order,
//! wrapping from the fastest back to the slowest.

use crate::config::PLAYBACK_SPEED_PRESETS;
use std::fmt;

/// One of [`PLAYBACK_SPEED_PRESETS`], stored by index.
///
/// # Example
///
/// ```
/// use pitchside::video_player::PlaybackSpeed;
///
/// let speed = PlaybackSpeed::new(2.0);
/// assert_eq!(speed.next().value(), 0.5);
/// assert_eq!(speed.to_string(), "2x");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSpeed(usize);

impl PlaybackSpeed {
    /// Snaps `speed` to the closest preset.
    #[must_use]
    pub fn new(speed: f64) -> Self {
        let index = PLAYBACK_SPEED_PRESETS
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - speed).abs().total_cmp(&(*b - speed).abs()))
            .map_or(0, |(index, _)| index);
        Self(index)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        PLAYBACK_SPEED_PRESETS[self.0]
    }

    /// The following preset, wrapping to the first after the last.
    #[must_use]
    pub fn next(self) -> Self {
        Self((self.0 + 1) % PLAYBACK_SPEED_PRESETS.len())
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Compact label such as `0.5x`, `1x` or `1.25x`.
impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn default_is_normal_speed() {
        assert_abs_diff_eq!(PlaybackSpeed::default().value(), 1.0);
    }

    #[test]
    fn new_snaps_to_nearest_preset() {
        assert_abs_diff_eq!(PlaybackSpeed::new(1.3).value(), 1.25);
        assert_abs_diff_eq!(PlaybackSpeed::new(9.0).value(), 2.0);
        assert_abs_diff_eq!(PlaybackSpeed::new(0.0).value(), 0.5);
    }

    #[test]
    fn next_walks_presets_in_order() {
        let mut speed = PlaybackSpeed::new(0.5);
        let mut seen = vec![speed.value()];
        for _ in 1..PLAYBACK_SPEED_PRESETS.len() {
            speed = speed.next();
            seen.push(speed.value());
        }
        assert_eq!(seen, PLAYBACK_SPEED_PRESETS.to_vec());
    }

    #[test]
    fn next_wraps_from_max_to_min() {
        let max = PlaybackSpeed::new(2.0);
        assert_abs_diff_eq!(max.next().value(), 0.5);
    }

    #[test]
    fn label_is_compact() {
        assert_eq!(PlaybackSpeed::new(0.5).to_string(), "0.5x");
        assert_eq!(PlaybackSpeed::new(1.0).to_string(), "1x");
        assert_eq!(PlaybackSpeed::new(1.25).to_string(), "1.25x");
    }
}
