// SPDX-License-Identifier: MPL-2.0
//! Time and position helpers for the player controls.

/// Formats seconds as `MM:SS`, or `HH:MM:SS` once hours are involved.
///
/// Negative and non-finite values display as zero.
///
/// # Examples
///
/// ```
/// use pitchside::video_player::time_units::format_time;
///
/// assert_eq!(format_time(125.0), "02:05");
/// assert_eq!(format_time(3665.0), "01:01:05");
/// ```
pub fn format_time(seconds: f64) -> String {
    let total_secs = if seconds.is_finite() {
        seconds.max(0.0) as u64
    } else {
        0
    };
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Position as a percentage of duration, in `[0, 100]`.
///
/// Zero while the duration is unknown.
#[inline]
pub fn progress_percent(current_secs: f64, duration_secs: f64) -> f64 {
    if duration_secs > 0.0 && current_secs.is_finite() {
        (current_secs / duration_secs * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Maps a pointer x coordinate on the timeline track to a fraction in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use pitchside::video_player::time_units::seek_fraction;
///
/// assert_eq!(seek_fraction(150.0, 100.0, 200.0), 0.25);
/// assert_eq!(seek_fraction(50.0, 100.0, 200.0), 0.0);
/// assert_eq!(seek_fraction(10.0, 0.0, 0.0), 0.0);
/// ```
pub fn seek_fraction(pointer_x: f32, track_left: f32, track_width: f32) -> f64 {
    if track_width <= 0.0 || !track_width.is_finite() || !pointer_x.is_finite() {
        return 0.0;
    }
    f64::from(((pointer_x - track_left) / track_width).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn format_time_handles_zero() {
        assert_eq!(format_time(0.0), "00:00");
    }

    #[test]
    fn format_time_handles_minutes() {
        assert_eq!(format_time(45.0), "00:45");
        assert_eq!(format_time(125.9), "02:05");
    }

    #[test]
    fn format_time_handles_hours() {
        assert_eq!(format_time(3665.0), "01:01:05");
        assert_eq!(format_time(36_000.0), "10:00:00");
    }

    #[test]
    fn format_time_clamps_invalid_input() {
        assert_eq!(format_time(-10.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }

    #[test]
    fn progress_is_zero_without_duration() {
        assert_abs_diff_eq!(progress_percent(12.0, 0.0), 0.0);
    }

    #[test]
    fn progress_tracks_ratio() {
        assert_abs_diff_eq!(progress_percent(30.0, 120.0), 25.0);
        assert_abs_diff_eq!(progress_percent(500.0, 120.0), 100.0);
    }

    #[test]
    fn seek_fraction_clamps_outside_track() {
        assert_abs_diff_eq!(seek_fraction(400.0, 100.0, 200.0), 1.0);
        assert_abs_diff_eq!(seek_fraction(0.0, 100.0, 200.0), 0.0);
        assert_abs_diff_eq!(seek_fraction(200.0, 100.0, 200.0), 0.5);
    }
}
