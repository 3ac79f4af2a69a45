// SPDX-License-Identifier: MPL-2.0
//! Shared playback clock.
//!
//! The clock is the timing master for a session: decoder threads pace
//! themselves against [`PlaybackClock::position_secs`] and the UI reads it for
//! time updates. It is lock-free; every field is an atomic.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Reference instant for storing `Instant`s as atomic microseconds.
static REFERENCE_INSTANT: OnceLock<Instant> = OnceLock::new();

#[allow(clippy::cast_possible_truncation)]
fn instant_to_us(instant: Instant) -> u64 {
    let reference = REFERENCE_INSTANT.get_or_init(Instant::now);
    instant.saturating_duration_since(*reference).as_micros() as u64
}

fn us_to_instant(us: u64) -> Instant {
    let reference = REFERENCE_INSTANT.get_or_init(Instant::now);
    *reference + Duration::from_micros(us)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn secs_to_us(secs: f64) -> u64 {
    (secs.max(0.0) * 1_000_000.0) as u64
}

#[allow(clippy::cast_precision_loss)]
fn us_to_secs(us: u64) -> f64 {
    us as f64 / 1_000_000.0
}

/// Position reached after `elapsed` wall time at `rate`, starting from `anchor_secs`.
#[must_use]
pub fn advance(anchor_secs: f64, elapsed: Duration, rate: f64) -> f64 {
    anchor_secs + elapsed.as_secs_f64() * rate
}

/// Rate-aware media clock.
///
/// Position is tracked as an anchor (media position and wall instant) plus
/// the elapsed wall time scaled by the playback rate while running.
#[derive(Debug)]
pub struct PlaybackClock {
    anchor_pos_us: AtomicU64,
    anchor_time_us: AtomicU64,
    rate_bits: AtomicU64,
    running: AtomicBool,
    /// Upper bound for the position; 0 means unbounded.
    end_us: AtomicU64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    /// Creates a paused clock at position zero, rate 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchor_pos_us: AtomicU64::new(0),
            anchor_time_us: AtomicU64::new(instant_to_us(Instant::now())),
            rate_bits: AtomicU64::new(1.0f64.to_bits()),
            running: AtomicBool::new(false),
            end_us: AtomicU64::new(0),
        }
    }

    /// Caps the reported position at the media duration.
    pub fn set_end(&self, duration_secs: f64) {
        self.end_us
            .store(secs_to_us(duration_secs), Ordering::SeqCst);
    }

    /// Current media position in seconds.
    #[must_use]
    pub fn position_secs(&self) -> f64 {
        let anchor = us_to_secs(self.anchor_pos_us.load(Ordering::SeqCst));
        let position = if self.running.load(Ordering::SeqCst) {
            let since = us_to_instant(self.anchor_time_us.load(Ordering::SeqCst));
            advance(anchor, since.elapsed(), self.rate())
        } else {
            anchor
        };

        match self.end_us.load(Ordering::SeqCst) {
            0 => position,
            end => position.min(us_to_secs(end)),
        }
    }

    fn reanchor(&self, position_secs: f64) {
        self.anchor_pos_us
            .store(secs_to_us(position_secs), Ordering::SeqCst);
        self.anchor_time_us
            .store(instant_to_us(Instant::now()), Ordering::SeqCst);
    }

    /// Starts or resumes from the current position.
    pub fn play(&self) {
        self.reanchor(self.position_secs());
        self.running.store(true, Ordering::SeqCst);
    }

    /// Freezes the clock at the current position.
    pub fn pause(&self) {
        self.reanchor(self.position_secs());
        self.running.store(false, Ordering::SeqCst);
    }

    /// Jumps to `target_secs` without changing the running state.
    pub fn seek(&self, target_secs: f64) {
        self.reanchor(target_secs);
    }

    /// Changes speed; the position is continuous across the change.
    pub fn set_rate(&self, rate: f64) {
        self.reanchor(self.position_secs());
        self.rate_bits.store(rate.to_bits(), Ordering::SeqCst);
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        f64::from_bits(self.rate_bits.load(Ordering::SeqCst))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, F64_EPSILON};

    #[test]
    fn advance_scales_elapsed_by_rate() {
        assert_abs_diff_eq!(
            advance(10.0, Duration::from_secs(2), 1.5),
            13.0,
            epsilon = F64_EPSILON
        );
        assert_abs_diff_eq!(
            advance(4.0, Duration::from_millis(500), 0.5),
            4.25,
            epsilon = F64_EPSILON
        );
    }

    #[test]
    fn new_clock_is_paused_at_zero() {
        let clock = PlaybackClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.position_secs(), 0.0);
        assert_eq!(clock.rate(), 1.0);
    }

    #[test]
    fn seek_while_paused_holds_position() {
        let clock = PlaybackClock::new();
        clock.seek(42.5);
        std::thread::sleep(Duration::from_millis(5));
        assert_abs_diff_eq!(clock.position_secs(), 42.5, epsilon = 1e-6);
    }

    #[test]
    fn running_clock_advances() {
        let clock = PlaybackClock::new();
        clock.seek(1.0);
        clock.play();
        std::thread::sleep(Duration::from_millis(20));
        assert!(clock.position_secs() > 1.0);

        clock.pause();
        let frozen = clock.position_secs();
        std::thread::sleep(Duration::from_millis(10));
        assert_abs_diff_eq!(clock.position_secs(), frozen, epsilon = 1e-6);
    }

    #[test]
    fn rate_change_keeps_position_continuous() {
        let clock = PlaybackClock::new();
        clock.seek(5.0);
        clock.set_rate(2.0);
        assert_abs_diff_eq!(clock.position_secs(), 5.0, epsilon = 1e-6);
        assert_eq!(clock.rate(), 2.0);
    }

    #[test]
    fn position_is_capped_at_end() {
        let clock = PlaybackClock::new();
        clock.set_end(3.0);
        clock.seek(10.0);
        assert_abs_diff_eq!(clock.position_secs(), 3.0, epsilon = 1e-6);
    }
}
