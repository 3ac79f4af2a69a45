// SPDX-License-Identifier: MPL-2.0
//! Player state and its reducer.
//!
//! [`PlayerState`] mirrors the media element into a flat record the controls
//! render from. Every change goes through [`PlayerState::reduce`], which
//! updates the record and returns the [`MediaCommand`]s the caller must carry
//! out. The reducer never touches the media element itself, so the whole
//! control surface can be tested without decoding anything.

use super::time_units::progress_percent;
use super::{PlaybackSpeed, Volume};
use std::time::Duration;

/// Named transitions of the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Play if the media reports paused, pause otherwise.
    TogglePlay { media_paused: bool },
    Play,
    Pause,

    /// Periodic position report from the media element.
    TimeUpdate { current_time: f64 },

    /// Duration became known.
    MetadataLoaded { duration: f64 },

    /// Seek to a fraction of the duration.
    Seek { fraction: f64 },

    /// Seek relative to the current position.
    SeekBy { delta_secs: f64 },

    SetVolume(f32),
    ToggleMute,
    CycleSpeed,
    ToggleFullscreen,

    /// Leave fullscreen if currently in it.
    ExitFullscreen,

    /// The host confirmed a window mode change.
    FullscreenChanged(bool),

    PointerMoved,

    /// A hide timer scheduled with `generation` fired.
    HideElapsed { generation: u64 },

    /// The media element reached the end.
    Ended,

    /// The player is going away; release timers.
    Teardown,
}

/// Side effects requested by the reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    SetCurrentTime(f64),
    SetVolume(f32),
    SetMuted(bool),
    SetPlaybackRate(f64),
    RequestFullscreen,
    ExitFullscreen,

    /// Start (or restart) the control hide timer.
    ScheduleHide { generation: u64, after: Duration },

    CancelHide,
}

/// Transient UI state of one player instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    is_playing: bool,
    current_time: f64,
    duration: f64,
    progress: f64,
    volume: Volume,
    is_muted: bool,
    playback_speed: PlaybackSpeed,
    show_controls: bool,
    is_fullscreen: bool,
    hide_generation: u64,
    hide_after: Duration,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(Volume::default(), Duration::from_secs(3))
    }
}

impl PlayerState {
    /// Fresh state: paused at zero, controls shown, windowed.
    #[must_use]
    pub fn new(volume: Volume, hide_after: Duration) -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            progress: 0.0,
            volume,
            is_muted: false,
            playback_speed: PlaybackSpeed::default(),
            show_controls: true,
            is_fullscreen: false,
            hide_generation: 0,
            hide_after,
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Position as a percentage, 0 while the duration is unknown.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    #[must_use]
    pub fn playback_speed(&self) -> PlaybackSpeed {
        self.playback_speed
    }

    #[must_use]
    pub fn show_controls(&self) -> bool {
        self.show_controls
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Pointer idle time before controls hide during playback.
    #[must_use]
    pub fn hide_after(&self) -> Duration {
        self.hide_after
    }

    #[must_use]
    pub fn hide_generation(&self) -> u64 {
        self.hide_generation
    }

    /// Commands that bring a freshly attached media element in line with
    /// this state.
    #[must_use]
    pub fn sync_commands(&self) -> Vec<MediaCommand> {
        let mut commands = vec![
            MediaCommand::SetVolume(self.volume.value()),
            MediaCommand::SetMuted(self.is_muted),
            MediaCommand::SetPlaybackRate(self.playback_speed.value()),
        ];
        if self.is_playing {
            commands.push(MediaCommand::Play);
        }
        commands
    }

    fn set_position(&mut self, secs: f64) {
        self.current_time = if self.duration > 0.0 {
            secs.clamp(0.0, self.duration)
        } else {
            secs.max(0.0)
        };
        self.progress = progress_percent(self.current_time, self.duration);
    }

    /// Applies `action` and returns the commands to run against the media.
    pub fn reduce(&mut self, action: Action) -> Vec<MediaCommand> {
        match action {
            Action::TogglePlay { media_paused } => {
                if media_paused {
                    self.reduce(Action::Play)
                } else {
                    self.reduce(Action::Pause)
                }
            }
            Action::Play => {
                self.is_playing = true;
                vec![MediaCommand::Play]
            }
            Action::Pause => {
                self.is_playing = false;
                self.show_controls = true;
                vec![MediaCommand::Pause]
            }
            Action::TimeUpdate { current_time } => {
                if current_time.is_finite() {
                    self.set_position(current_time);
                }
                Vec::new()
            }
            Action::MetadataLoaded { duration } => {
                self.duration = if duration.is_finite() && duration > 0.0 {
                    duration
                } else {
                    0.0
                };
                self.set_position(self.current_time);
                Vec::new()
            }
            Action::Seek { fraction } => {
                let fraction = if fraction.is_finite() {
                    fraction.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                // Unknown duration keeps both position and progress at 0
                self.set_position(fraction * self.duration);
                vec![MediaCommand::SetCurrentTime(self.current_time)]
            }
            Action::SeekBy { delta_secs } => {
                if !delta_secs.is_finite() {
                    return Vec::new();
                }
                self.set_position(self.current_time + delta_secs);
                vec![MediaCommand::SetCurrentTime(self.current_time)]
            }
            Action::SetVolume(level) => {
                self.volume = Volume::new(level);
                let mut commands = vec![MediaCommand::SetVolume(self.volume.value())];
                // Raising the volume never clears mute
                if self.volume.is_silent() {
                    self.is_muted = true;
                    commands.push(MediaCommand::SetMuted(true));
                }
                commands
            }
            Action::ToggleMute => {
                self.is_muted = !self.is_muted;
                vec![MediaCommand::SetMuted(self.is_muted)]
            }
            Action::CycleSpeed => {
                self.playback_speed = self.playback_speed.next();
                vec![MediaCommand::SetPlaybackRate(self.playback_speed.value())]
            }
            Action::ToggleFullscreen => {
                if self.is_fullscreen {
                    vec![MediaCommand::ExitFullscreen]
                } else {
                    vec![MediaCommand::RequestFullscreen]
                }
            }
            Action::ExitFullscreen => {
                if self.is_fullscreen {
                    vec![MediaCommand::ExitFullscreen]
                } else {
                    Vec::new()
                }
            }
            Action::FullscreenChanged(fullscreen) => {
                self.is_fullscreen = fullscreen;
                Vec::new()
            }
            Action::PointerMoved => {
                self.show_controls = true;
                self.hide_generation = self.hide_generation.wrapping_add(1);
                vec![MediaCommand::ScheduleHide {
                    generation: self.hide_generation,
                    after: self.hide_after,
                }]
            }
            Action::HideElapsed { generation } => {
                if generation == self.hide_generation && self.is_playing {
                    self.show_controls = false;
                }
                Vec::new()
            }
            Action::Ended => {
                self.is_playing = false;
                self.show_controls = true;
                Vec::new()
            }
            Action::Teardown => {
                // Outstanding timers become stale even if one still fires
                self.hide_generation = self.hide_generation.wrapping_add(1);
                vec![MediaCommand::CancelHide]
            }
        }
    }
}
