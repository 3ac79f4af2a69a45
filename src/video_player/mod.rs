// SPDX-License-Identifier: MPL-2.0
//! Video player widget.
//!
//! [`PlayerState`] and its reducer hold the control logic; [`component`]
//! wires it to a [`MediaElement`](crate::media::MediaElement), the window's
//! fullscreen mode and the control hide timer.

pub mod component;
pub mod controls;
pub mod fullscreen;
mod hide_timer;
mod playback_speed;
mod state;
pub mod time_units;
mod volume;

pub use component::{Message, State};
pub use fullscreen::{FullscreenHost, WindowFullscreen};
pub use playback_speed::PlaybackSpeed;
pub use state::{Action, MediaCommand, PlayerState};
pub use volume::Volume;
