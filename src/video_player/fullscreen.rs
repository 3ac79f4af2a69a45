// SPDX-License-Identifier: MPL-2.0
//! Fullscreen capability of the window hosting the player.
//!
//! The player only asks for a mode change. The host answers later with the
//! mode it actually reached, and that answer is what updates the player.
//! Mode changes the player did not ask for (window manager shortcuts) are
//! picked up by querying the mode again.

use iced::{window, Task};

/// Something that can enter and leave fullscreen.
///
/// Each request resolves to the fullscreen flag read back from the host,
/// which acts as the change notification.
pub trait FullscreenHost {
    fn request_fullscreen(&self) -> Task<bool>;
    fn exit_fullscreen(&self) -> Task<bool>;

    /// Reports the current mode without changing it.
    fn query_fullscreen(&self) -> Task<bool>;
}

/// True when `mode` covers the whole screen.
#[must_use]
pub fn is_fullscreen_mode(mode: window::Mode) -> bool {
    mode == window::Mode::Fullscreen
}

/// Fullscreen through the iced window runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowFullscreen {
    window: Option<window::Id>,
}

impl WindowFullscreen {
    #[must_use]
    pub fn new(window: Option<window::Id>) -> Self {
        Self { window }
    }

    fn set(&self, fullscreen: bool) -> Task<bool> {
        let Some(id) = self.window else {
            log::debug!("No window known yet, ignoring fullscreen={fullscreen}");
            return Task::none();
        };
        let mode = if fullscreen {
            window::Mode::Fullscreen
        } else {
            window::Mode::Windowed
        };
        window::set_mode::<window::Mode>(id, mode)
            .chain(window::mode(id))
            .map(is_fullscreen_mode)
    }
}

impl FullscreenHost for WindowFullscreen {
    fn request_fullscreen(&self) -> Task<bool> {
        self.set(true)
    }

    fn exit_fullscreen(&self) -> Task<bool> {
        self.set(false)
    }

    fn query_fullscreen(&self) -> Task<bool> {
        match self.window {
            Some(id) => window::mode(id).map(is_fullscreen_mode),
            None => Task::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fullscreen_mode_counts_as_fullscreen() {
        assert!(is_fullscreen_mode(window::Mode::Fullscreen));
        assert!(!is_fullscreen_mode(window::Mode::Windowed));
        assert!(!is_fullscreen_mode(window::Mode::Hidden));
    }

    #[test]
    fn unknown_window_produces_no_work() {
        let host = WindowFullscreen::default();
        assert_eq!(host.request_fullscreen().units(), 0);
        assert_eq!(host.exit_fullscreen().units(), 0);
        assert_eq!(host.query_fullscreen().units(), 0);
    }

    #[test]
    fn known_window_reads_mode_back() {
        let host = WindowFullscreen::new(Some(window::Id::unique()));
        assert!(host.request_fullscreen().units() > 0);
        assert!(host.query_fullscreen().units() > 0);
    }
}
