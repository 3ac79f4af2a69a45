// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the commentary desk and
//! the video player.
//!
//! The `App` struct wires together the domains (commentary feed, speech,
//! video playback) and translates messages into side effects like network
//! requests or window mode changes. This file intentionally keeps policy
//! decisions (minimum window size, startup overrides) close to the main update
//! loop so it is easy to audit user-facing behavior.

mod message;
pub mod paths;
mod screen;
mod subscription;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;

use crate::commentary;
use crate::config::{self, Config};
use crate::i18n::fluent::I18n;
use crate::media;
use crate::ui::navbar;
use crate::ui::theming::ThemeMode;
use crate::video_player;
use iced::{window, Element, Subscription, Task, Theme};
use std::path::PathBuf;

/// Root Iced application state that bridges UI components, playback, and
/// localization.
pub struct App {
    pub i18n: I18n,
    screen: Screen,
    theme_mode: ThemeMode,
    commentary: commentary::State,
    player: video_player::State,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("theme_mode", &self.theme_mode)
            .finish_non_exhaustive()
    }
}

pub const WINDOW_DEFAULT_WIDTH: f32 = 1100.0;
pub const WINDOW_DEFAULT_HEIGHT: f32 = 760.0;
pub const MIN_WINDOW_WIDTH: f32 = 640.0;
pub const MIN_WINDOW_HEIGHT: f32 = 480.0;

/// Builds the window settings.
///
/// Close requests are delivered to `update` so the player can stop its
/// timers before the window goes away.
fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        exit_on_close_request: false,
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    paths::init_cli_override(flags.config_dir.clone());

    let boot = move || App::new(flags.clone());

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

/// Applies CLI overrides on top of the loaded configuration.
fn apply_flags(config: &mut Config, flags: &Flags) {
    if let Some(url) = &flags.api_base_url {
        config.feed.api_base_url.clone_from(url);
    }
    if let Some(path) = &flags.video_path {
        config.video.source = PathBuf::from(path);
    }
}

impl App {
    /// Initializes application state and kicks off the first feed fetch.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (mut config, config_warning) = config::load();
        apply_flags(&mut config, &flags);

        let i18n = I18n::new(flags.lang.clone(), &config);

        if let Some(key) = config_warning {
            log::warn!("{}", i18n.tr(&key));
        }

        if let Err(err) = media::init_ffmpeg() {
            log::error!("Video playback unavailable: {err}");
        }

        let (commentary, feed_task) = commentary::State::new(&config);
        let player = video_player::State::new(&config.video, config.video.source.clone());

        log::info!(
            "Feed at {}, video source {}",
            config.feed.live_feed_url(),
            config.video.source.display()
        );

        let app = Self {
            i18n,
            screen: Screen::default(),
            theme_mode: config.general.theme_mode,
            commentary,
            player,
        };

        let window_task = window::latest().and_then(|id| {
            Task::done(Message::Player(video_player::Message::WindowOpened(id)))
        });

        (
            app,
            Task::batch([feed_task.map(Message::Commentary), window_task]),
        )
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        self.theme_mode.to_iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(self.screen),
            subscription::window_opened(),
            self.commentary.subscription().map(Message::Commentary),
            self.player.subscription().map(Message::Player),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navbar(navbar_message) => {
                if let navbar::Event::SwitchTo(screen) = navbar::update(navbar_message, self.screen)
                {
                    self.switch_screen(screen)
                } else {
                    Task::none()
                }
            }
            Message::Commentary(commentary_message) => self
                .commentary
                .update(commentary_message)
                .map(Message::Commentary),
            Message::Player(player_message) => self
                .player
                .update(player_message, &self.i18n)
                .map(Message::Player),
            Message::WindowCloseRequested(id) => {
                log::info!("Window close requested, shutting down");
                self.player
                    .teardown()
                    .map(Message::Player)
                    .chain(window::close(id))
            }
        }
    }

    /// Leaving the player while fullscreen restores the windowed mode first.
    /// Entering it re-reads the window mode, which may have changed while
    /// the player was not receiving window events.
    fn switch_screen(&mut self, screen: Screen) -> Task<Message> {
        let previous = self.screen;
        self.screen = screen;

        if screen == Screen::Player {
            return self.player.sync_fullscreen().map(Message::Player);
        }

        if previous == Screen::Player && self.player.player().is_fullscreen() {
            return self
                .player
                .update(
                    video_player::Message::Controls(
                        video_player::controls::Message::ToggleFullscreen,
                    ),
                    &self.i18n,
                )
                .map(Message::Player);
        }
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            screen: self.screen,
            commentary: &self.commentary,
            player: &self.player,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_feed_and_video() {
        let mut config = Config::default();
        let flags = Flags {
            api_base_url: Some("http://127.0.0.1:9000".to_string()),
            video_path: Some("/tmp/match.mp4".to_string()),
            ..Flags::default()
        };

        apply_flags(&mut config, &flags);

        assert_eq!(config.feed.live_feed_url(), "http://127.0.0.1:9000/live_feed");
        assert_eq!(config.video.source, PathBuf::from("/tmp/match.mp4"));
    }

    #[test]
    fn empty_flags_keep_config() {
        let mut config = Config::default();
        apply_flags(&mut config, &Flags::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn switching_screens_keeps_windowed_player() {
        let (mut app, _task) = App::new(Flags {
            lang: Some("en-US".to_string()),
            api_base_url: Some("http://127.0.0.1:9".to_string()),
            ..Flags::default()
        });

        let _ = app.update(Message::Navbar(navbar::Message::Select(Screen::Player)));
        assert_eq!(app.screen, Screen::Player);
        let _ = app.update(Message::Navbar(navbar::Message::Select(Screen::Commentary)));
        assert_eq!(app.screen, Screen::Commentary);
        assert!(!app.player.player().is_fullscreen());
    }

    #[test]
    fn window_close_is_routed_through_update() {
        let settings = window_settings();
        assert!(!settings.exit_on_close_request);
        assert_eq!(
            settings.min_size,
            Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT))
        );
    }
}
