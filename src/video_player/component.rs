// SPDX-License-Identifier: MPL-2.0
//! Video player component.
//!
//! Owns the [`PlayerState`], the media element of the current session and the
//! control hide timer. Controls, media notifications and keyboard shortcuts
//! are turned into reducer [`Action`]s, and the resulting [`MediaCommand`]s
//! are carried out here.

use super::controls;
use super::fullscreen::{FullscreenHost, WindowFullscreen};
use super::hide_timer::HideTimer;
use super::state::{Action, MediaCommand, PlayerState};
use super::time_units::seek_fraction;
use super::Volume;
use crate::config::{
    VideoConfig, MAX_CONTROLS_HIDE_SECS, MIN_CONTROLS_HIDE_SECS, SKIP_STEP_SECS,
};
use crate::error::VideoError;
use crate::i18n::fluent::I18n;
use crate::media::{self, Frame, MediaElement, MediaEvent, PlaybackRequest};
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use iced::widget::{button, column, container, image, mouse_area, text, Space, Stack};
use iced::{event, keyboard, window, ContentFit, Element, Length, Subscription, Task};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Message {
    Controls(controls::Message),
    Media(MediaEvent),
    PointerMoved,
    HideElapsed(u64),
    FullscreenChanged(bool),
    DialogClosed,
    Retry,

    /// The hosting window became known.
    WindowOpened(window::Id),
    RawEvent {
        window: window::Id,
        event: event::Event,
    },
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

/// Player instance for one video source.
pub struct State {
    player: PlayerState,
    source: PathBuf,
    session_id: u64,
    media: Option<Box<dyn MediaElement>>,
    frame: Option<Frame>,
    error: Option<VideoError>,
    hide_timer: HideTimer,
    window: Option<window::Id>,
    track_pointer: Option<(f32, f32)>,
}

impl State {
    pub fn new(config: &VideoConfig, source: PathBuf) -> Self {
        let hide_secs = config
            .controls_hide_secs
            .clamp(MIN_CONTROLS_HIDE_SECS, MAX_CONTROLS_HIDE_SECS);
        Self {
            player: PlayerState::new(
                Volume::new(config.volume),
                Duration::from_secs(u64::from(hide_secs)),
            ),
            source,
            session_id: 0,
            media: None,
            frame: None,
            error: None,
            hide_timer: HideTimer::default(),
            window: None,
            track_pointer: None,
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn error(&self) -> Option<&VideoError> {
        self.error.as_ref()
    }

    pub fn source(&self) -> &PathBuf {
        &self.source
    }

    /// Hands the component a running media element and syncs it to the
    /// current volume, mute and speed.
    pub fn attach_media(&mut self, media: Box<dyn MediaElement>) -> Task<Message> {
        self.media = Some(media);
        let commands = self.player.sync_commands();
        self.execute(commands)
    }

    /// Re-reads the window mode, for changes made while the player was not
    /// receiving window events.
    pub fn sync_fullscreen(&self) -> Task<Message> {
        WindowFullscreen::new(self.window)
            .query_fullscreen()
            .map(Message::FullscreenChanged)
    }

    /// Stops pending timers. Called before the window closes.
    pub fn teardown(&mut self) -> Task<Message> {
        self.dispatch(Action::Teardown)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.error.is_some() {
            return Subscription::none();
        }
        media::playback(PlaybackRequest {
            source: self.source.clone(),
            session_id: self.session_id,
        })
        .map(Message::Media)
    }

    pub fn update(&mut self, message: Message, i18n: &I18n) -> Task<Message> {
        match message {
            Message::Controls(message) => self.handle_controls(message, i18n),
            Message::Media(event) => self.handle_media_event(event),
            Message::PointerMoved => self.dispatch(Action::PointerMoved),
            Message::HideElapsed(generation) => self.dispatch(Action::HideElapsed { generation }),
            Message::FullscreenChanged(fullscreen) => {
                self.dispatch(Action::FullscreenChanged(fullscreen))
            }
            Message::DialogClosed => Task::none(),
            Message::Retry => {
                self.error = None;
                self.media = None;
                self.frame = None;
                self.session_id = self.session_id.wrapping_add(1);
                let fullscreen = self.player.is_fullscreen();
                self.player = PlayerState::new(self.player.volume(), self.player.hide_after());
                self.dispatch(Action::FullscreenChanged(fullscreen))
            }
            Message::WindowOpened(window) => {
                self.window = Some(window);
                Task::none()
            }
            Message::RawEvent { window, event } => {
                self.window = Some(window);
                self.handle_raw_event(event)
            }
        }
    }

    fn media_paused(&self) -> bool {
        self.media
            .as_ref()
            .map_or(!self.player.is_playing(), |media| media.is_paused())
    }

    fn dispatch(&mut self, action: Action) -> Task<Message> {
        let commands = self.player.reduce(action);
        self.execute(commands)
    }

    fn execute(&mut self, commands: Vec<MediaCommand>) -> Task<Message> {
        let mut tasks = Vec::new();
        for command in commands {
            match command {
                MediaCommand::ScheduleHide { generation, after } => {
                    tasks.push(self.hide_timer.schedule(generation, after, Message::HideElapsed));
                }
                MediaCommand::CancelHide => self.hide_timer.cancel(),
                MediaCommand::RequestFullscreen => tasks.push(
                    WindowFullscreen::new(self.window)
                        .request_fullscreen()
                        .map(Message::FullscreenChanged),
                ),
                MediaCommand::ExitFullscreen => tasks.push(
                    WindowFullscreen::new(self.window)
                        .exit_fullscreen()
                        .map(Message::FullscreenChanged),
                ),
                media_command => {
                    let Some(media) = self.media.as_mut() else {
                        continue;
                    };
                    match media_command {
                        MediaCommand::Play => media.play(),
                        MediaCommand::Pause => media.pause(),
                        MediaCommand::SetCurrentTime(secs) => media.set_current_time(secs),
                        MediaCommand::SetVolume(volume) => media.set_volume(volume),
                        MediaCommand::SetMuted(muted) => media.set_muted(muted),
                        MediaCommand::SetPlaybackRate(rate) => media.set_playback_rate(rate),
                        _ => {}
                    }
                }
            }
        }
        Task::batch(tasks)
    }

    fn handle_controls(&mut self, message: controls::Message, i18n: &I18n) -> Task<Message> {
        match message {
            controls::Message::TogglePlay => {
                let media_paused = self.media_paused();
                self.dispatch(Action::TogglePlay { media_paused })
            }
            controls::Message::SkipBackward => self.dispatch(Action::SeekBy {
                delta_secs: -SKIP_STEP_SECS,
            }),
            controls::Message::SkipForward => self.dispatch(Action::SeekBy {
                delta_secs: SKIP_STEP_SECS,
            }),
            controls::Message::TrackPointer { x, width } => {
                self.track_pointer = Some((x, width));
                Task::none()
            }
            controls::Message::TrackPressed => {
                let Some((x, width)) = self.track_pointer else {
                    return Task::none();
                };
                self.dispatch(Action::Seek {
                    fraction: seek_fraction(x, 0.0, width),
                })
            }
            controls::Message::SetVolume(volume) => self.dispatch(Action::SetVolume(volume)),
            controls::Message::ToggleMute => self.dispatch(Action::ToggleMute),
            controls::Message::CycleSpeed => self.dispatch(Action::CycleSpeed),
            controls::Message::ToggleFullscreen => self.dispatch(Action::ToggleFullscreen),
            controls::Message::Subtitles => placeholder_dialog(
                i18n.tr("video-subtitles-tooltip"),
                i18n.tr("video-subtitles-placeholder"),
            ),
            controls::Message::Quality => placeholder_dialog(
                i18n.tr("video-quality-tooltip"),
                i18n.tr("video-quality-placeholder"),
            ),
        }
    }

    fn handle_media_event(&mut self, event: MediaEvent) -> Task<Message> {
        match event {
            MediaEvent::Started(handle) => self.attach_media(Box::new(handle)),
            MediaEvent::LoadedMetadata(info) => {
                log::info!(
                    "Loaded {} ({}x{}, {:.1}s)",
                    self.source.display(),
                    info.width,
                    info.height,
                    info.duration_secs
                );
                self.dispatch(Action::MetadataLoaded {
                    duration: info.duration_secs,
                })
            }
            MediaEvent::Frame(frame) => {
                self.frame = Some(frame);
                Task::none()
            }
            MediaEvent::TimeUpdate(current_time) => {
                self.dispatch(Action::TimeUpdate { current_time })
            }
            MediaEvent::Ended => self.dispatch(Action::Ended),
            MediaEvent::Error(error) => {
                log::error!("Playback of {} failed: {error}", self.source.display());
                self.error = Some(error);
                self.media = None;
                self.dispatch(Action::Ended)
            }
        }
    }

    fn handle_raw_event(&mut self, event: event::Event) -> Task<Message> {
        if let event::Event::Window(window::Event::Resized(_)) = event {
            return self.sync_fullscreen();
        }
        let event::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) = event
        else {
            return Task::none();
        };
        if modifiers.command() || modifiers.alt() {
            return Task::none();
        }
        match self.shortcut_action(&key) {
            Some(action) => self.dispatch(action),
            None => Task::none(),
        }
    }

    fn shortcut_action(&self, key: &keyboard::Key) -> Option<Action> {
        use keyboard::key::Named;

        match key {
            keyboard::Key::Named(Named::Space) => Some(Action::TogglePlay {
                media_paused: self.media_paused(),
            }),
            keyboard::Key::Named(Named::ArrowLeft) => Some(Action::SeekBy {
                delta_secs: -SKIP_STEP_SECS,
            }),
            keyboard::Key::Named(Named::ArrowRight) => Some(Action::SeekBy {
                delta_secs: SKIP_STEP_SECS,
            }),
            keyboard::Key::Named(Named::Escape) => Some(Action::ExitFullscreen),
            keyboard::Key::Character(c) if c.eq_ignore_ascii_case("m") => Some(Action::ToggleMute),
            keyboard::Key::Character(c) if c.eq_ignore_ascii_case("f") => {
                Some(Action::ToggleFullscreen)
            }
            _ => None,
        }
    }

    /// Message for a click on the picture itself.
    fn surface_press(&self) -> Option<Message> {
        self.error
            .is_none()
            .then_some(Message::Controls(controls::Message::TogglePlay))
    }

    fn shows_play_overlay(&self) -> bool {
        self.error.is_none() && !self.player.is_playing()
    }

    pub fn view<'a>(&'a self, ctx: ViewContext<'a>) -> Element<'a, Message> {
        let i18n = ctx.i18n;

        let surface: Element<'a, Message> = if let Some(error) = &self.error {
            column![
                text(i18n.tr(error.i18n_key())).size(typography::BODY),
                text(error.to_string()).size(typography::CAPTION),
                button(text(i18n.tr("video-retry")))
                    .on_press(Message::Retry)
                    .style(styles::button::primary),
            ]
            .spacing(spacing::XS)
            .align_x(iced::Alignment::Center)
            .into()
        } else if let Some(frame) = &self.frame {
            image(frame.handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        } else {
            text(i18n.tr("video-loading")).size(typography::BODY).into()
        };

        let surface = container(surface)
            .center(Length::Fill)
            .style(styles::container::video_surface);

        let mut layers = Stack::new()
            .width(Length::Fill)
            .height(Length::Fill)
            .push(surface);

        if self.shows_play_overlay() {
            let play = button(text("\u{25B6}").size(typography::DISPLAY))
                .padding([spacing::SM, spacing::LG])
                .style(styles::button::video_control)
                .on_press(Message::Controls(controls::Message::TogglePlay));
            layers = layers.push(container(play).center(Length::Fill));
        }

        if self.player.show_controls() {
            let bar = controls::view(controls::ViewContext { i18n }, &self.player)
                .map(Message::Controls);
            layers = layers.push(column![Space::new().height(Length::Fill), bar]);
        }

        let area = mouse_area(layers).on_move(|_| Message::PointerMoved);
        match self.surface_press() {
            Some(message) => area.on_press(message).into(),
            None => area.into(),
        }
    }
}

fn placeholder_dialog(title: String, description: String) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Info)
                .set_title(title)
                .set_description(description)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::DialogClosed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::media::MediaInfo;
    use crate::test_utils::assert_abs_diff_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct FakeLog {
        paused: bool,
        time: f64,
        volume: f32,
        muted: bool,
        rate: f64,
        calls: Vec<&'static str>,
    }

    struct FakeMedia(Rc<RefCell<FakeLog>>);

    impl MediaElement for FakeMedia {
        fn play(&mut self) {
            let mut log = self.0.borrow_mut();
            log.paused = false;
            log.calls.push("play");
        }
        fn pause(&mut self) {
            let mut log = self.0.borrow_mut();
            log.paused = true;
            log.calls.push("pause");
        }
        fn is_paused(&self) -> bool {
            self.0.borrow().paused
        }
        fn current_time(&self) -> f64 {
            self.0.borrow().time
        }
        fn set_current_time(&mut self, secs: f64) {
            self.0.borrow_mut().time = secs;
        }
        fn duration(&self) -> f64 {
            100.0
        }
        fn set_volume(&mut self, volume: f32) {
            self.0.borrow_mut().volume = volume;
        }
        fn set_muted(&mut self, muted: bool) {
            self.0.borrow_mut().muted = muted;
        }
        fn set_playback_rate(&mut self, rate: f64) {
            self.0.borrow_mut().rate = rate;
        }
    }

    fn attached() -> (State, Rc<RefCell<FakeLog>>, I18n) {
        let config = Config::default();
        let i18n = I18n::new(None, &config);
        let mut state = State::new(&config.video, PathBuf::from("clip.mp4"));
        let log = Rc::new(RefCell::new(FakeLog {
            paused: true,
            ..FakeLog::default()
        }));
        let _ = state.attach_media(Box::new(FakeMedia(Rc::clone(&log))));
        let _ = state.update(
            Message::Media(MediaEvent::LoadedMetadata(MediaInfo {
                width: 640,
                height: 360,
                duration_secs: 100.0,
                has_audio: true,
            })),
            &i18n,
        );
        (state, log, i18n)
    }

    fn press(state: &mut State, key: keyboard::Key) {
        if let Some(action) = state.shortcut_action(&key) {
            let _ = state.dispatch(action);
        }
    }

    #[test]
    fn attach_syncs_output_settings() {
        let (_, log, _) = attached();
        let log = log.borrow();
        assert_abs_diff_eq!(log.volume, 1.0);
        assert!(!log.muted);
        assert_abs_diff_eq!(log.rate, 1.0);
    }

    #[test]
    fn toggle_play_follows_media_state() {
        let (mut state, log, i18n) = attached();
        let _ = state.update(Message::Controls(controls::Message::TogglePlay), &i18n);
        assert!(state.player().is_playing());
        assert!(!log.borrow().paused);

        let _ = state.update(Message::Controls(controls::Message::TogglePlay), &i18n);
        assert!(!state.player().is_playing());
        assert_eq!(log.borrow().calls, vec!["play", "pause"]);
    }

    #[test]
    fn track_click_seeks_to_pointer_fraction() {
        let (mut state, log, i18n) = attached();
        let _ = state.update(
            Message::Controls(controls::Message::TrackPointer {
                x: 50.0,
                width: 200.0,
            }),
            &i18n,
        );
        let _ = state.update(Message::Controls(controls::Message::TrackPressed), &i18n);
        assert_abs_diff_eq!(log.borrow().time, 25.0);
        assert_abs_diff_eq!(state.player().progress(), 25.0);
    }

    #[test]
    fn track_click_without_pointer_is_ignored() {
        let (mut state, log, i18n) = attached();
        let _ = state.update(Message::Controls(controls::Message::TrackPressed), &i18n);
        assert_abs_diff_eq!(log.borrow().time, 0.0);
    }

    #[test]
    fn keyboard_shortcuts_drive_player() {
        use keyboard::key::Named;

        let (mut state, log, _) = attached();
        press(&mut state, keyboard::Key::Named(Named::Space));
        assert!(state.player().is_playing());

        press(&mut state, keyboard::Key::Named(Named::ArrowRight));
        assert_abs_diff_eq!(log.borrow().time, SKIP_STEP_SECS);
        press(&mut state, keyboard::Key::Named(Named::ArrowLeft));
        assert_abs_diff_eq!(log.borrow().time, 0.0);

        press(&mut state, keyboard::Key::Character("M".into()));
        assert!(state.player().is_muted());
        assert!(log.borrow().muted);
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let (state, _, _) = attached();
        assert!(state
            .shortcut_action(&keyboard::Key::Character("x".into()))
            .is_none());
    }

    #[test]
    fn zero_volume_mutes_media() {
        let (mut state, log, i18n) = attached();
        let _ = state.update(Message::Controls(controls::Message::SetVolume(0.0)), &i18n);
        assert!(log.borrow().muted);
        let _ = state.update(Message::Controls(controls::Message::SetVolume(0.5)), &i18n);
        assert!(log.borrow().muted);
        assert_abs_diff_eq!(log.borrow().volume, 0.5);
    }

    #[test]
    fn clicking_the_picture_toggles_playback() {
        let (mut state, log, i18n) = attached();
        assert!(state.shows_play_overlay());

        let message = state.surface_press().expect("picture should be clickable");
        let _ = state.update(message, &i18n);
        assert!(state.player().is_playing());
        assert!(!state.shows_play_overlay());

        let message = state.surface_press().expect("picture should be clickable");
        let _ = state.update(message, &i18n);
        assert!(!state.player().is_playing());
        assert!(state.shows_play_overlay());
        assert_eq!(log.borrow().calls, vec!["play", "pause"]);
    }

    #[test]
    fn error_surface_is_not_clickable() {
        let (mut state, _, i18n) = attached();
        let _ = state.update(
            Message::Media(MediaEvent::Error(VideoError::CorruptedFile)),
            &i18n,
        );
        assert!(state.surface_press().is_none());
        assert!(!state.shows_play_overlay());
    }

    #[test]
    fn retry_keeps_confirmed_fullscreen() {
        let (mut state, _, i18n) = attached();
        let _ = state.update(Message::FullscreenChanged(true), &i18n);
        let _ = state.update(
            Message::Media(MediaEvent::Error(VideoError::NoVideoStream)),
            &i18n,
        );
        let _ = state.update(Message::Retry, &i18n);
        assert!(state.player().is_fullscreen());
    }

    #[test]
    fn window_becomes_known_before_any_input() {
        let (mut state, _, i18n) = attached();
        assert_eq!(state.sync_fullscreen().units(), 0);

        let _ = state.update(Message::WindowOpened(window::Id::unique()), &i18n);
        assert!(state.sync_fullscreen().units() > 0);
        let toggle = state.update(
            Message::Controls(controls::Message::ToggleFullscreen),
            &i18n,
        );
        assert!(toggle.units() > 0);
        assert!(!state.player().is_fullscreen());
    }

    #[test]
    fn error_stops_session_and_retry_restarts_it() {
        let (mut state, _, i18n) = attached();
        let _ = state.update(
            Message::Media(MediaEvent::Error(VideoError::NoVideoStream)),
            &i18n,
        );
        assert!(state.error().is_some());
        assert!(!state.player().is_playing());

        let _ = state.update(Message::Retry, &i18n);
        assert!(state.error().is_none());
        assert_eq!(state.session_id, 1);
    }

    #[test]
    fn fullscreen_confirmation_updates_state() {
        let (mut state, _, i18n) = attached();
        let _ = state.update(Message::FullscreenChanged(true), &i18n);
        assert!(state.player().is_fullscreen());
    }

    #[test]
    fn hide_delay_is_clamped() {
        let config = VideoConfig {
            controls_hide_secs: 300,
            ..VideoConfig::default()
        };
        let state = State::new(&config, PathBuf::from("clip.mp4"));
        assert_eq!(
            state.player().hide_after(),
            Duration::from_secs(u64::from(MAX_CONTROLS_HIDE_SECS))
        );
    }
}
