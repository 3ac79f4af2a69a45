// SPDX-License-Identifier: MPL-2.0
//! Player control bar.
//!
//! Play/pause, ±10 s skip, the clickable timeline, time display, mute and
//! volume, speed, the subtitle and quality placeholders, and fullscreen.

use super::time_units::format_time;
use super::PlayerState;
use crate::config::VOLUME_STEP;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{
    button, container, mouse_area, progress_bar, responsive, row, slider, text, tooltip, Text,
};
use iced::{mouse, Alignment, Element, Length, Size};

/// Messages emitted by the control bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    TogglePlay,
    SkipBackward,
    SkipForward,

    /// Pointer position over the timeline track, relative to its left edge.
    TrackPointer { x: f32, width: f32 },

    /// The timeline track was clicked at the last reported pointer position.
    TrackPressed,

    SetVolume(f32),
    ToggleMute,
    CycleSpeed,
    Subtitles,
    Quality,
    ToggleFullscreen,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
}

fn control<'a>(label: String, message: Message) -> button::Button<'a, Message> {
    button(text(label).size(typography::BODY))
        .on_press(message)
        .padding([spacing::XXS, spacing::XS])
        .height(Length::Fixed(sizing::BUTTON_HEIGHT))
        .style(styles::button::video_control)
}

fn with_tooltip<'a>(
    content: impl Into<Element<'a, Message>>,
    hint: String,
) -> Element<'a, Message> {
    tooltip(content, Text::new(hint), tooltip::Position::Top)
        .gap(spacing::XXS)
        .into()
}

fn timeline<'a>(progress: f64) -> Element<'a, Message> {
    let track = responsive(move |size: Size| {
        mouse_area(progress_bar(0.0..=100.0, progress as f32))
            .on_move(move |point| Message::TrackPointer {
                x: point.x,
                width: size.width,
            })
            .on_press(Message::TrackPressed)
            .interaction(mouse::Interaction::Pointer)
            .into()
    });

    container(track)
        .width(Length::Fill)
        .height(Length::Fixed(sizing::TIMELINE_HEIGHT))
        .into()
}

pub fn view<'a>(ctx: ViewContext<'a>, state: &PlayerState) -> Element<'a, Message> {
    let i18n = ctx.i18n;

    let play_label = if state.is_playing() {
        i18n.tr("video-pause")
    } else {
        i18n.tr("video-play")
    };
    let play = control(play_label, Message::TogglePlay)
        .width(Length::Fixed(sizing::CONTROL_BUTTON_WIDTH * 2.0));

    let back = with_tooltip(
        control("-10s".to_string(), Message::SkipBackward),
        i18n.tr("video-skip-backward-tooltip"),
    );
    let forward = with_tooltip(
        control("+10s".to_string(), Message::SkipForward),
        i18n.tr("video-skip-forward-tooltip"),
    );

    let time_display = text(format!(
        "{} / {}",
        format_time(state.current_time()),
        format_time(state.duration())
    ))
    .size(typography::CAPTION);

    let mute_label = if state.is_muted() {
        i18n.tr("video-unmute")
    } else {
        i18n.tr("video-mute")
    };
    let mute = if state.is_muted() {
        control(mute_label, Message::ToggleMute).style(styles::button::selected)
    } else {
        control(mute_label, Message::ToggleMute)
    };

    let volume = slider(0.0..=1.0, state.volume().value(), Message::SetVolume)
        .step(VOLUME_STEP)
        .width(Length::Fixed(sizing::VOLUME_SLIDER_WIDTH));

    let speed = with_tooltip(
        control(state.playback_speed().to_string(), Message::CycleSpeed)
            .width(Length::Fixed(sizing::CONTROL_BUTTON_WIDTH + spacing::MD)),
        i18n.tr("video-speed-tooltip"),
    );
    let subtitles = with_tooltip(
        control("CC".to_string(), Message::Subtitles),
        i18n.tr("video-subtitles-tooltip"),
    );
    let quality = with_tooltip(
        control("HD".to_string(), Message::Quality),
        i18n.tr("video-quality-tooltip"),
    );

    let fullscreen_label = if state.is_fullscreen() {
        i18n.tr("video-exit-fullscreen")
    } else {
        i18n.tr("video-fullscreen")
    };
    let fullscreen = control(fullscreen_label, Message::ToggleFullscreen);

    let buttons = row![
        play,
        back,
        forward,
        time_display,
        iced::widget::Space::new().width(Length::Fill),
        mute,
        volume,
        speed,
        subtitles,
        quality,
        fullscreen,
    ]
    .spacing(spacing::XS)
    .align_y(Alignment::Center);

    container(
        iced::widget::column![timeline(state.progress()), buttons]
            .spacing(spacing::XS)
            .width(Length::Fill),
    )
    .width(Length::Fill)
    .padding(spacing::XS)
    .style(styles::container::control_bar)
    .into()
}
