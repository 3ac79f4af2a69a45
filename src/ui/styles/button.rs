// SPDX-License-Identifier: MPL-2.0
//! Centralized button styles.

use crate::ui::design_tokens::{
    opacity,
    palette::{self, BLACK, WHITE},
    radius, shadow,
};
use iced::widget::button;
use iced::{Background, Border, Color, Theme};

fn brand(status: button::Status) -> button::Style {
    let (background, border_color, button_shadow) = match status {
        button::Status::Hovered => (palette::PRIMARY_400, palette::PRIMARY_500, shadow::MD),
        _ => (palette::PRIMARY_500, palette::PRIMARY_600, shadow::SM),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color: WHITE,
        border: Border {
            color: border_color,
            width: 1.0,
            radius: radius::SM.into(),
        },
        shadow: button_shadow,
        snap: true,
    }
}

fn muted(theme: &Theme) -> button::Style {
    let is_light = matches!(theme, Theme::Light);
    button::Style {
        background: Some(Background::Color(if is_light {
            palette::GRAY_200
        } else {
            palette::GRAY_700
        })),
        text_color: palette::GRAY_400,
        border: Border {
            color: palette::GRAY_400,
            width: 1.0,
            radius: radius::SM.into(),
        },
        shadow: shadow::NONE,
        snap: true,
    }
}

/// Main call to action (the speak button).
pub fn primary(theme: &Theme, status: button::Status) -> button::Style {
    match status {
        button::Status::Disabled => muted(theme),
        _ => brand(status),
    }
}

/// Active tab or selected row.
pub fn selected(theme: &Theme, status: button::Status) -> button::Style {
    primary(theme, status)
}

/// Inactive tab or plain row.
pub fn unselected(theme: &Theme, status: button::Status) -> button::Style {
    let is_light = matches!(theme, Theme::Light);
    let (bg_color, text_color) = if is_light {
        (palette::GRAY_100, palette::GRAY_900)
    } else {
        (palette::GRAY_700, WHITE)
    };

    match status {
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(bg_color)),
            text_color,
            border: Border {
                color: palette::PRIMARY_500,
                width: 1.0,
                radius: radius::SM.into(),
            },
            shadow: shadow::SM,
            snap: true,
        },
        button::Status::Disabled => muted(theme),
        _ => button::Style {
            background: Some(Background::Color(Color {
                a: opacity::TRANSPARENT,
                ..bg_color
            })),
            text_color,
            border: Border {
                radius: radius::SM.into(),
                ..Border::default()
            },
            shadow: shadow::NONE,
            snap: true,
        },
    }
}

/// Buttons drawn over the video picture.
pub fn video_control(_theme: &Theme, status: button::Status) -> button::Style {
    let alpha = match status {
        button::Status::Hovered => opacity::OVERLAY_HOVER,
        button::Status::Pressed => opacity::OVERLAY_PRESSED,
        _ => opacity::OVERLAY_MEDIUM,
    };

    button::Style {
        background: Some(Background::Color(Color { a: alpha, ..BLACK })),
        text_color: WHITE,
        border: Border {
            radius: radius::SM.into(),
            ..Border::default()
        },
        shadow: shadow::NONE,
        snap: true,
    }
}
