// SPDX-License-Identifier: MPL-2.0
//! Tab bar switching between the commentary desk and the video player.

use crate::app::Screen;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::Vertical,
    widget::{button, container, text, Row, Space},
    Element, Length,
};

/// Contextual data needed to render the navbar.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub active: Screen,
}

/// Messages emitted by the navbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Select(Screen),
}

/// Events propagated to the parent application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    None,
    SwitchTo(Screen),
}

/// Turns a navbar message into an event, ignoring clicks on the active tab.
#[must_use]
pub fn update(message: Message, active: Screen) -> Event {
    match message {
        Message::Select(screen) if screen != active => Event::SwitchTo(screen),
        Message::Select(_) => Event::None,
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let tab = |screen: Screen, key: &str| {
        let style = if screen == ctx.active {
            styles::button::selected
        } else {
            styles::button::unselected
        };
        button(text(ctx.i18n.tr(key)).size(typography::BODY))
            .height(sizing::BUTTON_HEIGHT)
            .padding([spacing::XS, spacing::MD])
            .on_press(Message::Select(screen))
            .style(style)
    };

    let row = Row::new()
        .spacing(spacing::XS)
        .padding(spacing::XS)
        .align_y(Vertical::Center)
        .push(text(ctx.i18n.tr("app-title")).size(typography::TITLE_MD))
        .push(Space::new().width(Length::Fill))
        .push(tab(Screen::Commentary, "navbar-commentary"))
        .push(tab(Screen::Player, "navbar-player"));

    container(row)
        .width(Length::Fill)
        .style(styles::container::panel)
        .into()
}
