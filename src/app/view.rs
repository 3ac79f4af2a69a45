// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.

use super::{Message, Screen};
use crate::commentary::{self, view::ViewContext as CommentaryViewContext};
use crate::i18n::fluent::I18n;
use crate::ui::navbar::{self, ViewContext as NavbarViewContext};
use crate::video_player::{self, component::ViewContext as PlayerViewContext};
use iced::{
    widget::{Column, Container},
    Element, Length,
};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub screen: Screen,
    pub commentary: &'a commentary::State,
    pub player: &'a video_player::State,
}

/// Renders the active screen below the navbar.
///
/// The navbar is hidden while the player is fullscreen.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let current_view: Element<'_, Message> = match ctx.screen {
        Screen::Commentary => {
            commentary::view::view(CommentaryViewContext { i18n: ctx.i18n }, ctx.commentary)
                .map(Message::Commentary)
        }
        Screen::Player => ctx
            .player
            .view(PlayerViewContext { i18n: ctx.i18n })
            .map(Message::Player),
    };

    let fullscreen = ctx.screen == Screen::Player && ctx.player.player().is_fullscreen();

    let mut column = Column::new().width(Length::Fill).height(Length::Fill);
    if !fullscreen {
        column = column.push(
            navbar::view(NavbarViewContext {
                i18n: ctx.i18n,
                active: ctx.screen,
            })
            .map(Message::Navbar),
        );
    }
    column = column.push(
        Container::new(current_view)
            .width(Length::Fill)
            .height(Length::Fill),
    );

    Container::new(column)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
