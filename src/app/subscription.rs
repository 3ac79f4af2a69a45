// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Native events are routed to the visible screen. Window close requests are
//! handled on every screen so the player can release its timers first.

use super::{Message, Screen};
use crate::video_player;
use iced::{event, window, Subscription};

/// Creates the native event subscription for the current screen.
///
/// Only the player consumes raw events; keyboard shortcuts must not fire
/// while the commentary desk is shown.
pub fn create_event_subscription(screen: Screen) -> Subscription<Message> {
    match screen {
        Screen::Player => event::listen_with(|event, status, window_id| {
            if let event::Event::Window(window::Event::CloseRequested) = &event {
                return Some(Message::WindowCloseRequested(window_id));
            }

            match status {
                event::Status::Ignored => Some(Message::Player(
                    video_player::Message::RawEvent {
                        window: window_id,
                        event,
                    },
                )),
                event::Status::Captured => None,
            }
        }),
        Screen::Commentary => event::listen_with(|event, _status, window_id| {
            if let event::Event::Window(window::Event::CloseRequested) = &event {
                return Some(Message::WindowCloseRequested(window_id));
            }
            None
        }),
    }
}

/// Reports the window id as soon as the window exists, so fullscreen works
/// before any input reaches the player.
pub fn window_opened() -> Subscription<Message> {
    window::open_events().map(|id| Message::Player(video_player::Message::WindowOpened(id)))
}
