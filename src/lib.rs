// SPDX-License-Identifier: MPL-2.0
//! `pitchside` is a live commentary desk built with the Iced GUI framework.
//!
//! It polls a commentary feed, reads the current line aloud through a
//! text-to-speech service, and plays the match video in a custom player
//! with keyboard shortcuts, auto-hiding controls and fullscreen support.

pub mod app;
pub mod commentary;
pub mod config;
pub mod error;
pub mod i18n;
pub mod media;
pub mod ui;
pub mod video_player;

#[cfg(test)]
pub(crate) mod test_utils;
