// SPDX-License-Identifier: MPL-2.0
//! Live commentary desk.
//!
//! Shows the commentary feed from the backend and reads the current line
//! aloud through a text-to-speech service.

pub mod component;
pub mod feed;
pub mod number_words;
pub mod speech;
pub mod speech_text;
pub mod tts;
pub mod view;

pub use component::{Message, State};
pub use feed::{parse_feed, FeedClient, FeedEntry};
pub use speech_text::prepare_for_speech;
pub use tts::{TtsClient, TtsRequest, VoiceSettings};
