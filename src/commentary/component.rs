// SPDX-License-Identifier: MPL-2.0
//! Commentary panel state and update logic.
//!
//! The panel loads the feed when it is created and, if configured, on an
//! interval. Its only other state is the idle/speaking flag: speaking starts
//! when the speak button is pressed and ends when playback finishes or any
//! step fails. Failures are logged and never shown beyond the button going
//! back to idle.

use super::feed::{FeedClient, FeedEntry};
use super::speech;
use super::speech_text::prepare_for_speech;
use super::tts::TtsClient;
use crate::config::{Config, TtsConfig};
use crate::error::{Error, Result};
use iced::{time, Subscription, Task};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Message {
    /// Result of one feed request.
    FeedLoaded(std::result::Result<Vec<FeedEntry>, Error>),

    /// Poll interval elapsed.
    Refresh,

    /// A feed row was clicked.
    Select(usize),

    /// Speak the current commentary.
    Speak,

    SpeechFinished(std::result::Result<(), Error>),
}

pub struct State {
    feed: Vec<FeedEntry>,
    current: Option<usize>,
    speaking: bool,
    client: Option<FeedClient>,
    tts: TtsConfig,
    poll_interval: Option<Duration>,
}

impl State {
    /// Creates the panel and issues the initial feed request.
    pub fn new(config: &Config) -> (Self, Task<Message>) {
        let client = match FeedClient::new(&config.feed) {
            Ok(client) => Some(client),
            Err(e) => {
                log::error!("Cannot create feed client: {e}");
                None
            }
        };
        let mut state = Self {
            feed: Vec::new(),
            current: None,
            speaking: false,
            client,
            tts: config.tts.clone(),
            poll_interval: config.feed.poll_interval(),
        };
        let task = state.fetch();
        (state, task)
    }

    #[must_use]
    pub fn feed(&self) -> &[FeedEntry] {
        &self.feed
    }

    /// Rendered feed rows, one per entry in response order.
    #[must_use]
    pub fn feed_lines(&self) -> Vec<String> {
        self.feed.iter().map(FeedEntry::display_line).collect()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The entry the speak button reads.
    #[must_use]
    pub fn current(&self) -> Option<&FeedEntry> {
        self.current.and_then(|index| self.feed.get(index))
    }

    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn subscription(&self) -> Subscription<Message> {
        match self.poll_interval {
            Some(interval) => time::every(interval).map(|_| Message::Refresh),
            None => Subscription::none(),
        }
    }

    fn fetch(&mut self) -> Task<Message> {
        let Some(client) = self.client.clone() else {
            return Task::none();
        };
        Task::perform(async move { client.fetch().await }, Message::FeedLoaded)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FeedLoaded(Ok(entries)) => {
                log::debug!("Feed loaded with {} entries", entries.len());
                self.current = entries.len().checked_sub(1);
                self.feed = entries;
                Task::none()
            }
            Message::FeedLoaded(Err(e)) => {
                log::error!("Error fetching live feed: {e}");
                Task::none()
            }
            Message::Refresh => self.fetch(),
            Message::Select(index) => {
                if index < self.feed.len() {
                    self.current = Some(index);
                }
                Task::none()
            }
            Message::Speak => {
                if self.speaking {
                    return Task::none();
                }
                let Some(entry) = self.current() else {
                    return Task::none();
                };
                let text = prepare_for_speech(&entry.commentary);
                self.speaking = true;
                Task::perform(speak(self.tts.clone(), text), Message::SpeechFinished)
            }
            Message::SpeechFinished(result) => {
                if let Err(e) = result {
                    log::error!("Error with text-to-speech: {e}");
                }
                self.speaking = false;
                Task::none()
            }
        }
    }
}

/// Synthesizes `text` and plays it to the end.
async fn speak(config: TtsConfig, text: String) -> Result<()> {
    let client = TtsClient::from_config(&config)?;
    let audio = client.synthesize(&text).await?;
    speech::play_mpeg(audio).await
}
