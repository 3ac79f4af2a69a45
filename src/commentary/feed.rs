// SPDX-License-Identifier: MPL-2.0
//! Live commentary feed client.
//!
//! The backend answers `GET {api_base_url}/live_feed` with a JSON array of
//! `{ "timestamp": ..., "commentary": ... }` objects. Entries are kept
//! exactly as received, in response order.

use crate::config::FeedConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// User agent sent with every backend request.
pub const USER_AGENT: &str = concat!("Pitchside/", env!("CARGO_PKG_VERSION"));

/// One timestamped commentary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub timestamp: String,
    pub commentary: String,
}

impl FeedEntry {
    /// Row text as shown in the feed list.
    ///
    /// ```
    /// use pitchside::commentary::FeedEntry;
    ///
    /// let entry = FeedEntry {
    ///     timestamp: "12:00:01".into(),
    ///     commentary: "Score 10 to 5".into(),
    /// };
    /// assert_eq!(entry.display_line(), "12:00:01: Score 10 to 5");
    /// ```
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.timestamp, self.commentary)
    }
}

/// Parses a feed response body.
///
/// # Errors
///
/// Returns [`Error::Http`] when the body is not a JSON array of entries.
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedEntry>> {
    serde_json::from_slice(body).map_err(|e| Error::Http(format!("Invalid feed payload: {e}")))
}

/// HTTP client for the feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Builds a client for the endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the TLS backend cannot be initialized.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            url: config.live_feed_url(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the whole feed once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on connection failures, non-success statuses
    /// and malformed bodies.
    pub async fn fetch(&self) -> Result<Vec<FeedEntry>> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("Feed request returned HTTP {status}")));
        }

        let body = response.bytes().await?;
        parse_feed(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_response_order() {
        let body = br#"[
            {"timestamp": "12:00:01", "commentary": "Kick-off"},
            {"timestamp": "12:00:09", "commentary": "Score 10 to 5"},
            {"timestamp": "12:00:15", "commentary": "Snitch spotted"}
        ]"#;
        let entries = parse_feed(body).unwrap();
        let lines: Vec<_> = entries.iter().map(FeedEntry::display_line).collect();
        assert_eq!(
            lines,
            vec![
                "12:00:01: Kick-off",
                "12:00:09: Score 10 to 5",
                "12:00:15: Snitch spotted",
            ]
        );
    }

    #[test]
    fn parse_accepts_empty_feed() {
        assert!(parse_feed(b"[]").unwrap().is_empty());
    }

    #[test]
    fn parse_ignores_extra_fields() {
        let entries =
            parse_feed(br#"[{"timestamp":"1","commentary":"a","team":"red"}]"#).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn parse_rejects_non_array() {
        assert!(matches!(
            parse_feed(br#"{"timestamp":"1"}"#),
            Err(Error::Http(_))
        ));
    }

    #[test]
    fn client_targets_live_feed_path() {
        let config = FeedConfig {
            api_base_url: "http://example.test:5000/".to_string(),
            ..FeedConfig::default()
        };
        let client = FeedClient::new(&config).unwrap();
        assert_eq!(client.url(), "http://example.test:5000/live_feed");
    }
}
