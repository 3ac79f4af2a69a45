// SPDX-License-Identifier: MPL-2.0
//! Text-to-speech HTTP client.
//!
//! Posts text to `{endpoint}/v1/text-to-speech/{voice_id}` and returns the
//! MPEG audio bytes. The API key is never compiled in: it comes from the
//! environment variable named in `[tts] api_key_env`. When the endpoint is a
//! proxy that injects the key itself, requests go out without one.

use super::feed::USER_AGENT;
use crate::config::TtsConfig;
use crate::error::{Error, Result, TtsError};
use serde::Serialize;

const API_KEY_HEADER: &str = "xi-api-key";

/// Voice parameters sent with each request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

/// JSON body of a synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtsRequest<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: VoiceSettings,
}

#[derive(Debug, Clone)]
pub struct TtsClient {
    http: reqwest::Client,
    url: String,
    model_id: String,
    voice_settings: VoiceSettings,
    api_key: Option<String>,
}

impl TtsClient {
    /// Builds a client from configuration, reading the API key from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`TtsError::MissingApiKey`] when the vendor endpoint is
    /// selected and no key is set, or [`Error::Http`] if the HTTP client
    /// cannot be built.
    pub fn from_config(config: &TtsConfig) -> Result<Self> {
        let api_key = config.api_key();
        if api_key.is_none() && config.targets_vendor() {
            return Err(TtsError::MissingApiKey.into());
        }
        Self::with_key(config, api_key)
    }

    /// Builds a client with an explicit key, bypassing the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be built.
    pub fn with_key(config: &TtsConfig, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            url: format!(
                "{}/v1/text-to-speech/{}",
                config.endpoint.trim_end_matches('/'),
                config.voice_id
            ),
            model_id: config.model_id.clone(),
            voice_settings: VoiceSettings {
                stability: config.stability,
                similarity_boost: config.similarity_boost,
                style: config.style,
                use_speaker_boost: config.use_speaker_boost,
            },
            api_key,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request body for `text`.
    #[must_use]
    pub fn request_for<'a>(&'a self, text: &'a str) -> TtsRequest<'a> {
        TtsRequest {
            text,
            model_id: &self.model_id,
            voice_settings: self.voice_settings,
        }
    }

    /// Synthesizes already prepared `text` into MPEG audio.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] when the request cannot be sent or read
    /// - [`TtsError::Status`] on a non-success status
    /// - [`TtsError::EmptyAudio`] when the body is empty
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let mut request = self
            .http
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&self.request_for(text));
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Tts(TtsError::Status(status.as_u16())));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio.into());
        }
        log::debug!("Received {} bytes of speech audio", audio.len());
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy_config() -> TtsConfig {
        TtsConfig {
            endpoint: "http://localhost:5000/tts-proxy/".to_string(),
            api_key_env: "PITCHSIDE_TEST_TTS_KEY_UNSET".to_string(),
            ..TtsConfig::default()
        }
    }

    #[test]
    fn url_includes_voice_id() {
        let client = TtsClient::with_key(&TtsConfig::default(), Some("k".into())).unwrap();
        assert_eq!(
            client.url(),
            "https://api.elevenlabs.io/v1/text-to-speech/EXAVITQu4vr4xnSDxMaL"
        );
    }

    #[test]
    fn request_body_matches_wire_format() {
        let client = TtsClient::with_key(&TtsConfig::default(), None).unwrap();
        let body = serde_json::to_value(client.request_for("Score 10 (ten)")).unwrap();

        assert_eq!(body["text"], "Score 10 (ten)");
        assert_eq!(body["model_id"], "eleven_monolingual_v1");
        let settings = &body["voice_settings"];
        assert_eq!(settings["use_speaker_boost"], true);
        for (field, expected) in [("stability", 0.5), ("similarity_boost", 0.8), ("style", 0.6)] {
            let value = settings[field].as_f64().unwrap();
            assert!((value - expected).abs() < 1e-6, "{field} = {value}");
        }
    }

    #[test]
    fn vendor_without_key_fails_fast() {
        let config = TtsConfig {
            api_key_env: "PITCHSIDE_TEST_TTS_KEY_UNSET".to_string(),
            ..TtsConfig::default()
        };
        assert!(matches!(
            TtsClient::from_config(&config),
            Err(Error::Tts(TtsError::MissingApiKey))
        ));
    }

    #[test]
    fn proxy_without_key_is_allowed() {
        let client = TtsClient::from_config(&proxy_config()).unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:5000/tts-proxy/v1/text-to-speech/EXAVITQu4vr4xnSDxMaL"
        );
    }
}
