// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Http(String),
    Tts(TtsError),
    Audio(String),
    Video(VideoError),
}

/// Failures specific to the text-to-speech round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtsError {
    /// The vendor endpoint was selected but no API key is available at runtime.
    MissingApiKey,

    /// The service answered with a non-success HTTP status.
    Status(u16),

    /// The service answered successfully but the body held no audio.
    EmptyAudio,
}

impl fmt::Display for TtsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtsError::MissingApiKey => write!(f, "No TTS API key configured"),
            TtsError::Status(code) => write!(f, "TTS service returned HTTP {}", code),
            TtsError::EmptyAudio => write!(f, "TTS service returned no audio"),
        }
    }
}

/// Specific error types for video playback issues.
/// Used to provide user-friendly, localized error messages.
#[derive(Debug, Clone)]
pub enum VideoError {
    /// Video codec is not supported by the system's FFmpeg
    UnsupportedCodec(String),

    /// File appears corrupted or has invalid data
    CorruptedFile,

    /// File exists but contains no video stream
    NoVideoStream,

    /// Decoding failed during playback
    DecodingFailed(String),

    /// I/O error (file not found, permission denied, etc.)
    IoError(String),

    /// Generic error with raw message
    Other(String),
}

impl VideoError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            VideoError::UnsupportedCodec(_) => "error-video-unsupported-codec",
            VideoError::CorruptedFile => "error-video-corrupted",
            VideoError::NoVideoStream => "error-video-no-stream",
            VideoError::DecodingFailed(_) => "error-video-decoding-failed",
            VideoError::IoError(_) => "error-video-io",
            VideoError::Other(_) => "error-video-general",
        }
    }

    /// Sorts a raw FFmpeg/decoder message into a specific variant.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Codec errors first, they may also say "not found"
        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return VideoError::UnsupportedCodec(codec);
            } else if msg_lower.contains("not found") || msg_lower.contains("unsupported") {
                return VideoError::DecodingFailed(msg.to_string());
            }
        }

        if msg_lower.contains("no such file")
            || (msg_lower.contains("not found") && !msg_lower.contains("decoder"))
            || msg_lower.contains("permission denied")
            || msg_lower.contains("i/o error")
        {
            return VideoError::IoError(msg.to_string());
        }

        if msg_lower.contains("no video stream") || msg_lower.contains("invalid data found") {
            return VideoError::NoVideoStream;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
        {
            return VideoError::CorruptedFile;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("scaling")
            || msg_lower.contains("seek")
            || msg_lower.contains("decode")
        {
            return VideoError::DecodingFailed(msg.to_string());
        }

        VideoError::Other(msg.to_string())
    }

    fn extract_codec_name(msg: &str) -> Option<String> {
        let codecs = ["h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2"];
        codecs
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::UnsupportedCodec(codec) => {
                write!(f, "Unsupported video codec: {}", codec)
            }
            VideoError::CorruptedFile => write!(f, "Video file is corrupted"),
            VideoError::NoVideoStream => write!(f, "No video stream found"),
            VideoError::DecodingFailed(msg) => write!(f, "Decoding failed: {}", msg),
            VideoError::IoError(msg) => write!(f, "I/O error: {}", msg),
            VideoError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Http(e) => write!(f, "HTTP Error: {}", e),
            Error::Tts(e) => write!(f, "TTS Error: {}", e),
            Error::Audio(e) => write!(f, "Audio Error: {}", e),
            Error::Video(e) => write!(f, "Video Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<VideoError> for Error {
    fn from(err: VideoError) -> Self {
        Error::Video(err)
    }
}

impl From<TtsError> for Error {
    fn from(err: TtsError) -> Self {
        Error::Tts(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn tts_status_formats_code() {
        let err: Error = TtsError::Status(401).into();
        assert_eq!(format!("{}", err), "TTS Error: TTS service returned HTTP 401");
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn video_error_from_message_io() {
        let err = VideoError::from_message("No such file or directory");
        assert!(matches!(err, VideoError::IoError(_)));
    }

    #[test]
    fn video_error_from_message_no_stream() {
        let err = VideoError::from_message("No video stream found in file");
        assert!(matches!(err, VideoError::NoVideoStream));
    }

    #[test]
    fn video_error_from_message_codec() {
        let err = VideoError::from_message("Decoder h264 not found");
        assert!(matches!(err, VideoError::UnsupportedCodec(codec) if codec == "H264"));
    }

    #[test]
    fn video_error_from_message_decoding() {
        let err = VideoError::from_message("Packet send failed: error");
        assert!(matches!(err, VideoError::DecodingFailed(_)));
    }

    #[test]
    fn video_error_i18n_keys() {
        assert_eq!(VideoError::CorruptedFile.i18n_key(), "error-video-corrupted");
        assert_eq!(VideoError::NoVideoStream.i18n_key(), "error-video-no-stream");
    }
}
