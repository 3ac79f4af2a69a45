// SPDX-License-Identifier: MPL-2.0
//! FFmpeg-backed media playback.
//!
//! A playback session runs one blocking decoder thread per stream plus a
//! `cpal` output stream, all paced by a shared [`PlaybackClock`]. The UI talks
//! to a running session through [`MediaHandle`], which implements the
//! [`MediaElement`] trait used by the video player.

pub mod audio_decoder;
pub mod audio_output;
pub mod clock;
pub mod element;
pub mod session;
mod video_decoder;

pub use audio_output::{AudioOutput, AudioOutputConfig, OutputControls};
pub use clock::PlaybackClock;
pub use element::MediaElement;
pub use session::{playback, Frame, MediaEvent, MediaHandle, PlaybackRequest};

use crate::error::VideoError;
use std::path::Path;
use std::sync::OnceLock;

static FFMPEG_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initializes FFmpeg once per process and quiets its logging.
pub fn init_ffmpeg() -> Result<(), VideoError> {
    FFMPEG_INIT
        .get_or_init(|| {
            ffmpeg_next::init().map_err(|e| format!("FFmpeg initialization failed: {e}"))?;
            // SAFETY: av_log_set_level only updates a global log threshold
            unsafe {
                ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
            }
            Ok(())
        })
        .clone()
        .map_err(VideoError::Other)
}

/// Container-level facts read without decoding any frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaInfo {
    pub width: u32,
    pub height: u32,
    /// Seconds; 0.0 when the container does not say.
    pub duration_secs: f64,
    pub has_audio: bool,
}

/// Converts an FFmpeg time base into seconds per tick.
pub(crate) fn seconds_per_tick(time_base: ffmpeg_next::Rational) -> f64 {
    if time_base.denominator() == 0 {
        return 0.0;
    }
    f64::from(time_base.numerator()) / f64::from(time_base.denominator())
}

/// Seconds to the `AV_TIME_BASE` units expected by `Input::seek`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn seek_timestamp(secs: f64) -> i64 {
    (secs.max(0.0) * f64::from(ffmpeg_next::ffi::AV_TIME_BASE)) as i64
}

/// Reads dimensions, duration and audio presence from `path`.
pub fn probe(path: &Path) -> Result<MediaInfo, VideoError> {
    init_ffmpeg()?;

    if !path.exists() {
        return Err(VideoError::IoError(format!(
            "No such file: {}",
            path.display()
        )));
    }

    let ictx = ffmpeg_next::format::input(path)
        .map_err(|e| VideoError::from_message(&e.to_string()))?;

    let stream = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or(VideoError::NoVideoStream)?;

    let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
        .and_then(|context| context.decoder().video())
        .map_err(|e| VideoError::from_message(&format!("video decoder: {e}")))?;

    let (width, height) = (decoder.width(), decoder.height());
    if width == 0 || height == 0 {
        return Err(VideoError::CorruptedFile);
    }

    #[allow(clippy::cast_precision_loss)]
    let duration_secs = if stream.duration() > 0 {
        stream.duration() as f64 * seconds_per_tick(stream.time_base())
    } else if ictx.duration() > 0 {
        ictx.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        0.0
    };

    let has_audio = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Audio)
        .is_some();

    Ok(MediaInfo {
        width,
        height,
        duration_secs,
        has_audio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn time_base_converts_to_seconds() {
        assert_abs_diff_eq!(
            seconds_per_tick(ffmpeg_next::Rational::new(1, 90_000)),
            1.0 / 90_000.0
        );
        assert_eq!(seconds_per_tick(ffmpeg_next::Rational::new(1, 0)), 0.0);
    }

    #[test]
    fn seek_timestamp_uses_microseconds() {
        assert_eq!(seek_timestamp(1.5), 1_500_000);
        assert_eq!(seek_timestamp(-3.0), 0);
    }

    #[test]
    fn probe_reports_missing_file() {
        let result = probe(Path::new("/definitely/not/here.mp4"));
        match result {
            Err(VideoError::IoError(_)) => {}
            // FFmpeg may be unavailable on the test host
            Err(VideoError::Other(_)) => {}
            other => panic!("unexpected probe result: {other:?}"),
        }
    }
}
