// SPDX-License-Identifier: MPL-2.0
//! Playback of synthesized speech.
//!
//! The MPEG bytes from the TTS service are written to a temporary file,
//! decoded with FFmpeg into the device layout and played through the default
//! output device. The returned future resolves once the audio has drained.

use crate::error::{Error, Result};
use crate::media::audio_decoder::decode_all;
use crate::media::{AudioOutput, OutputControls};
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Poll period while waiting for the queue to drain.
const DRAIN_POLL: Duration = Duration::from_millis(20);

/// Time left for the device to play its last buffer after the queue empties.
const DEVICE_TAIL: Duration = Duration::from_millis(150);

/// Extra time allowed beyond the decoded length before giving up.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Plays MPEG audio to completion on a blocking thread.
///
/// # Errors
///
/// Returns [`Error::Audio`] when there is no output device or the bytes
/// cannot be decoded, and [`Error::Io`] when the temporary file fails.
pub async fn play_mpeg(audio: Vec<u8>) -> Result<()> {
    tokio::task::spawn_blocking(move || play_blocking(&audio))
        .await
        .map_err(|e| Error::Audio(format!("Speech playback task failed: {e}")))?
}

fn play_blocking(audio: &[u8]) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("pitchside-speech-")
        .suffix(".mp3")
        .tempfile()?;
    file.write_all(audio)?;
    file.flush()?;

    let output = AudioOutput::new(Arc::new(OutputControls::default()))?;
    let samples = decode_all(file.path(), output.config())?;
    if samples.is_empty() {
        return Err(Error::Audio("Speech audio decoded to nothing".to_string()));
    }

    let length = Duration::from_secs_f64(output.config().duration_of(samples.len()));
    log::debug!("Speaking {:.1}s of audio", length.as_secs_f64());
    output.push(&samples);

    let deadline = Instant::now() + length + DRAIN_GRACE;
    while output.queued_samples() > 0 {
        if Instant::now() >= deadline {
            log::warn!("Speech playback did not drain in time, stopping");
            output.clear();
            return Ok(());
        }
        thread::sleep(DRAIN_POLL);
    }
    thread::sleep(DEVICE_TAIL);
    Ok(())
}
