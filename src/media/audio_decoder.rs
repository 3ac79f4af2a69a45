// SPDX-License-Identifier: MPL-2.0
//! Audio decoding with FFmpeg, resampled for the output device.
//!
//! Two entry points share the same demux/decode/resample path:
//! [`decode_all`] turns a short clip into one sample buffer, and
//! [`run_session_audio`] streams a video's soundtrack into an
//! [`AudioOutput`] paced by the session clock.

use super::audio_output::{AudioOutput, AudioOutputConfig, OutputControls};
use super::clock::PlaybackClock;
use super::session::DecoderCommand;
use super::{init_ffmpeg, seconds_per_tick, seek_timestamp};
use crate::error::{Error, Result};
use ffmpeg_next::software::resampling;
use ffmpeg_next::{frame, ChannelLayout};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How far ahead of the speaker the decoder may queue audio.
const AUDIO_LOOKAHEAD_SECS: f64 = 0.12;

/// Sleep between checks while paused, exhausted or ahead.
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Extra output room for samples the converter holds back between calls.
const RESAMPLER_SLACK: usize = 256;

const OUTPUT_FORMAT: ffmpeg_next::format::Sample =
    ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed);

fn audio_error(context: &str, err: impl std::fmt::Display) -> Error {
    Error::Audio(format!("{context}: {err}"))
}

/// Output sample rate that makes device-rate playback run at `speed`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resample_rate_for_speed(device_rate: u32, speed: f64) -> u32 {
    if speed <= 0.0 || !speed.is_finite() {
        return device_rate;
    }
    (f64::from(device_rate) / speed).round().max(1.0) as u32
}

/// Widens stereo samples to `channels`, leaving the extra channels silent.
#[must_use]
pub fn spread_stereo(stereo: &[f32], channels: u16) -> Vec<f32> {
    let channels = usize::from(channels);
    if channels <= 2 {
        return stereo.to_vec();
    }
    let mut out = Vec::with_capacity(stereo.len() / 2 * channels);
    for pair in stereo.chunks_exact(2) {
        out.extend_from_slice(pair);
        out.extend(std::iter::repeat(0.0).take(channels - 2));
    }
    out
}

/// Demuxer plus decoder for the best audio stream of a file.
struct AudioSource {
    input: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Audio,
    stream_index: usize,
    tick_secs: f64,
    draining: bool,
}

impl AudioSource {
    fn open(path: &Path) -> Result<Self> {
        init_ffmpeg()?;

        let input =
            ffmpeg_next::format::input(path).map_err(|e| audio_error("Failed to open media", e))?;
        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or_else(|| Error::Audio("No audio stream found".to_string()))?;
        let stream_index = stream.index();
        let tick_secs = seconds_per_tick(stream.time_base());

        let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().audio())
            .map_err(|e| audio_error("Failed to create audio decoder", e))?;

        Ok(Self {
            input,
            decoder,
            stream_index,
            tick_secs,
            draining: false,
        })
    }

    /// Converter to packed f32 at the device layout, sped up by `speed`.
    fn resampler(&self, config: AudioOutputConfig, speed: f64) -> Result<Resampler> {
        let out_rate = resample_rate_for_speed(config.sample_rate, speed);
        let context = resampling::Context::get(
            self.decoder.format(),
            self.decoder.channel_layout(),
            self.decoder.rate(),
            OUTPUT_FORMAT,
            output_layout(config.channels),
            out_rate,
        )
        .map_err(|e| audio_error("Failed to create resampler", e))?;

        Ok(Resampler {
            context,
            channels: config.channels,
            out_rate,
        })
    }

    /// Decodes the next frame; `Ok(false)` once the stream is fully drained.
    fn next_frame(&mut self, frame: &mut frame::Audio) -> Result<bool> {
        loop {
            if self.decoder.receive_frame(frame).is_ok() {
                return Ok(true);
            }
            if self.draining {
                return Ok(false);
            }

            let stream_index = self.stream_index;
            let packet = self
                .input
                .packets()
                .find(|(stream, _)| stream.index() == stream_index)
                .map(|(_, packet)| packet);

            match packet {
                Some(packet) => {
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        log::debug!("Skipping undecodable audio packet: {e}");
                    }
                }
                None => {
                    self.draining = true;
                    self.decoder
                        .send_eof()
                        .map_err(|e| audio_error("Failed to flush audio decoder", e))?;
                }
            }
        }
    }

    fn seek(&mut self, target_secs: f64) -> Result<()> {
        let timestamp = seek_timestamp(target_secs);
        self.input
            .seek(timestamp, ..timestamp)
            .map_err(|e| audio_error("Audio seek failed", e))?;
        self.decoder.flush();
        self.draining = false;
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn frame_span(&self, frame: &frame::Audio) -> (f64, f64) {
        let start = frame
            .timestamp()
            .map_or(0.0, |pts| pts as f64 * self.tick_secs);
        let length = if frame.rate() == 0 {
            0.0
        } else {
            frame.samples() as f64 / f64::from(frame.rate())
        };
        (start, start + length)
    }
}

fn output_layout(channels: u16) -> ChannelLayout {
    if channels == 1 {
        ChannelLayout::MONO
    } else {
        ChannelLayout::STEREO
    }
}

/// Output frame capacity for converting `in_samples` between the two rates.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn output_capacity(in_samples: usize, in_rate: u32, out_rate: u32) -> usize {
    if in_rate == 0 {
        return in_samples + RESAMPLER_SLACK;
    }
    let scaled = (in_samples as u64 * u64::from(out_rate)).div_ceil(u64::from(in_rate));
    scaled as usize + RESAMPLER_SLACK
}

/// Resampling context plus the output shape it was built for.
struct Resampler {
    context: resampling::Context,
    channels: u16,
    out_rate: u32,
}

impl Resampler {
    /// Converts `frame` and returns device-layout samples.
    fn run(&mut self, frame: &frame::Audio) -> Result<Vec<f32>> {
        let capacity = output_capacity(frame.samples(), frame.rate(), self.out_rate);
        let mut converted = frame::Audio::new(OUTPUT_FORMAT, capacity, output_layout(self.channels));
        self.context
            .run(frame, &mut converted)
            .map_err(|e| audio_error("Resampling failed", e))?;
        Ok(packed_samples(&converted, self.channels))
    }

    /// Samples still buffered inside the converter.
    fn drain(&mut self) -> Vec<f32> {
        let mut tail = frame::Audio::new(
            OUTPUT_FORMAT,
            RESAMPLER_SLACK * 4,
            output_layout(self.channels),
        );
        match self.context.flush(&mut tail) {
            Ok(_) => packed_samples(&tail, self.channels),
            Err(_) => Vec::new(),
        }
    }
}

/// Reads interleaved f32 samples out of a packed frame.
fn packed_samples(frame: &frame::Audio, channels: u16) -> Vec<f32> {
    let produced_channels = if channels == 1 { 1 } else { 2 };
    let count = frame.samples() * produced_channels;
    let samples: Vec<f32> = frame
        .data(0)
        .chunks_exact(4)
        .take(count)
        .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect();
    spread_stereo(&samples, channels)
}

/// Decodes a whole audio file into one buffer laid out for `config`.
///
/// # Errors
///
/// Returns [`Error::Audio`] when the file has no decodable audio stream.
pub fn decode_all(path: &Path, config: AudioOutputConfig) -> Result<Vec<f32>> {
    let mut source = AudioSource::open(path)?;
    let mut resampler = source.resampler(config, 1.0)?;
    let mut decoded = frame::Audio::empty();
    let mut samples = Vec::new();

    while source.next_frame(&mut decoded)? {
        samples.extend(resampler.run(&decoded)?);
    }
    samples.extend(resampler.drain());

    Ok(samples)
}

/// Soundtrack loop of a playback session; runs on a blocking thread.
///
/// Exits when the command channel closes.
pub(crate) fn run_session_audio(
    path: &Path,
    clock: &PlaybackClock,
    controls: Arc<OutputControls>,
    mut commands: mpsc::UnboundedReceiver<DecoderCommand>,
) -> Result<()> {
    let output = AudioOutput::new(Arc::clone(&controls))?;
    let config = output.config();
    let mut source = AudioSource::open(path)?;
    let mut resampler = source.resampler(config, clock.rate())?;
    let mut decoded = frame::Audio::empty();
    let mut skip_until: Option<f64> = None;
    let mut exhausted = false;

    loop {
        loop {
            match commands.try_recv() {
                Ok(DecoderCommand::Seek { target_secs }) => {
                    output.clear();
                    match source.seek(target_secs) {
                        Ok(()) => {
                            skip_until = Some(target_secs);
                            exhausted = false;
                        }
                        Err(e) => log::warn!("{e}"),
                    }
                }
                Ok(DecoderCommand::SetRate(speed)) => {
                    output.clear();
                    resampler = source.resampler(config, speed)?;
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => return Ok(()),
            }
        }

        let running = clock.is_running();
        controls.set_paused(!running);
        if !running || exhausted || output.queued_secs() > AUDIO_LOOKAHEAD_SECS {
            std::thread::sleep(IDLE_POLL);
            continue;
        }

        if !source.next_frame(&mut decoded)? {
            log::debug!("Audio stream exhausted");
            exhausted = true;
            continue;
        }

        if let Some(target) = skip_until {
            let (_, end) = source.frame_span(&decoded);
            if end < target {
                continue;
            }
            skip_until = None;
        }

        output.push(&resampler.run(&decoded)?);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_scales_resample_rate() {
        assert_eq!(resample_rate_for_speed(48_000, 1.0), 48_000);
        assert_eq!(resample_rate_for_speed(48_000, 2.0), 24_000);
        assert_eq!(resample_rate_for_speed(48_000, 0.5), 96_000);
        assert_eq!(resample_rate_for_speed(44_100, 0.75), 58_800);
    }

    #[test]
    fn invalid_speed_keeps_device_rate() {
        assert_eq!(resample_rate_for_speed(48_000, 0.0), 48_000);
        assert_eq!(resample_rate_for_speed(48_000, f64::NAN), 48_000);
    }

    #[test]
    fn output_capacity_covers_upsampling() {
        assert_eq!(output_capacity(1024, 44_100, 48_000), 1115 + RESAMPLER_SLACK);
        assert_eq!(output_capacity(1024, 48_000, 24_000), 512 + RESAMPLER_SLACK);
        assert_eq!(output_capacity(10, 0, 48_000), 10 + RESAMPLER_SLACK);
    }

    #[test]
    fn stereo_is_spread_to_surround() {
        let out = spread_stereo(&[0.1, 0.2, 0.3, 0.4], 4);
        assert_eq!(out, vec![0.1, 0.2, 0.0, 0.0, 0.3, 0.4, 0.0, 0.0]);
    }

    #[test]
    fn stereo_and_mono_pass_through() {
        assert_eq!(spread_stereo(&[0.5, -0.5], 2), vec![0.5, -0.5]);
        assert_eq!(spread_stereo(&[0.5], 1), vec![0.5]);
    }

    #[test]
    fn decode_all_rejects_missing_file() {
        let config = AudioOutputConfig {
            sample_rate: 48_000,
            channels: 2,
        };
        assert!(decode_all(Path::new("/no/such/clip.mp3"), config).is_err());
    }
}
