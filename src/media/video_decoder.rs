// SPDX-License-Identifier: MPL-2.0
//! Video decoding loop of a playback session.
//!
//! Runs on a blocking thread: FFmpeg contexts are not `Send`. Decoded frames
//! are converted to RGBA and released when the session clock reaches their
//! presentation time.

use super::clock::PlaybackClock;
use super::session::{DecoderCommand, Frame};
use super::{init_ffmpeg, seconds_per_tick, seek_timestamp};
use crate::error::{Result, VideoError};
use ffmpeg_next::frame;
use ffmpeg_next::software::scaling;
use iced::widget::image;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// Sleep between checks while paused or waiting on the clock.
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Frames this far behind the clock are dropped rather than shown.
const LATE_FRAME_SECS: f64 = 0.25;

/// Never drop more than this many frames in a row.
const MAX_CONSECUTIVE_DROPS: u32 = 8;

/// Frames starting this close before a seek target count as reaching it.
const SEEK_TOLERANCE_SECS: f64 = 0.02;

/// What the video thread reports back to the session.
#[derive(Debug)]
pub(crate) enum VideoEvent {
    Frame(Frame),
    Ended,
}

fn video_error(context: &str, err: impl std::fmt::Display) -> VideoError {
    VideoError::from_message(&format!("{context}: {err}"))
}

struct VideoSource {
    input: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    stream_index: usize,
    tick_secs: f64,
    draining: bool,
}

impl VideoSource {
    fn open(path: &Path) -> Result<Self> {
        init_ffmpeg()?;

        let input =
            ffmpeg_next::format::input(path).map_err(|e| video_error("Failed to open video", e))?;
        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(VideoError::NoVideoStream)?;
        let stream_index = stream.index();
        let tick_secs = seconds_per_tick(stream.time_base());

        let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|e| video_error("Failed to create video decoder", e))?;

        Ok(Self {
            input,
            decoder,
            stream_index,
            tick_secs,
            draining: false,
        })
    }

    fn scaler(&self) -> Result<scaling::Context> {
        let (width, height) = (self.decoder.width(), self.decoder.height());
        scaling::Context::get(
            self.decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            scaling::Flags::BILINEAR,
        )
        .map_err(|e| video_error("Failed to create scaler", e).into())
    }

    fn next_frame(&mut self, frame: &mut frame::Video) -> Result<bool> {
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
                        log::debug!("Skipping undecodable video packet: {e}");
                    }
                }
                None => {
                    self.draining = true;
                    self.decoder
                        .send_eof()
                        .map_err(|e| video_error("Failed to flush video decoder", e))?;
                }
            }
        }
    }

    fn seek(&mut self, target_secs: f64) -> Result<()> {
        let timestamp = seek_timestamp(target_secs);
        self.input
            .seek(timestamp, ..timestamp)
            .map_err(|e| video_error("Video seek failed", e))?;
        self.decoder.flush();
        self.draining = false;
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn pts_secs(&self, frame: &frame::Video) -> f64 {
        frame
            .timestamp()
            .map_or(0.0, |pts| pts as f64 * self.tick_secs)
    }
}

/// Copies RGBA rows out of a frame, dropping the stride padding.
fn extract_rgba(frame: &frame::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let stride = frame.stride(0);
    let data = frame.data(0);

    let mut rgba = Vec::with_capacity(width * height * 4);
    for row in data.chunks(stride).take(height) {
        rgba.extend_from_slice(&row[..(width * 4).min(row.len())]);
    }
    rgba
}

enum Wait {
    Due,
    Late,
    Interrupted,
}

/// Blocks until the clock reaches `pts`, a command arrives, or the frame is late.
fn wait_until(
    clock: &PlaybackClock,
    pts: f64,
    commands: &mpsc::UnboundedReceiver<DecoderCommand>,
) -> Wait {
    loop {
        if !commands.is_empty() {
            return Wait::Interrupted;
        }

        let ahead = pts - clock.position_secs();
        if ahead <= 0.0 {
            return if ahead < -LATE_FRAME_SECS {
                Wait::Late
            } else {
                Wait::Due
            };
        }

        let sleep = if clock.is_running() && clock.rate() > 0.0 {
            Duration::from_secs_f64(ahead / clock.rate()).min(IDLE_POLL)
        } else {
            IDLE_POLL
        };
        std::thread::sleep(sleep);
    }
}

/// Picture loop of a playback session; runs on a blocking thread.
///
/// The first frame (and the first frame after each seek) is sent at once so
/// a paused player still shows a picture. Exits when either channel closes.
pub(crate) fn run_session_video(
    path: &Path,
    clock: &PlaybackClock,
    mut commands: mpsc::UnboundedReceiver<DecoderCommand>,
    events: mpsc::Sender<VideoEvent>,
) -> Result<()> {
    let mut source = VideoSource::open(path)?;
    let mut scaler = source.scaler()?;
    let mut decoded = frame::Video::empty();
    let mut rgba_frame = frame::Video::empty();
    let mut skip_until: Option<f64> = None;
    let mut needs_preview = true;
    let mut ended = false;
    let mut dropped_in_row = 0u32;

    loop {
        loop {
            match commands.try_recv() {
                Ok(DecoderCommand::Seek { target_secs }) => match source.seek(target_secs) {
                    Ok(()) => {
                        skip_until = Some(target_secs);
                        needs_preview = true;
                        ended = false;
                    }
                    Err(e) => log::warn!("{e}"),
                },
                Ok(DecoderCommand::SetRate(_)) => {}
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => return Ok(()),
            }
        }

        if ended || (!clock.is_running() && !needs_preview) {
            std::thread::sleep(IDLE_POLL);
            continue;
        }

        if !source.next_frame(&mut decoded)? {
            ended = true;
            if events.blocking_send(VideoEvent::Ended).is_err() {
                return Ok(());
            }
            continue;
        }

        let pts = source.pts_secs(&decoded);
        if let Some(target) = skip_until {
            if pts + SEEK_TOLERANCE_SECS < target {
                continue;
            }
            skip_until = None;
        }

        if needs_preview {
            needs_preview = false;
        } else {
            match wait_until(clock, pts, &commands) {
                Wait::Due => {}
                Wait::Interrupted => continue,
                Wait::Late if dropped_in_row < MAX_CONSECUTIVE_DROPS => {
                    dropped_in_row += 1;
                    continue;
                }
                Wait::Late => {}
            }
        }
        dropped_in_row = 0;

        scaler
            .run(&decoded, &mut rgba_frame)
            .map_err(|e| video_error("Scaling failed", e))?;

        let frame = Frame {
            handle: image::Handle::from_rgba(
                rgba_frame.width(),
                rgba_frame.height(),
                extract_rgba(&rgba_frame),
            ),
            pts_secs: pts,
        };
        if events.blocking_send(VideoEvent::Frame(frame)).is_err() {
            return Ok(());
        }
    }
}
