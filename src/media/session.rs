// SPDX-License-Identifier: MPL-2.0
//! Iced subscription running one playback session.
//!
//! The session probes the file, spawns the decoder threads, and turns their
//! output into [`MediaEvent`]s. It first emits [`MediaEvent::Started`] with a
//! [`MediaHandle`] for sending commands back. Dropping the subscription drops
//! the command channels, which stops both decoder threads.

use super::audio_decoder::run_session_audio;
use super::audio_output::OutputControls;
use super::clock::PlaybackClock;
use super::element::MediaElement;
use super::video_decoder::{run_session_video, VideoEvent};
use super::{probe, MediaInfo};
use crate::config::TIME_UPDATE_INTERVAL_MS;
use crate::error::{Error, VideoError};
use iced::futures::{SinkExt, Stream};
use iced::widget::image;
use iced::{stream, Subscription};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Commands forwarded to the decoder threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DecoderCommand {
    Seek { target_secs: f64 },
    SetRate(f64),
}

/// A decoded picture ready to draw.
#[derive(Debug, Clone)]
pub struct Frame {
    pub handle: image::Handle,
    pub pts_secs: f64,
}

/// Notifications from a playback session.
#[derive(Debug, Clone)]
pub enum MediaEvent {
    /// Decoders are running; commands go through the handle.
    Started(MediaHandle),

    /// Duration and picture size are known.
    LoadedMetadata(MediaInfo),

    Frame(Frame),

    /// Position while playing, about every 250 ms.
    TimeUpdate(f64),

    /// Playback reached the end of the stream.
    Ended,

    /// The file could not be opened or decoded.
    Error(VideoError),
}

/// Identifies a session; a new `session_id` restarts playback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaybackRequest {
    pub source: PathBuf,
    pub session_id: u64,
}

/// UI-side handle to a running session.
#[derive(Clone)]
pub struct MediaHandle {
    clock: Arc<PlaybackClock>,
    controls: Arc<OutputControls>,
    duration_bits: Arc<AtomicU64>,
    video_tx: mpsc::UnboundedSender<DecoderCommand>,
    audio_tx: Option<mpsc::UnboundedSender<DecoderCommand>>,
}

impl std::fmt::Debug for MediaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaHandle")
            .field("position", &self.clock.position_secs())
            .field("has_audio", &self.audio_tx.is_some())
            .finish_non_exhaustive()
    }
}

impl MediaHandle {
    fn broadcast(&self, command: DecoderCommand) {
        if self.video_tx.send(command).is_err() {
            log::debug!("Video decoder gone, dropped {command:?}");
        }
        if let Some(audio_tx) = &self.audio_tx {
            if audio_tx.send(command).is_err() {
                log::debug!("Audio decoder gone, dropped {command:?}");
            }
        }
    }
}

impl MediaElement for MediaHandle {
    fn play(&mut self) {
        // Restart from the top once the end was reached
        let duration = self.duration();
        if duration > 0.0 && self.clock.position_secs() >= duration {
            self.set_current_time(0.0);
        }
        self.clock.play();
    }

    fn pause(&mut self) {
        self.clock.pause();
    }

    fn is_paused(&self) -> bool {
        !self.clock.is_running()
    }

    fn current_time(&self) -> f64 {
        self.clock.position_secs()
    }

    fn set_current_time(&mut self, secs: f64) {
        let target = match self.duration() {
            d if d > 0.0 => secs.clamp(0.0, d),
            _ => secs.max(0.0),
        };
        self.clock.seek(target);
        self.broadcast(DecoderCommand::Seek {
            target_secs: target,
        });
    }

    fn duration(&self) -> f64 {
        f64::from_bits(self.duration_bits.load(Ordering::SeqCst))
    }

    fn set_volume(&mut self, volume: f32) {
        self.controls.set_volume(volume);
    }

    fn set_muted(&mut self, muted: bool) {
        self.controls.set_muted(muted);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.clock.set_rate(rate);
        self.broadcast(DecoderCommand::SetRate(rate));
    }
}

/// Subscription playing `request.source` until it is dropped.
pub fn playback(request: PlaybackRequest) -> Subscription<MediaEvent> {
    Subscription::run_with(request, run_session)
}

fn spawn_decoder(name: &'static str, task: impl FnOnce() -> crate::error::Result<()> + Send + 'static) {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = task() {
            log::error!("{name} decoder stopped: {e}");
        }
    });
}

fn run_session(request: &PlaybackRequest) -> impl Stream<Item = MediaEvent> {
    let source = request.source.clone();

    stream::channel(100, move |mut output| async move {
        log::info!("Starting playback session for {}", source.display());

        let probe_path = source.clone();
        let info = match tokio::task::spawn_blocking(move || probe(&probe_path)).await {
            Ok(Ok(info)) => info,
            Ok(Err(e)) => {
                log::error!("Cannot play {}: {e}", source.display());
                let _ = output.send(MediaEvent::Error(e)).await;
                std::future::pending::<()>().await;
                return;
            }
            Err(e) => {
                let _ = output
                    .send(MediaEvent::Error(VideoError::Other(e.to_string())))
                    .await;
                std::future::pending::<()>().await;
                return;
            }
        };
        let _ = output.send(MediaEvent::LoadedMetadata(info)).await;

        let clock = Arc::new(PlaybackClock::new());
        clock.set_end(info.duration_secs);
        let controls = Arc::new(OutputControls::default());

        let (video_tx, video_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::channel(2);
        {
            let path = source.clone();
            let clock = Arc::clone(&clock);
            spawn_decoder("Video", move || {
                run_session_video(&path, &clock, video_rx, event_tx)
            });
        }

        let audio_tx = if info.has_audio {
            let (audio_tx, audio_rx) = mpsc::unbounded_channel();
            let path = source.clone();
            let clock = Arc::clone(&clock);
            let controls = Arc::clone(&controls);
            spawn_decoder("Audio", move || {
                run_session_audio(&path, &clock, controls, audio_rx).map_err(|e| match e {
                    // No device is not fatal: the picture keeps playing
                    Error::Audio(msg) => {
                        log::warn!("Playing without sound: {msg}");
                        Error::Audio(msg)
                    }
                    other => other,
                })
            });
            Some(audio_tx)
        } else {
            None
        };

        let handle = MediaHandle {
            clock: Arc::clone(&clock),
            controls,
            duration_bits: Arc::new(AtomicU64::new(info.duration_secs.to_bits())),
            video_tx,
            audio_tx,
        };
        let _ = output.send(MediaEvent::Started(handle)).await;

        let mut ticker = tokio::time::interval(Duration::from_millis(TIME_UPDATE_INTERVAL_MS));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = event_rx.recv() => match event {
                    Some(VideoEvent::Frame(frame)) => {
                        let _ = output.send(MediaEvent::Frame(frame)).await;
                    }
                    Some(VideoEvent::Ended) => {
                        clock.pause();
                        let _ = output.send(MediaEvent::TimeUpdate(clock.position_secs())).await;
                        let _ = output.send(MediaEvent::Ended).await;
                    }
                    None => {
                        let _ = output
                            .send(MediaEvent::Error(VideoError::DecodingFailed(
                                "video decoder stopped".to_string(),
                            )))
                            .await;
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if clock.is_running() {
                        let _ = output.send(MediaEvent::TimeUpdate(clock.position_secs())).await;
                    }
                }
            }
        }

        log::debug!("Playback session for {} is idle", source.display());
        std::future::pending::<()>().await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn detached_handle(duration: f64, with_audio: bool) -> (
        MediaHandle,
        mpsc::UnboundedReceiver<DecoderCommand>,
        Option<mpsc::UnboundedReceiver<DecoderCommand>>,
    ) {
        let (video_tx, video_rx) = mpsc::unbounded_channel();
        let (audio_tx, audio_rx) = if with_audio {
            let (tx, rx) = mpsc::unbounded_channel();
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };
        let clock = Arc::new(PlaybackClock::new());
        clock.set_end(duration);
        let handle = MediaHandle {
            clock,
            controls: Arc::new(OutputControls::default()),
            duration_bits: Arc::new(AtomicU64::new(duration.to_bits())),
            video_tx,
            audio_tx,
        };
        (handle, video_rx, audio_rx)
    }

    #[test]
    fn seek_is_clamped_and_forwarded_to_both_decoders() {
        let (mut handle, mut video_rx, audio_rx) = detached_handle(60.0, true);
        let mut audio_rx = audio_rx.unwrap();

        handle.set_current_time(75.0);

        assert_abs_diff_eq!(handle.current_time(), 60.0, epsilon = 1e-6);
        assert_eq!(
            video_rx.try_recv().unwrap(),
            DecoderCommand::Seek { target_secs: 60.0 }
        );
        assert_eq!(
            audio_rx.try_recv().unwrap(),
            DecoderCommand::Seek { target_secs: 60.0 }
        );
    }

    #[test]
    fn play_and_pause_drive_the_clock() {
        let (mut handle, _video_rx, _) = detached_handle(60.0, false);
        assert!(handle.is_paused());
        handle.play();
        assert!(!handle.is_paused());
        handle.pause();
        assert!(handle.is_paused());
    }

    #[test]
    fn play_at_end_restarts_from_zero() {
        let (mut handle, mut video_rx, _) = detached_handle(10.0, false);
        handle.set_current_time(10.0);
        let _ = video_rx.try_recv();

        handle.play();

        assert_eq!(
            video_rx.try_recv().unwrap(),
            DecoderCommand::Seek { target_secs: 0.0 }
        );
        handle.pause();
    }

    #[test]
    fn volume_and_mute_reach_output_controls() {
        let (mut handle, _video_rx, _) = detached_handle(10.0, true);
        handle.set_volume(0.3);
        handle.set_muted(true);
        assert!(handle.controls.is_muted());
        assert_abs_diff_eq!(handle.controls.volume(), 0.3, epsilon = 1e-6);
    }

    #[test]
    fn rate_change_reaches_clock_and_decoders() {
        let (mut handle, mut video_rx, _) = detached_handle(10.0, false);
        handle.set_playback_rate(1.5);
        assert_eq!(handle.clock.rate(), 1.5);
        assert_eq!(video_rx.try_recv().unwrap(), DecoderCommand::SetRate(1.5));
    }

    #[test]
    fn handle_survives_stopped_decoders() {
        let (mut handle, video_rx, _) = detached_handle(10.0, false);
        drop(video_rx);
        handle.set_current_time(3.0);
        assert_abs_diff_eq!(handle.current_time(), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn playback_request_identity_tracks_session() {
        let a = PlaybackRequest {
            source: PathBuf::from("a.mp4"),
            session_id: 1,
        };
        let b = PlaybackRequest {
            session_id: 2,
            ..a.clone()
        };
        assert_ne!(a, b);
    }
}
