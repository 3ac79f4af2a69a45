// SPDX-License-Identifier: MPL-2.0
//! Audio output through the default `cpal` device.
//!
//! Samples are interleaved f32 at the device rate and channel count (see
//! [`AudioOutputConfig`]). Volume, mute and pause live in [`OutputControls`],
//! which can be shared with other threads while the stream itself stays on
//! the thread that created it.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

/// Sample rate and channel count of the output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioOutputConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioOutputConfig {
    /// Seconds of audio represented by `samples` interleaved samples.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_of(&self, samples: usize) -> f64 {
        let per_second = f64::from(self.sample_rate) * f64::from(self.channels);
        if per_second == 0.0 {
            0.0
        } else {
            samples as f64 / per_second
        }
    }
}

/// Volume, mute and pause flags read by the audio callback.
#[derive(Debug)]
pub struct OutputControls {
    volume_bits: AtomicU32,
    muted: AtomicBool,
    paused: AtomicBool,
}

impl OutputControls {
    #[must_use]
    pub fn new(volume: f32, muted: bool) -> Self {
        Self {
            volume_bits: AtomicU32::new(volume.clamp(0.0, 1.0).to_bits()),
            muted: AtomicBool::new(muted),
            paused: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume_bits
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    /// Gain applied to outgoing samples right now.
    #[must_use]
    pub fn effective_gain(&self) -> f32 {
        if self.is_muted() {
            0.0
        } else {
            self.volume()
        }
    }
}

impl Default for OutputControls {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

type SampleQueue = Arc<Mutex<VecDeque<f32>>>;

/// Copies queued samples into `data`, padding with silence.
///
/// Nothing is consumed while paused.
fn fill_output<T: cpal::SizedSample + cpal::FromSample<f32>>(
    data: &mut [T],
    queue: &Mutex<VecDeque<f32>>,
    controls: &OutputControls,
) {
    let silence = T::from_sample(0.0f32);
    if controls.is_paused() {
        data.fill(silence);
        return;
    }

    let Ok(mut queue) = queue.lock() else {
        data.fill(silence);
        return;
    };

    let gain = controls.effective_gain();
    for sample in data.iter_mut() {
        *sample = match queue.pop_front() {
            // Just under 1.0 so i16 conversion cannot overflow
            Some(value) => T::from_sample((value * gain).clamp(-1.0, 0.999_999_9)),
            None => silence,
        };
    }
}

/// Handle to a running output stream.
///
/// Not `Send` on every platform; keep it on the thread that created it.
pub struct AudioOutput {
    queue: SampleQueue,
    controls: Arc<OutputControls>,
    config: AudioOutputConfig,
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Opens the default output device and starts a stream on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Audio`] when no device is available or the stream
    /// cannot be built or started.
    pub fn new(controls: Arc<OutputControls>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("No audio output device found".to_string()))?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| Error::Audio(format!("Failed to get audio config: {e}")))?;

        let config = AudioOutputConfig {
            sample_rate: supported_config.sample_rate().0,
            channels: supported_config.channels(),
        };

        let queue: SampleQueue = Arc::new(Mutex::new(VecDeque::new()));
        let stream_config: cpal::StreamConfig = supported_config.config();

        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &stream_config, &queue, &controls)?
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &stream_config, &queue, &controls)?
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &stream_config, &queue, &controls)?
            }
            other => {
                return Err(Error::Audio(format!(
                    "Unsupported audio sample format: {other}"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| Error::Audio(format!("Failed to start audio stream: {e}")))?;

        log::debug!(
            "Audio output opened at {} Hz, {} channel(s)",
            config.sample_rate,
            config.channels
        );

        Ok(Self {
            queue,
            controls,
            config,
            _stream: stream,
        })
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        queue: &SampleQueue,
        controls: &Arc<OutputControls>,
    ) -> Result<cpal::Stream> {
        let queue = Arc::clone(queue);
        let controls = Arc::clone(controls);
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    fill_output(data, &queue, &controls);
                },
                |err| log::warn!("Audio output error: {err}"),
                None,
            )
            .map_err(|e| Error::Audio(format!("Failed to build audio stream: {e}")))
    }

    #[must_use]
    pub fn config(&self) -> AudioOutputConfig {
        self.config
    }

    #[must_use]
    pub fn controls(&self) -> &Arc<OutputControls> {
        &self.controls
    }

    /// Appends interleaved samples to the playback queue.
    pub fn push(&self, samples: &[f32]) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.extend(samples.iter().copied());
        }
    }

    /// Drops everything queued but not yet played.
    pub fn clear(&self) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.clear();
        }
    }

    /// Number of interleaved samples waiting to be played.
    #[must_use]
    pub fn queued_samples(&self) -> usize {
        self.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    /// Seconds of audio waiting to be played.
    #[must_use]
    pub fn queued_secs(&self) -> f64 {
        self.config.duration_of(self.queued_samples())
    }
}
