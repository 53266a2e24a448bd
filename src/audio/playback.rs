//! Audio playback to speakers
//!
//! One [`PlaybackCoordinator`] owns the process's output device. It is an
//! explicitly constructed resource: create it once at startup and pass it by
//! reference to anything that needs playback.

use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::audio::SampleBuffer;
use crate::audio::codec::SAMPLE_RATE;
use crate::{Error, Result};

/// Grace period after the computed buffer duration before the stream is torn
/// down, covering device startup latency.
const TEARDOWN_PAD: Duration = Duration::from_millis(250);

/// Owns the shared audio output device
pub struct PlaybackCoordinator {
    device: Device,
    config: StreamConfig,
}

impl PlaybackCoordinator {
    /// Open the default output device and negotiate a speech-rate config
    ///
    /// Prefers a mono configuration at the speech sample rate, falling back
    /// to stereo.
    ///
    /// # Errors
    ///
    /// Returns error if no output device is available or none supports the
    /// speech sample rate.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported_config = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .or_else(|| {
                // Fallback: try stereo
                device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2
                        && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                        && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
                })
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            channels = config.channels,
            "playback coordinator initialized"
        );

        Ok(Self { device, config })
    }

    /// Start playing a buffer immediately
    ///
    /// Does not block and does not cancel other playbacks: each call runs an
    /// independent output stream on the shared device. The returned handle's
    /// completion state is a timer approximation, not a device callback.
    /// Playback failures are logged, not reported.
    #[must_use]
    pub fn play(&self, buffer: &SampleBuffer) -> PlaybackHandle {
        let duration = buffer.duration();
        let handle = PlaybackHandle {
            started: Instant::now(),
            duration,
        };

        if buffer.samples().is_empty() {
            return handle;
        }

        // cpal streams are !Send, so the stream lives entirely inside a
        // detached thread that outlives it by the buffer duration.
        let device = self.device.clone();
        let mut config = self.config.clone();
        config.sample_rate = SampleRate(buffer.sample_rate());
        let samples = buffer.samples().to_vec();

        thread::spawn(move || {
            if let Err(e) = play_on_thread(&device, &config, samples, duration) {
                tracing::error!(error = %e, "audio playback failed");
            }
        });

        handle
    }
}

/// Build, run, and tear down one output stream for one buffer
fn play_on_thread(
    device: &Device,
    config: &StreamConfig,
    samples: Vec<f32>,
    duration: Duration,
) -> Result<()> {
    let channels = usize::from(config.channels);
    let total = samples.len();
    let mut position = 0usize;

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let sample = if position < samples.len() {
                        samples[position]
                    } else {
                        0.0
                    };

                    // Mono source: duplicate across device channels
                    for out in frame.iter_mut() {
                        *out = sample;
                    }

                    if position < samples.len() {
                        position += 1;
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio playback error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    thread::sleep(duration + TEARDOWN_PAD);
    drop(stream);

    tracing::debug!(samples = total, "playback complete");
    Ok(())
}

/// Best-effort view of one playback started by [`PlaybackCoordinator::play`]
///
/// Completion is keyed off the buffer duration rather than true device
/// callbacks. Treat it as a UI affordance, never as a correctness signal.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackHandle {
    started: Instant,
    duration: Duration,
}

impl PlaybackHandle {
    /// Whether the playback is still estimated to be audible
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.started.elapsed() < self.duration
    }

    /// Wall-clock length of the buffer being played
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_for_empty_buffer_finishes_immediately() {
        let handle = PlaybackHandle {
            started: Instant::now(),
            duration: Duration::ZERO,
        };
        assert!(!handle.is_playing());
    }

    #[test]
    fn handle_tracks_buffer_duration() {
        let handle = PlaybackHandle {
            started: Instant::now(),
            duration: Duration::from_secs(60),
        };
        assert!(handle.is_playing());
        assert_eq!(handle.duration(), Duration::from_secs(60));
    }
}
