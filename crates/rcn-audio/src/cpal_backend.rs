//! CPAL-based audio output backend.
//!
//! cpal pulls samples from a callback and has no notion of "play this at
//! time t", so blocks go through a ring buffer and the producer side keeps
//! the ring aligned with the device clock: a block that starts later than
//! the end of queued audio is preceded by silence, and the part of a block
//! that is already in the past is skipped.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, Stream, StreamConfig};
use rcn_ir::timing::{seconds_to_samples, SAMPLE_RATE};
use rcn_ir::{AudioBlock, AudioError, AudioOutput, DeviceState};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapProd, HeapRb};
use tracing::{debug, error, info};

/// About half a second of mono audio.
const RING_BUFFER_SIZE: usize = SAMPLE_RATE as usize / 2;

const SILENCE: [f32; 256] = [0.0; 256];

/// State shared with the stream callback.
struct Shared {
    /// Device frames consumed since the stream started; the device clock.
    played_frames: AtomicU64,
    /// Master gain as f32 bits.
    gain: AtomicU32,
}

/// CPAL-based audio output.
pub struct CpalOutput {
    stream: Stream,
    producer: HeapProd<f32>,
    shared: Arc<Shared>,
    /// Samples pushed into the ring since the stream started, silence
    /// included. Producer-side only.
    written_frames: u64,
    state: DeviceState,
}

impl CpalOutput {
    /// Open the default output device at the engine's fixed sample rate.
    ///
    /// The stream is created paused; the engine's first update issues the
    /// resume.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let channels = device
            .supported_output_configs()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?
            .find(|range| {
                range.sample_format() == SampleFormat::F32
                    && range.min_sample_rate().0 <= SAMPLE_RATE
                    && range.max_sample_rate().0 >= SAMPLE_RATE
            })
            .map(|range| range.channels())
            .ok_or_else(|| {
                AudioError::UnsupportedConfig(format!("no f32 output at {} Hz", SAMPLE_RATE))
            })?;

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(SAMPLE_RATE),
            buffer_size: BufferSize::Default,
        };

        let rb = HeapRb::<f32>::new(RING_BUFFER_SIZE);
        let (producer, mut consumer) = rb.split();

        let shared = Arc::new(Shared {
            played_frames: AtomicU64::new(0),
            gain: AtomicU32::new(1.0f32.to_bits()),
        });
        let cb_shared = shared.clone();
        let frame_len = channels as usize;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let gain = f32::from_bits(cb_shared.gain.load(Ordering::Relaxed));
                    // Mono source: the same sample on every output channel
                    for frame in data.chunks_mut(frame_len) {
                        let sample = consumer.try_pop().unwrap_or(0.0) * gain;
                        frame.fill(sample);
                    }
                    cb_shared
                        .played_frames
                        .fetch_add((data.len() / frame_len) as u64, Ordering::Relaxed);
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        // Some hosts start streams on creation
        if let Err(e) = stream.pause() {
            debug!("initial stream pause failed: {}", e);
        }

        info!(channels, sample_rate = SAMPLE_RATE, "audio output opened");

        Ok(Self {
            stream,
            producer,
            shared,
            written_frames: 0,
            state: DeviceState::Suspended,
        })
    }

    /// Device frame at which the next pushed sample will play. Catches the
    /// write counter up after an underrun.
    fn next_write_frame(&mut self) -> u64 {
        let played = self.shared.played_frames.load(Ordering::Relaxed);
        self.written_frames = write_position(self.written_frames, played);
        self.written_frames
    }

    fn push_samples(&mut self, samples: &[f32]) -> usize {
        let pushed = self.producer.push_slice(samples);
        self.written_frames += pushed as u64;
        pushed
    }

    /// Push up to `count` silent samples.
    fn push_silence(&mut self, mut count: u64) {
        while count > 0 {
            let chunk = count.min(SILENCE.len() as u64) as usize;
            let pushed = self.push_samples(&SILENCE[..chunk]);
            if pushed == 0 {
                break;
            }
            count -= pushed as u64;
        }
    }
}

/// How to splice a block into the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WritePlan {
    /// Silent samples before the block.
    pad: u64,
    /// Leading block samples already in the past.
    skip: usize,
}

/// Where the next pushed sample lands on the device timeline.
///
/// Everything written either is still queued or has been played, so the
/// write position is `written` unless the device ran dry and kept counting
/// frames of underrun silence past it.
fn write_position(written: u64, played: u64) -> u64 {
    written.max(played)
}

fn plan_write(start_frame: u64, next_frame: u64, len: usize) -> WritePlan {
    if start_frame >= next_frame {
        WritePlan {
            pad: start_frame - next_frame,
            skip: 0,
        }
    } else {
        let late = next_frame - start_frame;
        WritePlan {
            pad: 0,
            skip: late.min(len as u64) as usize,
        }
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn state(&self) -> DeviceState {
        self.state
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::Playback(e.to_string()))?;
        self.state = DeviceState::Running;
        debug!("audio stream resumed");
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.shared.played_frames.load(Ordering::Relaxed) as f64 / SAMPLE_RATE as f64
    }

    fn set_gain(&mut self, gain: f32) {
        self.shared.gain.store(gain.to_bits(), Ordering::Relaxed);
    }

    fn enqueue(&mut self, block: AudioBlock) -> Result<(), AudioError> {
        let start_frame = seconds_to_samples(block.start_time()).max(0) as u64;
        let next_frame = self.next_write_frame();
        let plan = plan_write(start_frame, next_frame, block.len());

        if plan.skip == block.len() {
            debug!(start = block.start_time(), "block arrived too late, skipped");
            return Ok(());
        }
        if plan.skip > 0 {
            debug!(samples = plan.skip, "trimming late block head");
        }

        self.push_silence(plan.pad);
        let tail = &block.samples()[plan.skip..];
        let pushed = self.push_samples(tail);
        if pushed < tail.len() {
            // Ring full: the device stalled or the driver ran far ahead
            debug!(dropped = tail.len() - pushed, "audio ring overflow");
        }
        Ok(())
    }
}
