//! The seam between the engine and an output device.

use crate::audio_block::AudioBlock;
use crate::error::AudioError;

/// Whether the device is consuming audio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceState {
    /// Not yet started, or paused by the platform. Needs a resume request.
    #[default]
    Suspended,
    Running,
}

/// An output device that plays blocks at absolute times on its own clock.
///
/// Blocks are submitted in non-decreasing start-time order. The device owns
/// the master gain so a volume change never reshapes queued audio.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    fn state(&self) -> DeviceState;

    /// Ask the device to start. A successful request may take effect later;
    /// callers re-check [`state`](AudioOutput::state) on their next pass.
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Device clock in seconds. Monotonic.
    fn current_time(&self) -> f64;

    /// Set the output gain (0.0..=1.0) applied at playback.
    fn set_gain(&mut self, gain: f32);

    /// Queue a block to start playing at `block.start_time()`.
    fn enqueue(&mut self, block: AudioBlock) -> Result<(), AudioError>;
}
