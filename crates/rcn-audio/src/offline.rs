//! In-memory output device with a manually driven clock.
//!
//! Records every block it is handed. Used for offline rendering and as the
//! device in tests.

use rcn_ir::timing::{seconds_to_samples, SAMPLE_RATE};
use rcn_ir::{AudioBlock, AudioError, AudioOutput, DeviceState};

/// Output that stores queued blocks instead of playing them.
#[derive(Clone, Debug)]
pub struct OfflineOutput {
    clock: f64,
    state: DeviceState,
    resumable: bool,
    resume_requests: usize,
    gain: f32,
    blocks: Vec<AudioBlock>,
}

impl OfflineOutput {
    /// A suspended device that starts on the first resume request, like a
    /// browser audio context after a user gesture.
    pub fn new() -> Self {
        Self {
            clock: 0.0,
            state: DeviceState::Suspended,
            resumable: true,
            resume_requests: 0,
            gain: 1.0,
            blocks: Vec::new(),
        }
    }

    /// A device that is already running.
    pub fn running() -> Self {
        Self {
            state: DeviceState::Running,
            ..Self::new()
        }
    }

    /// Whether resume requests succeed. A non-resumable device stays
    /// suspended no matter how often it is asked.
    pub fn set_resumable(&mut self, resumable: bool) {
        self.resumable = resumable;
    }

    /// Force the device state, e.g. to simulate the platform pausing audio.
    pub fn set_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    pub fn set_time(&mut self, seconds: f64) {
        self.clock = seconds;
    }

    pub fn advance(&mut self, seconds: f64) {
        self.clock += seconds;
    }

    pub fn resume_requests(&self) -> usize {
        self.resume_requests
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn blocks(&self) -> &[AudioBlock] {
        &self.blocks
    }

    pub fn take_blocks(&mut self) -> Vec<AudioBlock> {
        std::mem::take(&mut self.blocks)
    }

    /// Flatten the recorded blocks onto one timeline starting at time 0,
    /// with the current gain applied.
    ///
    /// Overlapping spans are summed; gaps are silent. The timeline ends at
    /// the last block's end.
    pub fn mixdown(&self) -> Vec<f32> {
        let end = self
            .blocks
            .iter()
            .map(|b| seconds_to_samples(b.start_time()) + b.len() as i64)
            .max()
            .unwrap_or(0)
            .max(0) as usize;

        let mut out = vec![0.0f32; end];
        for block in &self.blocks {
            let start = seconds_to_samples(block.start_time());
            for (i, &s) in block.samples().iter().enumerate() {
                let pos = start + i as i64;
                if pos >= 0 {
                    out[pos as usize] += s * self.gain;
                }
            }
        }
        out
    }
}

impl Default for OfflineOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for OfflineOutput {
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn state(&self) -> DeviceState {
        self.state
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.resume_requests += 1;
        if self.resumable {
            self.state = DeviceState::Running;
            Ok(())
        } else {
            Err(AudioError::Playback("device refused to resume".into()))
        }
    }

    fn current_time(&self) -> f64 {
        self.clock
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn enqueue(&mut self, block: AudioBlock) -> Result<(), AudioError> {
        self.blocks.push(block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn new_is_suspended_until_resumed() {
        let mut out = OfflineOutput::new();
        assert_eq!(out.state(), DeviceState::Suspended);
        out.resume().unwrap();
        assert_eq!(out.state(), DeviceState::Running);
        assert_eq!(out.resume_requests(), 1);
    }

    #[test]
    fn non_resumable_stays_suspended() {
        let mut out = OfflineOutput::new();
        out.set_resumable(false);
        assert!(out.resume().is_err());
        assert!(out.resume().is_err());
        assert_eq!(out.state(), DeviceState::Suspended);
        assert_eq!(out.resume_requests(), 2);
    }

    #[test]
    fn clock_is_manual() {
        let mut out = OfflineOutput::running();
        assert_eq!(out.current_time(), 0.0);
        out.advance(0.25);
        out.advance(0.25);
        assert_abs_diff_eq!(out.current_time(), 0.5);
        out.set_time(2.0);
        assert_eq!(out.current_time(), 2.0);
    }

    #[test]
    fn mixdown_positions_blocks_by_start_time() {
        let mut out = OfflineOutput::running();
        out.enqueue(AudioBlock::from_samples(0.0, vec![1.0, 1.0])).unwrap();
        out.enqueue(AudioBlock::from_samples(4.0 / SAMPLE_RATE as f64, vec![0.5]))
            .unwrap();
        assert_eq!(out.mixdown(), vec![1.0, 1.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn mixdown_sums_overlap_and_applies_gain() {
        let mut out = OfflineOutput::running();
        out.enqueue(AudioBlock::from_samples(0.0, vec![0.5, 0.5, 0.5])).unwrap();
        out.enqueue(AudioBlock::from_samples(1.0 / SAMPLE_RATE as f64, vec![0.25, 0.25]))
            .unwrap();
        out.set_gain(0.5);
        assert_eq!(out.mixdown(), vec![0.25, 0.375, 0.375]);
    }

    #[test]
    fn take_blocks_drains() {
        let mut out = OfflineOutput::running();
        out.enqueue(AudioBlock::new(0.0)).unwrap();
        assert_eq!(out.take_blocks().len(), 1);
        assert!(out.blocks().is_empty());
    }
}
