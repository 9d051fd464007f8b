//! Mono f32 audio block anchored at an absolute start time.

use crate::timing::{BLOCK_SIZE, SAMPLE_RATE};

/// One update's worth of synthesized audio.
///
/// `samples[i]` plays at `start_time + i / SAMPLE_RATE` seconds of device
/// time. Blocks are handed to the output by value and never touched again.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBlock {
    start_time: f64,
    samples: Vec<f32>,
}

impl AudioBlock {
    /// Create a silent block of [`BLOCK_SIZE`] samples.
    pub fn new(start_time: f64) -> Self {
        Self::with_len(start_time, BLOCK_SIZE)
    }

    /// Create a silent block of `len` samples.
    pub fn with_len(start_time: f64, len: usize) -> Self {
        Self {
            start_time,
            samples: vec![0.0; len],
        }
    }

    /// Wrap existing samples.
    pub fn from_samples(start_time: f64, samples: Vec<f32>) -> Self {
        Self { start_time, samples }
    }

    /// Device time of the first sample, in seconds.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Device time just past the last sample.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Fill all samples with zero.
    pub fn silence(&mut self) {
        self.samples.fill(0.0);
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    /// Index of the first non-zero sample.
    pub fn first_audible(&self) -> Option<usize> {
        self.samples.iter().position(|&s| s != 0.0)
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_silent_and_block_sized() {
        let block = AudioBlock::new(1.5);
        assert_eq!(block.len(), BLOCK_SIZE);
        assert_eq!(block.start_time(), 1.5);
        assert!(block.samples().iter().all(|&s| s == 0.0));
        assert_eq!(block.first_audible(), None);
    }

    #[test]
    fn end_time_adds_duration() {
        let block = AudioBlock::with_len(2.0, SAMPLE_RATE as usize / 2);
        assert!((block.end_time() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn peak_and_first_audible() {
        let mut block = AudioBlock::with_len(0.0, 4);
        block.samples_mut()[2] = -0.75;
        block.samples_mut()[3] = 0.5;
        assert_eq!(block.peak(), 0.75);
        assert_eq!(block.first_audible(), Some(2));
        block.silence();
        assert_eq!(block.peak(), 0.0);
    }
}
