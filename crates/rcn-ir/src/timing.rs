//! Fixed timing constants shared by the engine and its output devices.
//!
//! The sound engine runs at one sample rate and one update cadence; none of
//! these are negotiated with the device.

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Nominal driver cadence in Hz. One block is rendered per update.
pub const UPDATE_RATE: u32 = 30;

/// Samples per rendered block (one update interval of audio).
pub const BLOCK_SIZE: usize = (SAMPLE_RATE / UPDATE_RATE) as usize;

/// Duration of one block in seconds.
pub const BLOCK_DURATION: f64 = BLOCK_SIZE as f64 / SAMPLE_RATE as f64;

/// Seconds between nominal updates.
pub const UPDATE_INTERVAL: f64 = 1.0 / UPDATE_RATE as f64;

/// Minimum distance between device time and the start of the next block.
pub const LATENCY: f64 = 1.0 / 30.0;

/// Update gap after which the host is treated as suspended.
pub const STARVATION_THRESHOLD: f64 = 2.0 * UPDATE_INTERVAL;

/// Register time unit: period and offset codes count in rows of 1/120 s.
pub const ROWS_PER_SECOND: f64 = 120.0;

/// Convert a row count to seconds.
pub fn rows_to_seconds(rows: u8) -> f64 {
    rows as f64 / ROWS_PER_SECOND
}

/// Convert an absolute time in seconds to a sample index, rounding to nearest.
pub fn seconds_to_samples(seconds: f64) -> i64 {
    (seconds * SAMPLE_RATE as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_one_update_interval() {
        assert_eq!(BLOCK_SIZE, 1470);
        assert!((BLOCK_DURATION - UPDATE_INTERVAL).abs() < 1e-12);
    }

    #[test]
    fn rows_convert_at_120_per_second() {
        assert_eq!(rows_to_seconds(0), 0.0);
        assert!((rows_to_seconds(12) - 0.1).abs() < 1e-12);
        assert!((rows_to_seconds(120) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn seconds_to_samples_rounds() {
        assert_eq!(seconds_to_samples(1.0), 44_100);
        assert_eq!(seconds_to_samples(BLOCK_DURATION), BLOCK_SIZE as i64);
        assert_eq!(seconds_to_samples(0.5 / SAMPLE_RATE as f64 + 1e-9), 1);
    }
}
