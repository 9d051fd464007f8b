//! Pitch index to frequency conversion.
//!
//! Pitch 0 is C-1 and the table is tuned to A-4 = 440 Hz (pitch 45),
//! equal-tempered. Values must match `440 * 2^((i - 45) / 12)` exactly.

use std::sync::LazyLock;

/// Number of addressable pitches (6-bit register field).
pub const PITCH_COUNT: usize = 64;

/// The pitch index tuned to [`REFERENCE_FREQUENCY`].
pub const REFERENCE_PITCH: u8 = 45;

/// A-4 in Hz.
pub const REFERENCE_FREQUENCY: f64 = 440.0;

const NOTE_NAMES: [&str; 12] = [
    "C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-",
];

static PITCH_TABLE: LazyLock<[f64; PITCH_COUNT]> = LazyLock::new(|| {
    let mut table = [0.0; PITCH_COUNT];
    for (i, freq) in table.iter_mut().enumerate() {
        let semitones = i as f64 - REFERENCE_PITCH as f64;
        *freq = REFERENCE_FREQUENCY * 2f64.powf(semitones / 12.0);
    }
    table
});

/// The precomputed pitch table.
pub fn pitch_table() -> &'static [f64; PITCH_COUNT] {
    &PITCH_TABLE
}

/// Frequency in Hz for a pitch index.
///
/// Panics if `pitch >= PITCH_COUNT`; register decoding masks the field to six
/// bits, so this only fires on a caller bug.
pub fn pitch_to_frequency(pitch: u8) -> f64 {
    PITCH_TABLE[pitch as usize]
}

/// Tracker-style note name, e.g. `"A-4"` for pitch 45.
pub fn pitch_to_name(pitch: u8) -> String {
    let octave = pitch / 12 + 1;
    format!("{}{}", NOTE_NAMES[(pitch % 12) as usize], octave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_pitch_is_a440() {
        assert_eq!(pitch_to_frequency(REFERENCE_PITCH), 440.0);
    }

    #[test]
    fn octave_up_doubles_frequency() {
        for i in 0..(PITCH_COUNT - 12) {
            let base = pitch_table()[i];
            let octave_up = pitch_table()[i + 12];
            assert_relative_eq!(octave_up, base * 2.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn semitone_up_increases_by_twelfth_root_of_two() {
        let ratio = pitch_to_frequency(46) / pitch_to_frequency(45);
        assert_relative_eq!(ratio, 2f64.powf(1.0 / 12.0), max_relative = 1e-12);
    }

    #[test]
    fn table_matches_formula() {
        for (i, &f) in pitch_table().iter().enumerate() {
            assert_eq!(f, 440.0 * 2f64.powf((i as f64 - 45.0) / 12.0));
        }
    }

    #[test]
    fn lowest_pitch_is_c1() {
        assert_relative_eq!(pitch_to_frequency(0), 32.703, epsilon = 1e-3);
    }

    #[test]
    #[should_panic]
    fn out_of_range_pitch_panics() {
        pitch_to_frequency(PITCH_COUNT as u8);
    }

    #[test]
    fn note_names() {
        assert_eq!(pitch_to_name(0), "C-1");
        assert_eq!(pitch_to_name(45), "A-4");
        assert_eq!(pitch_to_name(13), "C#2");
        assert_eq!(pitch_to_name(63), "D#6");
    }
}
