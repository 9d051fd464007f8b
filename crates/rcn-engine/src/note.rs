//! Notes derived from register snapshots.

use rcn_ir::timing::rows_to_seconds;
use rcn_ir::{Effect, Instrument, NoteRegister, INSTRUMENT_COUNT};

use crate::pitch::{pitch_to_frequency, PITCH_COUNT};

/// A triggered note on one channel.
///
/// Everything but `phase` is fixed when the note is derived; `phase` is the
/// running oscillator position, advanced once per audible sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Note {
    /// Absolute start on the playback timeline, in seconds.
    pub start_time: f64,
    /// Absolute end of the sustain (release follows), in seconds.
    pub end_time: f64,
    /// Length code in rows.
    pub period: u8,
    /// Start delay code in rows.
    pub offset: u8,
    pub instrument: Instrument,
    pub pitch: u8,
    /// Normalized volume, [0, 1].
    pub volume: f64,
    pub effect: Effect,
    /// Oscillator phase in cycles, unwrapped.
    pub phase: f64,
}

impl Note {
    /// Derive a note from a triggered register, anchored at `cursor`.
    ///
    /// The phase carries over from `previous` so the oscillator stays
    /// continuous across the note boundary.
    ///
    /// Panics if the register names an instrument outside the bank.
    pub fn derive(register: &NoteRegister, cursor: f64, previous: Option<&Note>) -> Self {
        let Some(instrument) = Instrument::from_id(register.instrument) else {
            panic!(
                "instrument index {} out of range (bank has {})",
                register.instrument, INSTRUMENT_COUNT
            );
        };
        assert!(
            (register.pitch as usize) < PITCH_COUNT,
            "pitch index {} out of range",
            register.pitch
        );

        let start_time = cursor + rows_to_seconds(register.offset);
        let end_time = start_time + rows_to_seconds(register.period);
        Self {
            start_time,
            end_time,
            period: register.period,
            offset: register.offset,
            instrument,
            pitch: register.pitch,
            volume: register.volume_level(),
            effect: register.effect,
            phase: previous.map_or(0.0, |p| p.phase),
        }
    }

    /// Sustain length in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Base frequency before effects.
    pub fn frequency(&self) -> f64 {
        pitch_to_frequency(self.pitch)
    }
}
