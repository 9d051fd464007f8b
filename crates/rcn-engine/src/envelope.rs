//! Per-sample effect modulation and attack/release shaping.
//!
//! [`sample_note`] is a pure function of the note, its predecessor and the
//! sample time. It returns the phase the note should carry into the next
//! sample rather than mutating it, so callers own the write-back.

use rcn_ir::timing::SAMPLE_RATE;
use rcn_ir::Effect;

use crate::note::Note;
use crate::pitch::pitch_to_frequency;
use crate::waveform;

/// Linear fade-in length at note start, in seconds.
pub const ATTACK_TIME: f64 = 5.0 / 1000.0;

/// Linear fade-out length after note end, in seconds.
pub const RELEASE_TIME: f64 = 5.0 / 1000.0;

const VIBRATO_DEPTH: f64 = 0.04166;

/// One note's contribution to one output sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteSample {
    pub amplitude: f64,
    /// Phase for the next sample.
    pub phase: f64,
}

/// Evaluate `note` at absolute time `t`.
///
/// Outside `[start, end + release]` the note is silent and its phase is
/// left where it was. A zero-length note is always silent.
pub fn sample_note(t: f64, note: &Note, previous: Option<&Note>) -> NoteSample {
    let rel = t - note.start_time;
    let dur = note.duration();
    if dur <= 0.0 || rel < 0.0 || rel > dur + RELEASE_TIME {
        return NoteSample {
            amplitude: 0.0,
            phase: note.phase,
        };
    }

    let frac = rel / dur;
    let (frequency, volume) = modulate(note, previous, frac);
    let gain = shape(volume, rel, dur);
    let amplitude = waveform::sample(note.instrument, note.phase) * gain;

    NoteSample {
        amplitude,
        phase: note.phase + frequency / SAMPLE_RATE as f64,
    }
}

/// Apply the note's effect at `frac` (elapsed fraction of the note).
/// Returns `(frequency, volume)` before envelope shaping.
pub fn modulate(note: &Note, previous: Option<&Note>, frac: f64) -> (f64, f64) {
    let mut frequency = note.frequency();
    let mut volume = note.volume;

    match note.effect {
        Effect::None => {}
        Effect::Slide => {
            if let Some(prev) = previous {
                frequency = frequency * frac + (1.0 - frac) * pitch_to_frequency(prev.pitch);
                volume = frac * note.volume + (1.0 - frac) * prev.volume;
            }
        }
        Effect::Vibrato => {
            frequency *= 1.0 + VIBRATO_DEPTH * (-(frac * std::f64::consts::TAU).cos() / 2.0 + 0.5);
        }
        Effect::Drop => frequency *= 1.0 - frac,
        Effect::Fadein => volume *= frac,
        Effect::Fadeout => volume *= 1.0 - frac,
    }

    (frequency, volume)
}

/// Attack and release ramps. `rel` is time since note start, `dur` the
/// sustain length.
pub fn shape(volume: f64, rel: f64, dur: f64) -> f64 {
    let mut v = volume.max(0.0);
    v *= (rel / ATTACK_TIME).min(1.0);
    v *= (1.0 - (rel - dur) / RELEASE_TIME).min(1.0);
    v.max(0.0)
}
