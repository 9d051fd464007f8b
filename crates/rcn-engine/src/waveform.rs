//! The instrument waveform bank.
//!
//! Each instrument maps an oscillator phase to an amplitude. `phase` is the
//! position within the current cycle in [0, 1); `raw_phase` is the unwrapped
//! running phase, which the phaser uses for its slow sweep. Formulas are
//! kept exactly as the console defines them so songs sound the same
//! everywhere.

use std::f64::consts::TAU;

use rcn_ir::Instrument;

const TILT: f64 = 0.9;
const PULSE_WIDTH: f64 = 0.33333333;
const PHASER_SWEEP_CYCLES: f64 = 128.0;

/// Amplitude of `instrument` at `phase` (wrapped) / `raw_phase` (unwrapped).
///
/// All shapes stay within [-1, 1] except the phaser, whose difference of two
/// triangles dips to -1.6 at the extreme of its sweep.
pub fn waveform(instrument: Instrument, phase: f64, raw_phase: f64) -> f64 {
    let t = phase;
    match instrument {
        Instrument::Triangle => (4.0 * t - 2.0).abs() - 1.0,
        Instrument::TiltedSaw => {
            let ramp = if t < TILT {
                2.0 * t / TILT - 1.0
            } else {
                2.0 * (1.0 - t) / (1.0 - TILT) - 1.0
            };
            ramp * 0.406
        }
        Instrument::Saw => 0.653 * if t < 0.5 { t } else { t - 1.0 },
        Instrument::Square => {
            if t < 0.5 {
                0.25
            } else {
                -0.25
            }
        }
        Instrument::Pulse => {
            if t < PULSE_WIDTH {
                0.25
            } else {
                -0.25
            }
        }
        Instrument::Organ => {
            let shape = if t < 0.5 {
                3.0 - (24.0 * t - 6.0).abs()
            } else {
                1.0 - (16.0 * t - 12.0).abs()
            };
            shape * 0.111111111
        }
        Instrument::Noise => rand::random::<f64>() * 2.0 - 1.0,
        Instrument::Phaser => {
            let k = (2.0 * (raw_phase / PHASER_SWEEP_CYCLES).rem_euclid(1.0) - 1.0).abs();
            let u = (t + 0.5 * k).rem_euclid(1.0);
            ((4.0 * u - 2.0).abs() - (8.0 * t - 4.0).abs()) * 0.4
        }
        Instrument::Sine => (t * TAU).sin(),
    }
}

/// Evaluate `instrument` at an unwrapped running phase.
pub fn sample(instrument: Instrument, raw_phase: f64) -> f64 {
    waveform(instrument, raw_phase.rem_euclid(1.0), raw_phase)
}
