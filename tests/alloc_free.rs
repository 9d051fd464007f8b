//! Allocation-free render path tests.
//!
//! The mixer runs once per sample on every update, so it must not touch the
//! heap. These tests render several seconds of every effect on every
//! deterministic instrument with allocation disabled.
//!
//! Just run `cargo test`, no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use rcn_engine::mixer::render_into;
use rcn_engine::ChannelState;
use rcn_ir::timing::{BLOCK_DURATION, BLOCK_SIZE, UPDATE_RATE};
use rcn_ir::{Effect, Instrument, NoteRegister, CHANNEL_COUNT};

fn register(instrument: Instrument, effect: Effect, pitch: u8) -> NoteRegister {
    NoteRegister {
        period: 24,
        instrument: instrument.id(),
        offset: 1,
        pitch,
        volume: 6,
        effect,
    }
}

/// Render `seconds` of audio, retriggering every channel each update,
/// aborting on any heap allocation.
fn assert_render_alloc_free(instruments: [Instrument; CHANNEL_COUNT], effect: Effect, seconds: u32) {
    let mut channels: [ChannelState; CHANNEL_COUNT] = Default::default();
    let mut buf = vec![0.0f32; BLOCK_SIZE];
    let mut cursor = 0.0;

    // The pitch table is built on first use
    rcn_engine::pitch::pitch_table();

    assert_no_alloc(|| {
        for update in 0..seconds * UPDATE_RATE {
            let pitch = (update % 48) as u8 + 8;
            for (ch, inst) in channels.iter_mut().zip(instruments) {
                ch.trigger(&register(inst, effect, pitch), cursor);
            }
            render_into(&mut channels, cursor, &mut buf);
            cursor += BLOCK_DURATION;
        }
    });
}

#[test]
fn plain_notes_alloc_free() {
    use Instrument::*;
    assert_render_alloc_free([Triangle, TiltedSaw, Saw, Square], Effect::None, 2);
    assert_render_alloc_free([Pulse, Organ, Phaser, Sine], Effect::None, 2);
}

#[test]
fn effects_alloc_free() {
    use Instrument::*;
    for effect in [
        Effect::Slide,
        Effect::Vibrato,
        Effect::Drop,
        Effect::Fadein,
        Effect::Fadeout,
    ] {
        assert_render_alloc_free([Sine, Phaser, Organ, Square], effect, 1);
    }
}
