//! Register sequences: one register file per driver update.
//!
//! The text form has one frame per line, sixteen hex bytes (four per
//! channel). A blank line is a frame with every channel untriggered, and
//! `#` starts a comment.
//!
//! ```text
//! # ch0         ch1         ch2         ch3
//! 8c 00 2d 07   00 00 00 00 00 00 00 00 00 00 00 00
//!
//! 8c 08 30 17   00 00 00 00 00 00 00 00 00 00 00 00
//! ```

use rcn_ir::{
    channel_registers, write_channel, Effect, Instrument, NoteRegister, RegisterFile,
    CHANNEL_COUNT, INSTRUMENT_COUNT, REGISTER_FILE_SIZE,
};

use crate::error::ControllerError;

/// Parse the text form.
pub fn parse_sequence(text: &str) -> Result<Vec<RegisterFile>, ControllerError> {
    let mut frames = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            // Comment-only lines are not frames
            if raw.trim().is_empty() {
                frames.push([0u8; REGISTER_FILE_SIZE]);
            }
            continue;
        }

        let mut frame = [0u8; REGISTER_FILE_SIZE];
        let mut count = 0;
        for token in content.split_whitespace() {
            if count == REGISTER_FILE_SIZE {
                return Err(ControllerError::Sequence {
                    line,
                    message: format!("more than {REGISTER_FILE_SIZE} bytes"),
                });
            }
            frame[count] = u8::from_str_radix(token, 16).map_err(|e| ControllerError::Sequence {
                line,
                message: format!("bad byte {token:?}: {e}"),
            })?;
            count += 1;
        }
        if count != REGISTER_FILE_SIZE {
            return Err(ControllerError::Sequence {
                line,
                message: format!("expected {REGISTER_FILE_SIZE} bytes, found {count}"),
            });
        }
        check_instruments(&frame, line)?;
        frames.push(frame);
    }
    Ok(frames)
}

/// Triggered channels must name an instrument in the bank.
fn check_instruments(frame: &RegisterFile, line: usize) -> Result<(), ControllerError> {
    for ch in 0..CHANNEL_COUNT {
        if let Some(reg) = NoteRegister::decode(channel_registers(frame, ch)) {
            if reg.instrument as usize >= INSTRUMENT_COUNT {
                return Err(ControllerError::Sequence {
                    line,
                    message: format!(
                        "channel {ch}: instrument {} out of range (bank has {INSTRUMENT_COUNT})",
                        reg.instrument
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Render frames back to the text form.
pub fn format_sequence(frames: &[RegisterFile]) -> String {
    let mut out = String::new();
    for frame in frames {
        if frame.iter().all(|&b| b == 0) {
            out.push('\n');
            continue;
        }
        let line: Vec<String> = frame.iter().map(|b| format!("{b:02x}")).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

const FRAMES_PER_STEP: usize = 8;

/// A short built-in phrase exercising several instruments and effects.
pub fn demo_sequence() -> Vec<RegisterFile> {
    const MELODY: [u8; 8] = [45, 49, 52, 57, 56, 52, 49, 47];
    const BASS: [u8; 4] = [21, 21, 28, 26];

    let mut frames = Vec::with_capacity(16 * FRAMES_PER_STEP);
    for step in 0..16 {
        let mut frame = [0u8; REGISTER_FILE_SIZE];

        let lead = NoteRegister {
            period: 28,
            instrument: Instrument::Sine.id(),
            offset: 0,
            pitch: MELODY[step % MELODY.len()],
            volume: 6,
            effect: if step % 4 == 3 { Effect::Vibrato } else { Effect::None },
        };
        write_channel(&mut frame, 0, lead.encode());

        if step % 2 == 0 {
            let bass = NoteRegister {
                period: 60,
                instrument: Instrument::TiltedSaw.id(),
                offset: 0,
                pitch: BASS[(step / 2) % BASS.len()],
                volume: 7,
                effect: Effect::Slide,
            };
            write_channel(&mut frame, 1, bass.encode());
        }

        if step % 4 == 0 {
            let kick = NoteRegister {
                period: 12,
                instrument: Instrument::Noise.id(),
                offset: 0,
                pitch: 30,
                volume: 5,
                effect: Effect::Drop,
            };
            write_channel(&mut frame, 2, kick.encode());
        }

        if step % 4 == 2 {
            let pad = NoteRegister {
                period: 24,
                instrument: Instrument::Phaser.id(),
                offset: 2,
                pitch: 40,
                volume: 3,
                effect: Effect::Fadeout,
            };
            write_channel(&mut frame, 3, pad.encode());
        }

        frames.push(frame);
        frames.extend(std::iter::repeat([0u8; REGISTER_FILE_SIZE]).take(FRAMES_PER_STEP - 1));
    }
    frames
}
