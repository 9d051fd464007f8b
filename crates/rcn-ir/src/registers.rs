//! Sound register layout.
//!
//! The execution host exposes four bytes per channel:
//!
//! ```text
//! byte 0: 1ppppppp   bit 7 = trigger, p = period in rows (1/120 s)
//! byte 1: iiiiiiii   instrument index
//! byte 2: oopppppp   o = start offset in rows, p = pitch (0 = C-1, 45 = A-4)
//! byte 3: 00eeevvv   e = effect, v = volume (0..7)
//! ```

use crate::effects::Effect;

/// Number of independent voices.
pub const CHANNEL_COUNT: usize = 4;

/// Register bytes per channel.
pub const REGISTER_BYTES_PER_CHANNEL: usize = 4;

/// Size of a full register snapshot.
pub const REGISTER_FILE_SIZE: usize = CHANNEL_COUNT * REGISTER_BYTES_PER_CHANNEL;

/// One snapshot of the sound registers for all channels.
pub type RegisterFile = [u8; REGISTER_FILE_SIZE];

const TRIGGER_BIT: u8 = 0x80;

/// The four register bytes for channel `ch`.
///
/// Panics if `ch >= CHANNEL_COUNT`.
pub fn channel_registers(file: &RegisterFile, ch: usize) -> [u8; REGISTER_BYTES_PER_CHANNEL] {
    let start = ch * REGISTER_BYTES_PER_CHANNEL;
    let mut bytes = [0; REGISTER_BYTES_PER_CHANNEL];
    bytes.copy_from_slice(&file[start..start + REGISTER_BYTES_PER_CHANNEL]);
    bytes
}

/// Overwrite channel `ch`'s four register bytes.
///
/// Panics if `ch >= CHANNEL_COUNT`.
pub fn write_channel(file: &mut RegisterFile, ch: usize, bytes: [u8; REGISTER_BYTES_PER_CHANNEL]) {
    let start = ch * REGISTER_BYTES_PER_CHANNEL;
    file[start..start + REGISTER_BYTES_PER_CHANNEL].copy_from_slice(&bytes);
}

/// A decoded, triggered channel register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteRegister {
    /// Note length in rows (0..=127).
    pub period: u8,
    /// Raw instrument index. Not validated here.
    pub instrument: u8,
    /// Start delay in rows (0..=3).
    pub offset: u8,
    /// Pitch index (0..=63).
    pub pitch: u8,
    /// Volume level (0..=7).
    pub volume: u8,
    pub effect: Effect,
}

impl NoteRegister {
    /// Decode a channel's bytes. Returns `None` when the trigger bit is clear,
    /// meaning the channel keeps whatever it was playing.
    pub fn decode(bytes: [u8; REGISTER_BYTES_PER_CHANNEL]) -> Option<Self> {
        if bytes[0] & TRIGGER_BIT == 0 {
            return None;
        }
        Some(Self {
            period: bytes[0] & 0x7f,
            instrument: bytes[1],
            offset: bytes[2] >> 6,
            pitch: bytes[2] & 0x3f,
            volume: bytes[3] & 0x7,
            effect: Effect::from_bits((bytes[3] >> 3) & 0x7),
        })
    }

    /// Encode as triggered register bytes. Out-of-range fields are masked.
    pub fn encode(&self) -> [u8; REGISTER_BYTES_PER_CHANNEL] {
        [
            TRIGGER_BIT | (self.period & 0x7f),
            self.instrument,
            ((self.offset & 0x3) << 6) | (self.pitch & 0x3f),
            (self.effect.bits() << 3) | (self.volume & 0x7),
        ]
    }

    /// Volume normalized to [0, 1].
    pub fn volume_level(&self) -> f64 {
        self.volume as f64 / 7.0
    }
}
