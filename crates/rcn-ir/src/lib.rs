//! Core types for the raccoon sound engine.
//!
//! This crate defines the register layout the execution host writes, the
//! fixed timing constants every other crate agrees on, and the seam to the
//! output device. The synthesis engine consumes register files and emits
//! [`AudioBlock`]s through an [`AudioOutput`].

mod audio_block;
mod audio_traits;
mod effects;
mod error;
mod instrument;
mod registers;
pub mod timing;

pub use audio_block::AudioBlock;
pub use audio_traits::{AudioOutput, DeviceState};
pub use effects::Effect;
pub use error::AudioError;
pub use instrument::{Instrument, INSTRUMENT_COUNT};
pub use registers::{
    channel_registers, write_channel, NoteRegister, RegisterFile, CHANNEL_COUNT,
    REGISTER_BYTES_PER_CHANNEL, REGISTER_FILE_SIZE,
};
