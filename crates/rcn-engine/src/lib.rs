//! Synthesis engine for the raccoon sound chip.
//!
//! Turns per-channel register snapshots into scheduled mono blocks:
//! registers become [`Note`]s, notes are shaped by their effect and
//! envelope, channels are mixed, and the [`Scheduler`] places each block on
//! the device timeline.

mod channel;
mod config;
mod engine;
pub mod envelope;
pub mod mixer;
mod note;
pub mod pitch;
pub mod scheduler;
pub mod waveform;

pub use channel::ChannelState;
pub use config::EngineConfig;
pub use engine::{Engine, UpdateOutcome};
pub use envelope::{sample_note, NoteSample, ATTACK_TIME, RELEASE_TIME};
pub use note::Note;
pub use pitch::{pitch_to_frequency, pitch_to_name, PITCH_COUNT};
pub use scheduler::{Advance, Scheduler};
pub use waveform::waveform;
