//! Audio output backends for the raccoon sound engine.

mod cpal_backend;
mod offline;

pub use cpal_backend::CpalOutput;
pub use offline::OfflineOutput;
pub use rcn_ir::{AudioError, AudioOutput, DeviceState};
