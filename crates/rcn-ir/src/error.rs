//! Error type for audio output operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    /// No output device on the default host
    #[error("no audio device available")]
    NoDevice,
    /// Failed to query or initialize the device
    #[error("device init error: {0}")]
    DeviceInit(String),
    /// The device cannot run at the engine's fixed format
    #[error("unsupported device config: {0}")]
    UnsupportedConfig(String),
    #[error("stream create error: {0}")]
    StreamCreate(String),
    #[error("playback error: {0}")]
    Playback(String),
    /// The output connection has been released
    #[error("audio output closed")]
    Closed,
}
