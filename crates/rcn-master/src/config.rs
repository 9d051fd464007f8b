//! Player configuration, loaded from TOML.
//!
//! ```toml
//! update_rate_hz = 30.0
//! render_tail_seconds = 1.1
//!
//! [engine]
//! volume = 0.8
//! silence_on_starvation = true
//! ```

use std::fs;
use std::path::Path;

use rcn_engine::EngineConfig;
use rcn_ir::timing::{STARVATION_THRESHOLD, UPDATE_RATE};
use serde::{Deserialize, Serialize};

use crate::error::ControllerError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub engine: EngineConfig,
    /// How often the driver loop feeds a register frame to the engine.
    pub update_rate_hz: f64,
    /// Silent frames appended after a sequence so the last notes can finish.
    pub render_tail_seconds: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            update_rate_hz: UPDATE_RATE as f64,
            // Longest note (127 rows) plus its release
            render_tail_seconds: 1.1,
        }
    }
}

impl PlayerConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ControllerError> {
        let text = fs::read_to_string(path).map_err(|source| ControllerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ControllerError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ControllerError> {
        // Slower than this and every update looks like starvation
        let min_rate = 1.0 / STARVATION_THRESHOLD;
        if self.update_rate_hz.is_nan() || self.update_rate_hz <= min_rate {
            return Err(ControllerError::InvalidConfig(format!(
                "update_rate_hz must be above {min_rate} (got {})",
                self.update_rate_hz
            )));
        }
        if !(0.0..=1.0).contains(&self.engine.volume) {
            return Err(ControllerError::InvalidConfig(format!(
                "engine.volume must be within 0.0..=1.0 (got {})",
                self.engine.volume
            )));
        }
        if self.render_tail_seconds.is_nan() || self.render_tail_seconds < 0.0 {
            return Err(ControllerError::InvalidConfig(format!(
                "render_tail_seconds must not be negative (got {})",
                self.render_tail_seconds
            )));
        }
        Ok(())
    }

    /// Number of silent tail frames at the configured update rate.
    pub fn tail_frames(&self) -> usize {
        (self.render_tail_seconds * self.update_rate_hz).ceil() as usize
    }
}
