//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunable engine settings. Everything timing-related is fixed in
/// [`rcn_ir::timing`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial master gain, 0.0..=1.0.
    pub volume: f32,
    /// Drop every channel's notes when updates resume after starvation, so a
    /// long note that was sounding before the gap does not resume mid-note
    /// without an attack.
    pub silence_on_starvation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            silence_on_starvation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: EngineConfig = toml::from_str("volume = 0.5").unwrap();
        assert_eq!(config.volume, 0.5);
        assert!(config.silence_on_starvation);
    }

    #[test]
    fn empty_config_is_default() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
