//! Configuration file management.
//!
//! Handles loading and saving user preferences to `~/.psy-viz.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 3;
const DEFAULT_BUFFER_SIZE: usize = 1024;
const DEFAULT_REACTIVITY: f32 = 0.5;
const DEFAULT_INPUT_GAIN: f32 = 1.0;

const CONFIG_TEMPLATE: &str = r#"# psy-viz configuration file

# Timeout in seconds when switching audio devices (default: 3)
# device_timeout_secs = 3

# Last selected audio device (auto-saved)
# last_device = "Device Name"
# last_device_is_input = false

# Analysis buffer size: 512 or 1024 (default: 1024)
# Other values fall back to the default.
# buffer_size = 1024

# How fast the analysis reacts to changes, 0.0 (smooth) to 1.0 (snappy)
# reactivity = 0.5

# Gain applied to captured samples before analysis, 0.0 to 2.0
# input_gain = 1.0
"#;

#[derive(Serialize, Deserialize, Default)]
pub struct Config {
    pub last_device: Option<String>,
    pub last_device_is_input: Option<bool>,
    pub device_timeout_secs: Option<u64>,
    pub buffer_size: Option<usize>,
    pub reactivity: Option<f32>,
    pub input_gain: Option<f32>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".psy-viz.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            let _ = fs::write(&path, CONFIG_TEMPLATE);
            log::info!("Created config template at {:?}", path);
        }

        fs::read_to_string(&path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Ok(content) = toml::to_string(self) {
                let _ = fs::write(&path, &content);
                log::debug!("Config saved to {:?}", path);
            }
        }
    }

    pub fn set_device(&mut self, name: &str, is_input: bool) {
        self.last_device = Some(name.to_string());
        self.last_device_is_input = Some(is_input);
        self.save();
    }

    pub fn device_timeout_secs(&self) -> u64 {
        self.device_timeout_secs
            .unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECS)
    }

    /// Configured buffer size; values the engine does not support fall
    /// back to the default.
    pub fn buffer_size(&self) -> usize {
        match self.buffer_size {
            Some(size) if psy_viz_dsp::SUPPORTED_BUFFER_SIZES.contains(&size) => size,
            Some(size) => {
                log::warn!("Unsupported buffer_size {size} in config, using {DEFAULT_BUFFER_SIZE}");
                DEFAULT_BUFFER_SIZE
            }
            None => DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn reactivity(&self) -> f32 {
        self.reactivity
            .unwrap_or(DEFAULT_REACTIVITY)
            .clamp(0.0, 1.0)
    }

    pub fn input_gain(&self) -> f32 {
        self.input_gain.unwrap_or(DEFAULT_INPUT_GAIN).clamp(0.0, 2.0)
    }
}
