//! Show configuration (window, audio, simulation). Loaded from config.ron at startup.

use fireworks::SimConfig;
use serde::{Deserialize, Serialize};

/// Persistent show settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Master volume, 0.0 to 1.0.
    #[serde(default = "default_volume")]
    pub master_volume: f64,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub sim: SimConfig,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_volume() -> f64 {
    0.8
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            master_volume: default_volume(),
            muted: false,
            sim: SimConfig::default(),
        }
    }
}

impl ShowConfig {
    /// Load config from `config.ron`. A missing file gives the defaults; an unreadable or
    /// invalid one is logged and also gives the defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Could not read config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Parse and validate a RON document.
    pub fn parse(data: &str) -> anyhow::Result<Self> {
        let config: Self = ron::from_str(data)?;
        config.sim.validate()?;
        Ok(config)
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}
