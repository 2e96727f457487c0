//! Simulation tunables. Every field has a serde default so partial config files work.

use engine_core::{ColorParseError, Rgba, DEFAULT_FOCAL_LENGTH};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Largest greeting font size accepted. Glyph masks are `1.5 * font_size` pixels square.
pub const MAX_FONT_SIZE: f32 = 2048.0;

/// Reasons a `SimConfig` is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} capacity must be at least 1")]
    ZeroCapacity(&'static str),
    #[error("{name} must be within 0..=1, got {value}")]
    Probability { name: &'static str, value: f32 },
    #[error("focal length must be positive, got {0}")]
    FocalLength(f32),
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("greeting needs at least one phrase")]
    NoPhrases,
    #[error("greeting font size must be within (0, {MAX_FONT_SIZE}], got {0}")]
    FontSize(f32),
    #[error("glyph sampling stride must be at least 1")]
    ZeroStride,
    #[error("{name} speed band is inverted ({min} > {max})")]
    SpeedBand { name: &'static str, min: f32, max: f32 },
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// Physics and sampling ranges for one burst pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PatternConfig {
    pub speed_min: f32,
    pub speed_max: f32,
    pub friction: f32,
    pub gravity: f32,
    pub decay_min: f32,
    pub decay_max: f32,
    /// Thin drooping trails instead of bright streaks.
    #[serde(default)]
    pub willow: bool,
}

/// Burst emission settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BurstConfig {
    /// Flares emitted per burst.
    pub count: usize,
    pub sphere: PatternConfig,
    pub willow: PatternConfig,
    pub ring: PatternConfig,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 300,
            sphere: PatternConfig {
                speed_min: 8.0,
                speed_max: 18.0,
                friction: 0.94,
                gravity: 0.12,
                decay_min: 0.01,
                decay_max: 0.025,
                willow: false,
            },
            willow: PatternConfig {
                speed_min: 5.0,
                speed_max: 12.0,
                friction: 0.97,
                gravity: 0.1,
                decay_min: 0.006,
                decay_max: 0.015,
                willow: true,
            },
            ring: PatternConfig {
                speed_min: 13.0,
                speed_max: 13.0,
                friction: 0.94,
                gravity: 0.12,
                decay_min: 0.01,
                decay_max: 0.025,
                willow: false,
            },
        }
    }
}

/// Sliding-window cap on bursts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThrottleConfig {
    pub window_ms: u64,
    pub max_bursts: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_ms: 200,
            max_bursts: 2,
        }
    }
}

/// Greeting sequence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GreetingConfig {
    pub phrases: Vec<String>,
    /// Time each character gathers and holds before dispersing.
    pub hold_ms: u64,
    /// Time given to the dispersal before the next character.
    pub clear_ms: u64,
    /// Rasterization font size in pixels.
    pub font_size: f32,
    /// Grid stride when sampling the rasterized glyph.
    pub stride: usize,
    /// Coverage above which a sample becomes a particle.
    pub alpha_threshold: u8,
    pub color: String,
    /// Depth glyph particles fly in from.
    pub start_depth: f32,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            phrases: ["2026", "JOY", "LUCK", "CHEERS", "HOPE"]
                .into_iter()
                .map(String::from)
                .collect(),
            hold_ms: 2000,
            clear_ms: 600,
            font_size: 260.0,
            stride: 6,
            alpha_threshold: 128,
            color: "#D4AF37".to_string(),
            start_depth: 800.0,
        }
    }
}

impl GreetingConfig {
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    pub fn clear(&self) -> Duration {
        Duration::from_millis(self.clear_ms)
    }
}

/// All simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub focal_length: f32,
    pub flare_capacity: usize,
    pub ascent_capacity: usize,
    pub glyph_capacity: usize,
    /// Opacity of the black wash painted over each frame.
    pub fade_alpha: f32,
    /// Per-frame chance of an idle launch.
    pub auto_launch_chance: f32,
    /// Per-frame chance a rising body sheds a spark.
    pub spark_chance: f32,
    /// Burst colors as `#RRGGBB`.
    pub palette: Vec<String>,
    pub burst: BurstConfig,
    /// `None` disables burst rate limiting.
    pub throttle: Option<ThrottleConfig>,
    pub greeting: GreetingConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            focal_length: DEFAULT_FOCAL_LENGTH,
            flare_capacity: 12000,
            ascent_capacity: 40,
            glyph_capacity: 8000,
            fade_alpha: 0.22,
            auto_launch_chance: 0.04,
            spark_chance: 0.5,
            palette: [
                "#FFD700", "#FF4500", "#FF0000", "#00FFFF", "#FFFFFF", "#FF1493", "#ADFF2F",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            burst: BurstConfig::default(),
            throttle: Some(ThrottleConfig::default()),
            greeting: GreetingConfig::default(),
        }
    }
}

impl SimConfig {
    /// Check ranges and parse the palette.
    pub fn validate(&self) -> Result<Vec<Rgba>, ConfigError> {
        for (name, cap) in [
            ("flare", self.flare_capacity),
            ("ascent", self.ascent_capacity),
            ("glyph", self.glyph_capacity),
        ] {
            if cap == 0 {
                return Err(ConfigError::ZeroCapacity(name));
            }
        }
        for (name, value) in [
            ("fade_alpha", self.fade_alpha),
            ("auto_launch_chance", self.auto_launch_chance),
            ("spark_chance", self.spark_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }
        if !(self.focal_length > 0.0) {
            return Err(ConfigError::FocalLength(self.focal_length));
        }
        for (name, p) in [
            ("sphere", &self.burst.sphere),
            ("willow", &self.burst.willow),
            ("ring", &self.burst.ring),
        ] {
            if p.speed_min > p.speed_max {
                return Err(ConfigError::SpeedBand {
                    name,
                    min: p.speed_min,
                    max: p.speed_max,
                });
            }
        }
        if self.greeting.phrases.is_empty() {
            return Err(ConfigError::NoPhrases);
        }
        let font_size = self.greeting.font_size;
        if !(font_size > 0.0 && font_size <= MAX_FONT_SIZE) {
            return Err(ConfigError::FontSize(font_size));
        }
        if self.greeting.stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        Rgba::from_hex(&self.greeting.color)?;
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        let palette = self
            .palette
            .iter()
            .map(|s| Rgba::from_hex(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(palette)
    }

    pub fn throttle_window(&self) -> Option<(Duration, usize)> {
        self.throttle
            .map(|t| (Duration::from_millis(t.window_ms), t.max_bursts))
    }
}
