//! Fireworks simulation: pooled particles, bursts and greeting sequences.
//!
//! Everything here is single-threaded and renderer-agnostic. Entities draw through
//! [`engine_core::Surface`], and the host drives [`Engine::update`] once per frame.

pub mod ascent;
pub mod burst;
pub mod config;
pub mod engine;
pub mod flare;
pub mod glyph;
pub mod glyph_raster;
pub mod greeting;
pub mod pool;
pub mod throttle;

pub use ascent::*;
pub use burst::*;
pub use config::*;
pub use engine::*;
pub use flare::*;
pub use glyph::*;
pub use glyph_raster::*;
pub use greeting::*;
pub use pool::*;
pub use throttle::*;
