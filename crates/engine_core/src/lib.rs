//! Core types shared by the fireworks show crates.
//!
//! This crate provides the foundational pieces used across all systems:
//! - Perspective projection
//! - Colors and the drawing surface abstraction
//! - Frame timing

pub mod color;
pub mod projection;
pub mod surface;
pub mod time;

pub use color::*;
pub use projection::*;
pub use surface::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3};
