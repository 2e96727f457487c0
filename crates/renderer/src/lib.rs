//! Rendering: a tiny-skia canvas for the simulation and a wgpu presenter that blits it.

pub mod canvas;
pub mod pipeline;
pub mod renderer;
pub mod texture;

pub use canvas::*;
pub use pipeline::*;
pub use renderer::*;
pub use texture::*;
