//! Glyph particles: points that fly in to form a character, hold, then scatter.

use crate::pool::Entity;
use engine_core::{Projection, Rgba, Surface};
use glam::Vec3;
use rand::Rng;

/// Fraction of the remaining distance covered per gathering frame.
const APPROACH_RATE: f32 = 0.07;
const FADE_IN: f32 = 0.05;
const FADE_OUT: f32 = 0.02;
/// Depth distance to the target below which a gathering particle settles.
const SETTLE_DEPTH: f32 = 1.0;
const NEAR_MARGIN: f32 = 10.0;
const RADIUS: f32 = 3.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum GlyphState {
    #[default]
    Gathering,
    Holding,
    Dispersing,
}

#[derive(Debug, Clone)]
pub struct GlyphParticle {
    position: Vec3,
    target: Vec3,
    color: Rgba,
    state: GlyphState,
    opacity: f32,
    /// Greeting character this particle belongs to.
    batch: u32,
    near_plane: f32,
    alive: bool,
}

impl Default for GlyphParticle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            color: Rgba::WHITE,
            state: GlyphState::Gathering,
            opacity: 0.0,
            batch: 0,
            near_plane: 0.0,
            alive: false,
        }
    }
}

impl GlyphParticle {
    pub fn spawn(&mut self, start: Vec3, target: Vec3, color: Rgba, batch: u32, projection: &Projection) {
        self.position = start;
        self.target = target;
        self.color = color;
        self.state = GlyphState::Gathering;
        self.opacity = 0.0;
        self.batch = batch;
        self.near_plane = projection.near_plane(NEAR_MARGIN);
        self.alive = true;
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        match self.state {
            GlyphState::Gathering => {
                self.position += (self.target - self.position) * APPROACH_RATE;
                self.opacity = (self.opacity + FADE_IN).min(1.0);
                if (self.position.z - self.target.z).abs() < SETTLE_DEPTH {
                    self.state = GlyphState::Holding;
                }
            }
            GlyphState::Holding => {}
            GlyphState::Dispersing => {
                self.position += Vec3::new(rng.gen_range(-5.0..5.0), 8.0, -12.0);
                self.opacity -= FADE_OUT;
                if self.opacity <= 0.0 || self.position.z <= self.near_plane {
                    self.alive = false;
                }
            }
        }
    }

    /// Start scattering. Only gathering and holding particles are affected.
    pub fn disperse(&mut self) {
        if self.state != GlyphState::Dispersing {
            self.state = GlyphState::Dispersing;
        }
    }

    pub fn state(&self) -> GlyphState {
        self.state
    }

    pub fn batch(&self) -> u32 {
        self.batch
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl Entity for GlyphParticle {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, surface: &mut dyn Surface, projection: &Projection) {
        let (w, h) = surface.size();
        let Some(p) = projection.project(self.position, w, h) else {
            return;
        };
        surface.fill_circle(p.screen, RADIUS * p.scale, self.color.with_alpha(self.opacity));
    }
}
