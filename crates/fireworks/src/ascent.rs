//! Ascent bodies: rockets that climb at constant velocity and detonate at a target height.

use crate::flare::{Flare, FlareKind, FlarePhysics};
use crate::pool::{Entity, Pool};
use engine_core::{Projection, Rgba, Surface};
use glam::Vec3;
use rand::Rng;

/// Physics of the gold sparks shed while climbing.
const SPARK_PHYSICS: FlarePhysics = FlarePhysics {
    friction: 0.95,
    gravity: 0.1,
    decay: 0.03,
    kind: FlareKind::Normal,
};

/// Where and in which color an ascent body exploded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    pub position: Vec3,
    pub color: Rgba,
}

#[derive(Debug, Clone)]
pub struct AscentBody {
    position: Vec3,
    previous: Vec3,
    velocity: Vec3,
    /// y at or above which (smaller y = higher) the body detonates.
    target_y: f32,
    color: Rgba,
    alive: bool,
}

impl Default for AscentBody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            previous: Vec3::ZERO,
            velocity: Vec3::ZERO,
            target_y: 0.0,
            color: Rgba::WHITE,
            alive: false,
        }
    }
}

impl AscentBody {
    pub fn spawn(&mut self, position: Vec3, velocity: Vec3, target_y: f32, color: Rgba) {
        self.position = position;
        self.previous = position;
        self.velocity = velocity;
        self.target_y = target_y;
        self.color = color;
        self.alive = true;
    }

    /// Move one frame, maybe shed a spark into `flares`, and report the detonation
    /// on the frame the target height is reached. A body reports at most once since
    /// it is dead afterwards.
    pub fn update(
        &mut self,
        flares: &mut Pool<Flare>,
        projection: &Projection,
        spark_chance: f32,
        rng: &mut impl Rng,
    ) -> Option<Detonation> {
        if !self.alive {
            return None;
        }
        self.previous = self.position;
        self.position += self.velocity;

        if rng.gen::<f32>() < spark_chance {
            let velocity = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(1.0..3.0),
                rng.gen_range(-1.0..1.0),
            );
            let origin = self.position;
            flares.spawn(|f| f.spawn(origin, velocity, Rgba::GOLD, SPARK_PHYSICS, projection));
        }

        if self.position.y <= self.target_y {
            self.alive = false;
            return Some(Detonation {
                position: self.position,
                color: self.color,
            });
        }
        None
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target_y(&self) -> f32 {
        self.target_y
    }
}

impl Entity for AscentBody {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, surface: &mut dyn Surface, projection: &Projection) {
        let (w, h) = surface.size();
        let Some((tail, head)) = projection.project_segment(self.previous, self.position, w, h) else {
            return;
        };
        surface.stroke_line(tail.screen, head.screen, 2.0 * head.scale, Rgba::PALE_YELLOW);
        surface.fill_circle(head.screen, 3.0 * head.scale, Rgba::WHITE);
    }
}
