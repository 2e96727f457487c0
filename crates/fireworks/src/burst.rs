//! Burst patterns and flare emission.

use crate::config::{BurstConfig, PatternConfig};
use crate::flare::{Flare, FlareKind, FlarePhysics};
use crate::pool::Pool;
use engine_core::{Projection, Rgba};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstPattern {
    /// Full shell with a spread of speeds.
    Sphere,
    /// Slower, long-lived drooping trails.
    Willow,
    /// Single fixed speed, giving a crisp shell.
    Ring,
}

impl BurstPattern {
    pub const ALL: [BurstPattern; 3] = [BurstPattern::Sphere, BurstPattern::Willow, BurstPattern::Ring];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn params(self, config: &BurstConfig) -> &PatternConfig {
        match self {
            BurstPattern::Sphere => &config.sphere,
            BurstPattern::Willow => &config.willow,
            BurstPattern::Ring => &config.ring,
        }
    }
}

/// `min + u * (max - min)` with `u` in [0, 1). Unlike `gen_range`, a collapsed band is fine.
pub(crate) fn uniform(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + rng.gen::<f32>() * (max - min)
}

/// Direction uniformly distributed over the unit sphere. The polar angle comes
/// from `acos` of a uniform cosine so the poles are not oversampled.
pub fn sphere_direction(rng: &mut impl Rng) -> Vec3 {
    let theta = uniform(rng, 0.0, TAU);
    let phi = uniform(rng, -1.0, 1.0).acos();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    )
}

/// Emit up to `count` flares from `origin` with the pattern's physics. Returns how
/// many the pool accepted.
#[allow(clippy::too_many_arguments)]
pub fn emit(
    pattern: &PatternConfig,
    origin: Vec3,
    color: Rgba,
    count: usize,
    flares: &mut Pool<Flare>,
    projection: &Projection,
    rng: &mut impl Rng,
) -> usize {
    let kind = if pattern.willow {
        FlareKind::Willow
    } else {
        FlareKind::Normal
    };
    let mut spawned = 0;
    for _ in 0..count {
        let speed = uniform(rng, pattern.speed_min, pattern.speed_max);
        let velocity = sphere_direction(rng) * speed;
        let physics = FlarePhysics {
            friction: pattern.friction,
            gravity: pattern.gravity,
            decay: uniform(rng, pattern.decay_min, pattern.decay_max),
            kind,
        };
        if flares.spawn(|f| f.spawn(origin, velocity, color, physics, projection)) {
            spawned += 1;
        }
    }
    spawned
}
