//! Flares: the glowing, fading trail particles that make up every burst.

use crate::pool::Entity;
use engine_core::{Projection, Rgba, Surface};
use glam::Vec3;

/// Depth margin in front of the camera plane past which a flare is retired.
const NEAR_MARGIN: f32 = 20.0;
/// Flares whose head lands this far outside the viewport are not drawn.
const CULL_MARGIN: f32 = 100.0;
/// Above this opacity a white core is drawn over the colored stroke.
const CORE_OPACITY: f32 = 0.7;
/// Opacity at or below this counts as fully faded. Absorbs f32 drift from repeated
/// subtraction so a flare lives exactly `ceil(1 / decay)` frames.
const FADED: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlareKind {
    #[default]
    Normal,
    /// Thin, long-lived drooping trail.
    Willow,
}

impl FlareKind {
    fn base_width(self) -> f32 {
        match self {
            FlareKind::Normal => 4.0,
            FlareKind::Willow => 2.0,
        }
    }
}

/// Per-flare physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlarePhysics {
    /// Velocity multiplier applied every frame.
    pub friction: f32,
    /// Added to vertical velocity every frame (positive = down).
    pub gravity: f32,
    /// Opacity lost every frame.
    pub decay: f32,
    pub kind: FlareKind,
}

#[derive(Debug, Clone)]
pub struct Flare {
    position: Vec3,
    previous: Vec3,
    velocity: Vec3,
    color: Rgba,
    physics: FlarePhysics,
    opacity: f32,
    near_plane: f32,
    alive: bool,
}

impl Default for Flare {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            previous: Vec3::ZERO,
            velocity: Vec3::ZERO,
            color: Rgba::WHITE,
            physics: FlarePhysics {
                friction: 1.0,
                gravity: 0.0,
                decay: 1.0,
                kind: FlareKind::Normal,
            },
            opacity: 0.0,
            near_plane: 0.0,
            alive: false,
        }
    }
}

impl Flare {
    /// Reset all state for a fresh flight. `projection` fixes the depth at which the
    /// flare counts as having passed the camera.
    pub fn spawn(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        color: Rgba,
        physics: FlarePhysics,
        projection: &Projection,
    ) {
        self.position = position;
        self.previous = position;
        self.velocity = velocity;
        self.color = color;
        self.physics = physics;
        self.opacity = 1.0;
        self.near_plane = projection.near_plane(NEAR_MARGIN);
        self.alive = true;
    }

    pub fn update(&mut self) {
        self.previous = self.position;
        self.velocity *= self.physics.friction;
        self.velocity.y += self.physics.gravity;
        self.position += self.velocity;
        self.opacity -= self.physics.decay;
        if self.opacity <= FADED || self.position.z <= self.near_plane {
            self.alive = false;
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn physics(&self) -> FlarePhysics {
        self.physics
    }
}

impl Entity for Flare {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn draw(&self, surface: &mut dyn Surface, projection: &Projection) {
        let (w, h) = surface.size();
        let Some((tail, head)) = projection.project_segment(self.previous, self.position, w, h) else {
            return;
        };
        let p = head.screen;
        if p.x < -CULL_MARGIN || p.x > w + CULL_MARGIN || p.y < -CULL_MARGIN || p.y > h + CULL_MARGIN {
            return;
        }
        let width = self.physics.kind.base_width() * head.scale;
        surface.stroke_line(tail.screen, head.screen, width, self.color.with_alpha(self.opacity));
        if self.opacity > CORE_OPACITY {
            surface.stroke_line(
                tail.screen,
                head.screen,
                width * 0.4,
                Rgba::WHITE.with_alpha(self.opacity),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{DrawCall, RecordingSurface};

    fn physics(friction: f32, gravity: f32, decay: f32) -> FlarePhysics {
        FlarePhysics {
            friction,
            gravity,
            decay,
            kind: FlareKind::Normal,
        }
    }

    fn spawned(position: Vec3, velocity: Vec3, p: FlarePhysics) -> Flare {
        let mut f = Flare::default();
        f.spawn(position, velocity, Rgba::GOLD, p, &Projection::default());
        f
    }

    #[test]
    fn frictionless_flare_integrates_linearly() {
        let p0 = Vec3::new(10.0, -20.0, 5.0);
        let v = Vec3::new(1.5, -2.0, 0.5);
        let mut f = spawned(p0, v, physics(1.0, 0.0, 0.01));
        for _ in 0..40 {
            f.update();
        }
        let expected = p0 + v * 40.0;
        assert!((f.position() - expected).length() < 1e-3);
        assert!(f.is_alive());
    }

    #[test]
    fn friction_and_gravity_apply_before_integration() {
        let mut f = spawned(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), physics(0.5, 1.0, 0.1));
        f.update();
        assert_eq!(f.velocity(), Vec3::new(5.0, 1.0, 0.0));
        assert_eq!(f.position(), Vec3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn dies_after_ceil_one_over_decay_ticks() {
        for (decay, expected) in [
            (0.25_f32, 4),
            (0.125, 8),
            (0.3, 4),
            (0.2, 5),
            (0.1, 10),
            (0.05, 20),
            (0.025, 40),
            (0.02, 50),
            (0.015, 67),
            (0.01, 100),
            (0.006, 167),
        ] {
            let mut f = spawned(Vec3::ZERO, Vec3::ZERO, physics(1.0, 0.0, decay));
            let mut ticks = 0;
            let mut last = f.opacity();
            while f.is_alive() {
                f.update();
                ticks += 1;
                assert!(f.opacity() <= last);
                last = f.opacity();
            }
            assert_eq!(ticks, expected, "decay {decay}");
        }
    }

    #[test]
    fn receding_past_near_plane_kills_early() {
        let mut f = spawned(Vec3::new(0.0, 0.0, -470.0), Vec3::new(0.0, 0.0, -20.0), physics(1.0, 0.0, 0.01));
        f.update();
        assert!(!f.is_alive());
        assert!(f.opacity() > 0.0);
    }

    #[test]
    fn bright_flare_draws_colored_stroke_and_white_core() {
        let mut f = spawned(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), physics(1.0, 0.0, 0.1));
        f.update();
        let mut s = RecordingSurface::new(200.0, 200.0);
        f.draw(&mut s, &Projection::default());
        let lines: Vec<_> = s.lines().copied().collect();
        assert_eq!(lines.len(), 2);
        match (lines[0], lines[1]) {
            (
                DrawCall::Line { from, to, width, color },
                DrawCall::Line { width: core_width, color: core, .. },
            ) => {
                assert_eq!(from.x, 100.0);
                assert_eq!(to.x, 103.0);
                assert_eq!(width, 4.0);
                assert!((color.a - 0.9).abs() < 1e-6);
                assert!((core_width - 1.6).abs() < 1e-6);
                assert_eq!((core.r, core.g, core.b), (1.0, 1.0, 1.0));
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[test]
    fn dim_willow_draws_single_thin_stroke() {
        let mut f = Flare::default();
        let p = FlarePhysics {
            kind: FlareKind::Willow,
            ..physics(1.0, 0.0, 0.5)
        };
        f.spawn(Vec3::ZERO, Vec3::X, Rgba::GOLD, p, &Projection::default());
        f.update();
        let mut s = RecordingSurface::new(200.0, 200.0);
        f.draw(&mut s, &Projection::default());
        let widths: Vec<f32> = s
            .lines()
            .map(|c| match c {
                DrawCall::Line { width, .. } => *width,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(widths, vec![2.0]);
    }

    #[test]
    fn behind_camera_or_offscreen_is_skipped() {
        let projection = Projection::default();
        let mut s = RecordingSurface::new(200.0, 200.0);

        let behind = spawned(Vec3::new(0.0, 0.0, -600.0), Vec3::ZERO, physics(1.0, 0.0, 0.01));
        behind.draw(&mut s, &projection);

        let far_off = spawned(Vec3::new(5000.0, 0.0, 0.0), Vec3::ZERO, physics(1.0, 0.0, 0.01));
        far_off.draw(&mut s, &projection);

        assert!(s.calls.is_empty());
    }
}
