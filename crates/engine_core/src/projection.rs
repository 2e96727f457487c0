//! Single-point perspective projection from world space to screen space.
//!
//! World space is centred on the screen: x grows right, y grows down and z is the
//! depth offset from the camera plane (positive = further away). A point with
//! `focal_length + z <= 0` sits at or behind the camera and cannot be drawn.

use glam::{Vec2, Vec3};

/// Default focal length in world units.
pub const DEFAULT_FOCAL_LENGTH: f32 = 500.0;

/// A projected point: screen position in pixels plus the perspective scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub screen: Vec2,
    /// Multiplier for line widths and radii (near = larger, far = smaller).
    pub scale: f32,
}

/// Perspective camera with a fixed focal length looking down +z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub focal_length: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(DEFAULT_FOCAL_LENGTH)
    }
}

impl Projection {
    pub fn new(focal_length: f32) -> Self {
        Self { focal_length }
    }

    /// Perspective scale for a depth, or `None` when the depth is behind the camera plane.
    pub fn scale(&self, z: f32) -> Option<f32> {
        let denom = self.focal_length + z;
        if denom <= 0.0 {
            return None;
        }
        Some(self.focal_length / denom)
    }

    /// Project a world point onto a `width` x `height` screen.
    pub fn project(&self, point: Vec3, width: f32, height: f32) -> Option<Projected> {
        let scale = self.scale(point.z)?;
        Some(Projected {
            screen: Vec2::new(point.x * scale + width * 0.5, point.y * scale + height * 0.5),
            scale,
        })
    }

    /// Project both ends of a trail segment. Either end behind the camera discards the pair.
    pub fn project_segment(
        &self,
        from: Vec3,
        to: Vec3,
        width: f32,
        height: f32,
    ) -> Option<(Projected, Projected)> {
        let a = self.project(from, width, height)?;
        let b = self.project(to, width, height)?;
        Some((a, b))
    }

    /// Depth at or below which an entity counts as having passed the camera.
    /// `margin` keeps entities from reaching the singular plane itself.
    pub fn near_plane(&self, margin: f32) -> f32 {
        -self.focal_length + margin
    }
}
