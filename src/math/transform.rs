//! Affine placement matrices
//!
//! Unit-shape geometry (circle of diameter 1, line from the origin to +x) is
//! placed in the world with `Translation * Rotation * Scale`. Matrices are
//! derived every tick and never persisted as the source of truth.

use glam::{Mat3, Vec2};
use serde::{Deserialize, Serialize};

use super::vector::{angle_of, distance};

/// `T * R * S` for the given position, angle (radians) and per-axis scale
#[inline]
pub fn placement(position: Vec2, angle: f32, scale: Vec2) -> Mat3 {
    Mat3::from_translation(position) * Mat3::from_angle(angle) * Mat3::from_scale(scale)
}

/// Rotation matrix from an angle in degrees
#[inline]
pub fn rotation_deg(angle: f32) -> Mat3 {
    Mat3::from_angle(angle.to_radians())
}

/// Rows of `m`, for renderers that expect row-major data
pub fn row_major(m: &Mat3) -> [[f32; 3]; 3] {
    m.transpose().to_cols_array_2d()
}

/// Position/orientation/scale of an entity plus its derived matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    /// Rotation in radians
    pub angle: f32,
    pub scale: Vec2,
    /// Cached `T * R * S`, refreshed by `recompute`
    #[serde(skip, default = "identity")]
    pub matrix: Mat3,
}

fn identity() -> Mat3 {
    Mat3::IDENTITY
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0, Vec2::ONE)
    }
}

impl Transform {
    pub fn new(position: Vec2, angle: f32, scale: Vec2) -> Self {
        Self {
            position,
            angle,
            scale,
            matrix: placement(position, angle, scale),
        }
    }

    /// Placement of the unit line so it spans `p0 -> p1` with the given thickness
    pub fn for_segment(p0: Vec2, p1: Vec2, thickness: f32) -> Self {
        Self::new(p0, angle_of(p1 - p0), Vec2::new(distance(p0, p1), thickness))
    }

    /// Placement of the unit circle so it has the given radius
    pub fn for_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center, 0.0, Vec2::splat(radius * 2.0))
    }

    /// Rebuild the matrix from position, angle and scale
    pub fn recompute(&mut self) {
        self.matrix = placement(self.position, self.angle, self.scale);
    }

    /// Map a point of the unit shape into world space
    #[inline]
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.matrix.transform_point2(local)
    }
}
