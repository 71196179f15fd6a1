//! 2D vector helpers
//!
//! Thin free functions over `Vec2` with the argument order the collision code
//! is written against. Everything else (add, sub, scale, length) is plain glam.

use glam::Vec2;

/// `base + c * v` (scale first, then add)
#[inline]
pub fn scale_add(v: Vec2, base: Vec2, c: f32) -> Vec2 {
    base + v * c
}

/// Divide by magnitude.
///
/// A zero vector yields NaN components; callers guarantee non-zero input.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v / v.length()
}

#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.x * b.x + a.y * b.y
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    square_distance(a, b).sqrt()
}

/// Squared distance, for comparisons that don't need the root
#[inline]
pub fn square_distance(a: Vec2, b: Vec2) -> f32 {
    let d = a - b;
    d.x * d.x + d.y * d.y
}

/// Unit vector at `angle` radians from +x
#[inline]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[inline]
pub fn from_angle_deg(angle: f32) -> Vec2 {
    from_angle(angle.to_radians())
}

/// Angle of `v` from +x, in [-π, π]
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
