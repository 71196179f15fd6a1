//! Directed line segments for arena walls
//!
//! A segment `p0 -> p1` carries a unit normal `(p1.y - p0.y, p0.x - p1.x)`
//! (the direction rotated a quarter turn clockwise) and the offset `n·p0`.
//! Points with `n·p - n·p0 < 0` are on the inside half-plane, to the left of
//! `p0 -> p1`. Swept queries are two-sided; the sign only tells sides apart.

use glam::Vec2;
use serde::Serialize;
use thiserror::Error;

use crate::math::{dot, normalize};

/// Errors raised when building a segment
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SegmentError {
    #[error("segment endpoints coincide at ({x}, {y})")]
    Degenerate { x: f32, y: f32 },
}

/// A static, directed wall segment with its precomputed half-plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineSegment {
    p0: Vec2,
    p1: Vec2,
    normal: Vec2,
    normal_dot_p0: f32,
}

impl LineSegment {
    /// Build the segment `p0 -> p1`. Fails when the endpoints coincide.
    pub fn new(p0: Vec2, p1: Vec2) -> Result<Self, SegmentError> {
        if p0 == p1 {
            return Err(SegmentError::Degenerate { x: p0.x, y: p0.y });
        }

        let normal = normalize(Vec2::new(p1.y - p0.y, p0.x - p1.x));
        Ok(Self {
            p0,
            p1,
            normal,
            normal_dot_p0: dot(normal, p0),
        })
    }

    #[inline]
    pub fn p0(&self) -> Vec2 {
        self.p0
    }

    #[inline]
    pub fn p1(&self) -> Vec2 {
        self.p1
    }

    /// Unit normal, pointing out of the inside half-plane
    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    #[inline]
    pub fn normal_dot_p0(&self) -> f32 {
        self.normal_dot_p0
    }

    /// `p1 - p0`
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.p1 - self.p0
    }

    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.p0 + self.p1) * 0.5
    }

    /// Distance from the infinite line, signed by half-plane:
    /// negative inside, positive outside, zero on the line.
    #[inline]
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        dot(self.normal, point) - self.normal_dot_p0
    }

    /// Whether the projection of `point` onto the line falls within `[p0, p1]`
    pub fn spans(&self, point: Vec2) -> bool {
        let along = self.p1 - self.p0;
        dot(along, point - self.p0) >= 0.0 && dot(-along, point - self.p1) >= 0.0
    }

    /// Same segment with endpoints swapped (normal flipped)
    pub fn reversed(&self) -> Self {
        Self {
            p0: self.p1,
            p1: self.p0,
            normal: -self.normal,
            normal_dot_p0: -self.normal_dot_p0,
        }
    }
}
