//! Swept collision detection and reflection
//!
//! The hard part of the arena: given the motion of a point or circle over one
//! frame (`start -> end`) find the earliest time of impact `t` in `[0, 1]`
//! against a static segment or circle, and mirror the remaining motion off the
//! contact normal.
//!
//! Every query is total. A miss carries the reason (`Miss`) and never writes a
//! partial result; callers that want the scalar `-1` convention use
//! `impact_time`.

use glam::Vec2;
use thiserror::Error;

use super::segment::LineSegment;
use crate::math::{dot, normalize, scale_add, square_distance};

/// Scalar time reported for a miss
pub const NO_INTERSECTION: f32 = -1.0;

/// Why a swept query found no contact this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Miss {
    /// Zero-length motion or a zero-radius obstacle
    #[error("degenerate input")]
    DegenerateInput,
    /// No root in `[0, 1]`, or the root lies off the finite segment
    #[error("contact outside this frame's motion")]
    OutOfRange,
    /// Motion parallel to the surface
    #[error("motion is parallel to the surface")]
    NumericDegeneracy,
}

/// Where and when the swept shape first touches an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Fraction of the frame's motion, in `[0, 1]`
    pub t: f32,
    /// Position of the point (or circle center) at time `t`
    pub point: Vec2,
}

/// A contact plus the unit direction to continue in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    pub contact: Contact,
    /// Reflected direction, unit length; speed is the caller's business
    pub direction: Vec2,
    /// Unit surface normal the motion was mirrored across
    pub normal: Vec2,
}

/// Anything with a time of impact
pub trait Impact {
    fn t(&self) -> f32;
}

impl Impact for Contact {
    fn t(&self) -> f32 {
        self.t
    }
}

impl Impact for Reflection {
    fn t(&self) -> f32 {
        self.contact.t
    }
}

/// Collapse a query result to the scalar convention (`-1` on a miss)
pub fn impact_time<I: Impact>(result: &Result<I, Miss>) -> f32 {
    result.as_ref().map_or(NO_INTERSECTION, Impact::t)
}

/// Mirror `incoming` across the plane with unit `normal`: v' = v - 2(v·n)n
#[inline]
pub fn reflect(incoming: Vec2, normal: Vec2) -> Vec2 {
    incoming - 2.0 * dot(incoming, normal) * normal
}

// ---------------------------------------------------------------------------
// Static overlap tests

/// Axis-aligned rectangle given by its center and full extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - Vec2::new(self.width, self.height) * 0.5
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + Vec2::new(self.width, self.height) * 0.5
    }
}

pub fn static_point_to_static_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    square_distance(point, center) <= radius * radius
}

pub fn static_point_to_static_rect(point: Vec2, rect: &Rect) -> bool {
    let (min, max) = (rect.min(), rect.max());
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

pub fn static_circle_to_static_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> bool {
    square_distance(c0, c1) <= (r0 + r1) * (r0 + r1)
}

pub fn static_rect_to_static_rect(a: &Rect, b: &Rect) -> bool {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());
    !(a_min.x > b_max.x || b_min.x > a_max.x || a_min.y > b_max.y || b_min.y > a_max.y)
}

/// Circle vs rectangle via the rectangle point closest to the circle center
pub fn static_circle_to_static_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min(), rect.max());
    static_point_to_static_circle(closest, center, radius)
}

/// Signed distance of a point from a segment's line (negative inside)
#[inline]
pub fn static_point_to_static_line_segment(point: Vec2, segment: &LineSegment) -> f32 {
    segment.signed_distance(point)
}

// ---------------------------------------------------------------------------
// Swept queries against segments

/// Moving point vs static segment
pub fn animated_point_to_static_line_segment(
    start: Vec2,
    end: Vec2,
    segment: &LineSegment,
) -> Result<Contact, Miss> {
    if start == end {
        return Err(Miss::DegenerateInput);
    }

    // Both ends strictly on one side: the line is never crossed
    let d_start = segment.signed_distance(start);
    let d_end = segment.signed_distance(end);
    if (d_start > 0.0 && d_end > 0.0) || (d_start < 0.0 && d_end < 0.0) {
        return Err(Miss::OutOfRange);
    }

    sweep_to_offset_line(start, end, segment, 0.0)
}

/// Moving circle vs static segment
///
/// The circle center is swept against the segment's line pushed `radius`
/// toward the side the center starts on. Only the span of the segment itself
/// is tested at the contact; the rounded caps at the endpoints are not.
pub fn animated_circle_to_static_line_segment(
    start: Vec2,
    end: Vec2,
    radius: f32,
    segment: &LineSegment,
) -> Result<Contact, Miss> {
    if start == end {
        return Err(Miss::DegenerateInput);
    }

    // Band test: the sweep stays more than `radius` away on one side
    let d_start = segment.signed_distance(start);
    let d_end = segment.signed_distance(end);
    if (d_start < -radius && d_end < -radius) || (d_start > radius && d_end > radius) {
        return Err(Miss::OutOfRange);
    }

    let offset = if d_start < 0.0 { -radius } else { radius };
    sweep_to_offset_line(start, end, segment, offset)
}

/// Solve `n·(start + t·v) = n·p0 + offset` and check the segment span
fn sweep_to_offset_line(
    start: Vec2,
    end: Vec2,
    segment: &LineSegment,
    offset: f32,
) -> Result<Contact, Miss> {
    let motion = end - start;
    let normal = segment.normal();

    let approach = dot(normal, motion);
    if approach == 0.0 {
        return Err(Miss::NumericDegeneracy);
    }

    let t = (segment.normal_dot_p0() + offset - dot(normal, start)) / approach;
    // also rejects NaN
    if !(0.0..=1.0).contains(&t) {
        return Err(Miss::OutOfRange);
    }

    let point = scale_add(motion, start, t);
    if !segment.spans(point) {
        return Err(Miss::OutOfRange);
    }

    Ok(Contact { t, point })
}

pub fn reflect_animated_point_on_static_line_segment(
    start: Vec2,
    end: Vec2,
    segment: &LineSegment,
) -> Result<Reflection, Miss> {
    let contact = animated_point_to_static_line_segment(start, end, segment)?;
    Ok(reflect_at(start, end, contact, segment.normal()))
}

pub fn reflect_animated_circle_on_static_line_segment(
    start: Vec2,
    end: Vec2,
    radius: f32,
    segment: &LineSegment,
) -> Result<Reflection, Miss> {
    let contact = animated_circle_to_static_line_segment(start, end, radius, segment)?;
    Ok(reflect_at(start, end, contact, segment.normal()))
}

// ---------------------------------------------------------------------------
// Swept queries against circles

/// Moving point vs static circle
///
/// Solves `|start + t·v - center|² = radius²` and keeps the smaller root.
/// A point starting inside the circle never reports a contact.
pub fn animated_point_to_static_circle(
    start: Vec2,
    end: Vec2,
    center: Vec2,
    radius: f32,
) -> Result<Contact, Miss> {
    if start == end || !(radius > 0.0) {
        return Err(Miss::DegenerateInput);
    }

    let motion = end - start;
    let to_center = center - start;
    let r2 = radius * radius;
    let dist2 = dot(to_center, to_center);

    // m: projection of the center on the motion direction
    // n2: squared distance from the center to the motion line
    let m = dot(to_center, normalize(motion));
    let n2 = dist2 - m * m;
    if n2 > r2 || (m < 0.0 && dist2 > r2) {
        return Err(Miss::OutOfRange);
    }

    let a = dot(motion, motion);
    let b = -2.0 * dot(to_center, motion);
    let c = dist2 - r2;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Err(Miss::OutOfRange);
    }

    let t = if disc == 0.0 {
        -b / (2.0 * a)
    } else {
        let root = disc.sqrt();
        ((-b - root) / (2.0 * a)).min((-b + root) / (2.0 * a))
    };
    if !(0.0..=1.0).contains(&t) {
        return Err(Miss::OutOfRange);
    }

    Ok(Contact {
        t,
        point: scale_add(motion, start, t),
    })
}

/// Moving circle vs static circle: a point against the circle grown by `r0`
pub fn animated_circle_to_static_circle(
    start: Vec2,
    end: Vec2,
    r0: f32,
    center: Vec2,
    r1: f32,
) -> Result<Contact, Miss> {
    animated_point_to_static_circle(start, end, center, r0 + r1)
}

pub fn reflect_animated_point_on_static_circle(
    start: Vec2,
    end: Vec2,
    center: Vec2,
    radius: f32,
) -> Result<Reflection, Miss> {
    let contact = animated_point_to_static_circle(start, end, center, radius)?;
    let normal = normalize(contact.point - center);
    Ok(reflect_at(start, end, contact, normal))
}

pub fn reflect_animated_circle_on_static_circle(
    start: Vec2,
    end: Vec2,
    r0: f32,
    center: Vec2,
    r1: f32,
) -> Result<Reflection, Miss> {
    reflect_animated_point_on_static_circle(start, end, center, r0 + r1)
}

/// Mirror the motion left after the contact across `normal`
fn reflect_at(start: Vec2, end: Vec2, contact: Contact, normal: Vec2) -> Reflection {
    let remaining = end - contact.point;
    // Contact at t = 1 leaves nothing to mirror; the full motion has the same direction
    let incoming = if remaining.length_squared() > f32::MIN_POSITIVE {
        remaining
    } else {
        end - start
    };

    Reflection {
        contact,
        direction: normalize(reflect(incoming, normal)),
        normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Vec2, b: Vec2, tol: f32) -> bool {
        (a - b).length() < tol
    }

    fn floor_wall() -> LineSegment {
        // Interior above the x axis
        LineSegment::new(Vec2::ZERO, Vec2::new(10.0, 0.0)).unwrap()
    }

    #[test]
    fn test_point_crosses_segment() {
        let seg = floor_wall();
        let c = animated_point_to_static_line_segment(
            Vec2::new(4.0, 4.0),
            Vec2::new(6.0, -4.0),
            &seg,
        )
        .unwrap();
        assert!((c.t - 0.5).abs() < 1e-6);
        assert!(close(c.point, Vec2::new(5.0, 0.0), 1e-5));
    }

    #[test]
    fn test_point_same_side_misses() {
        let seg = floor_wall();
        let r = animated_point_to_static_line_segment(Vec2::new(1.0, 5.0), Vec2::new(9.0, 1.0), &seg);
        assert_eq!(r, Err(Miss::OutOfRange));
        assert_eq!(impact_time(&r), NO_INTERSECTION);
    }

    #[test]
    fn test_point_off_segment_extent_misses() {
        let seg = floor_wall();
        let r = animated_point_to_static_line_segment(Vec2::new(15.0, 5.0), Vec2::new(15.0, -5.0), &seg);
        assert_eq!(r, Err(Miss::OutOfRange));
    }

    #[test]
    fn test_point_parallel_on_line() {
        let seg = LineSegment::new(Vec2::new(-5.0, 0.0), Vec2::new(15.0, 0.0)).unwrap();
        let r = animated_point_to_static_line_segment(Vec2::ZERO, Vec2::new(10.0, 0.0), &seg);
        assert_eq!(r, Err(Miss::NumericDegeneracy));
    }

    #[test]
    fn test_circle_hits_wall_and_bounces() {
        // Ball of radius 1 dropping onto the floor
        let seg = floor_wall();
        let start = Vec2::new(5.0, 5.0);
        let end = Vec2::new(5.0, 0.0);

        let hit = reflect_animated_circle_on_static_line_segment(start, end, 1.0, &seg).unwrap();
        assert!((hit.contact.t - 0.8).abs() < 1e-6);
        assert!(close(hit.contact.point, Vec2::new(5.0, 1.0), 1e-5));
        assert!(close(hit.direction, Vec2::new(0.0, 1.0), 1e-5));
        assert_eq!(hit.normal, seg.normal());
    }

    #[test]
    fn test_circle_diagonal_keeps_tangential_component() {
        let seg = floor_wall();
        let hit = reflect_animated_circle_on_static_line_segment(
            Vec2::new(2.0, 4.0),
            Vec2::new(6.0, 0.0),
            1.0,
            &seg,
        )
        .unwrap();
        assert!((hit.contact.t - 0.75).abs() < 1e-6);
        assert!(close(hit.contact.point, Vec2::new(5.0, 1.0), 1e-5));
        let expected = Vec2::new(1.0, 1.0).normalize();
        assert!(close(hit.direction, expected, 1e-5));
    }

    #[test]
    fn test_circle_from_outside_side() {
        // Start below the floor (outside half-plane), move up into it
        let seg = floor_wall();
        let hit = animated_circle_to_static_line_segment(
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 0.0),
            1.0,
            &seg,
        )
        .unwrap();
        assert!(close(hit.point, Vec2::new(5.0, -1.0), 1e-5));
    }

    #[test]
    fn test_circle_straddling_frame_end() {
        let seg = floor_wall();
        let start = Vec2::new(5.0, 5.0);

        // Stops just short of the contact plane (t would be 1 + ε)
        let r = animated_circle_to_static_line_segment(start, Vec2::new(5.0, 1.01), 1.0, &seg);
        assert!(r.is_err());

        // Just reaches past it
        let hit = animated_circle_to_static_line_segment(start, Vec2::new(5.0, 0.99), 1.0, &seg)
            .unwrap();
        assert!(hit.t <= 1.0 && hit.t > 0.99);
    }

    #[test]
    fn test_circle_already_past_plane_at_start() {
        // Center starts inside the radius band moving further in (t would be -ε)
        let seg = floor_wall();
        let r = animated_circle_to_static_line_segment(
            Vec2::new(5.0, 0.99),
            Vec2::new(5.0, -3.0),
            1.0,
            &seg,
        );
        assert_eq!(r, Err(Miss::OutOfRange));
    }

    #[test]
    fn test_circle_parallel_inside_band() {
        let seg = floor_wall();
        let r = animated_circle_to_static_line_segment(
            Vec2::new(5.0, 0.5),
            Vec2::new(8.0, 0.5),
            1.0,
            &seg,
        );
        assert_eq!(r, Err(Miss::NumericDegeneracy));
    }

    #[test]
    fn test_circle_parallel_outside_band() {
        let seg = floor_wall();
        let r = animated_circle_to_static_line_segment(
            Vec2::new(1.0, 3.0),
            Vec2::new(9.0, 3.0),
            1.0,
            &seg,
        );
        assert_eq!(r, Err(Miss::OutOfRange));
    }

    #[test]
    fn test_point_through_circle() {
        let c = animated_point_to_static_circle(
            Vec2::new(-10.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::ZERO,
            5.0,
        )
        .unwrap();
        assert!((c.t - 0.25).abs() < 1e-6);
        assert!(close(c.point, Vec2::new(-5.0, 0.0), 1e-5));
    }

    #[test]
    fn test_point_starting_on_circle() {
        // Already at distance R, heading for the center
        let start = Vec2::new(-5.0, 0.0);
        let c = animated_point_to_static_circle(start, Vec2::ZERO, Vec2::ZERO, 5.0).unwrap();
        assert!(c.t.abs() < 1e-6);
        assert!((c.point.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_point_circle_rejections() {
        let center = Vec2::ZERO;
        // Passes too far from the center
        let r = animated_point_to_static_circle(Vec2::new(-10.0, 6.0), Vec2::new(10.0, 6.0), center, 5.0);
        assert_eq!(r, Err(Miss::OutOfRange));

        // Moving away from it
        let r = animated_point_to_static_circle(Vec2::new(-10.0, 0.0), Vec2::new(-20.0, 0.0), center, 5.0);
        assert_eq!(r, Err(Miss::OutOfRange));

        // Starting inside it
        let r = animated_point_to_static_circle(Vec2::ZERO, Vec2::new(10.0, 0.0), center, 5.0);
        assert_eq!(r, Err(Miss::OutOfRange));

        // Stopping short (t = 1 + ε)
        let r = animated_point_to_static_circle(Vec2::new(-10.0, 0.0), Vec2::new(-5.01, 0.0), center, 5.0);
        assert_eq!(r, Err(Miss::OutOfRange));
        let r = animated_point_to_static_circle(Vec2::new(-10.0, 0.0), Vec2::new(-4.99, 0.0), center, 5.0);
        assert!(r.is_ok());

        // Zero-radius obstacle
        let r = animated_point_to_static_circle(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0), center, 0.0);
        assert_eq!(r, Err(Miss::DegenerateInput));
    }

    #[test]
    fn test_point_reflects_off_circle() {
        let hit = reflect_animated_point_on_static_circle(
            Vec2::new(-10.0, 3.0),
            Vec2::new(10.0, 3.0),
            Vec2::ZERO,
            5.0,
        )
        .unwrap();
        assert!((hit.contact.t - 0.3).abs() < 1e-5);
        assert!(close(hit.contact.point, Vec2::new(-4.0, 3.0), 1e-4));
        assert!(close(hit.normal, Vec2::new(-0.8, 0.6), 1e-4));
        assert!(close(hit.direction, Vec2::new(-0.28, 0.96), 1e-4));
    }

    #[test]
    fn test_circle_circle_inflates_radius() {
        let hit = reflect_animated_circle_on_static_circle(
            Vec2::new(-20.0, 0.0),
            Vec2::new(0.0, 0.0),
            3.0,
            Vec2::ZERO,
            7.0,
        )
        .unwrap();
        assert!((hit.contact.t - 0.5).abs() < 1e-6);
        assert!(close(hit.contact.point, Vec2::new(-10.0, 0.0), 1e-5));
        assert!(close(hit.direction, Vec2::new(-1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_contact_at_frame_end_still_reflects() {
        // Remaining motion is zero, direction comes from the whole motion
        let seg = floor_wall();
        let hit = reflect_animated_point_on_static_line_segment(
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 0.0),
            &seg,
        )
        .unwrap();
        assert_eq!(hit.contact.t, 1.0);
        assert!(close(hit.direction, Vec2::new(0.0, 1.0), 1e-6));
    }

    #[test]
    fn test_reflect_formula() {
        let r = reflect(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((r.x + 100.0).abs() < 1e-4);
        assert!(r.y.abs() < 1e-4);
    }

    #[test]
    fn test_static_overlaps() {
        assert!(static_point_to_static_circle(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.0));
        assert!(!static_point_to_static_circle(Vec2::new(3.0, 4.1), Vec2::ZERO, 5.0));

        let rect = Rect::new(Vec2::ZERO, 10.0, 4.0);
        assert!(static_point_to_static_rect(Vec2::new(5.0, 2.0), &rect));
        assert!(!static_point_to_static_rect(Vec2::new(5.1, 0.0), &rect));

        assert!(static_circle_to_static_circle(Vec2::ZERO, 2.0, Vec2::new(5.0, 0.0), 3.0));
        assert!(!static_circle_to_static_circle(Vec2::ZERO, 2.0, Vec2::new(5.1, 0.0), 3.0));

        let other = Rect::new(Vec2::new(9.0, 0.0), 8.0, 1.0);
        assert!(static_rect_to_static_rect(&rect, &other));
        let far = Rect::new(Vec2::new(9.1, 0.0), 8.0, 1.0);
        assert!(!static_rect_to_static_rect(&rect, &far));

        // Near the corner (5, 2): distance to (7, 4) is ~2.83
        assert!(static_circle_to_static_rect(Vec2::new(7.0, 4.0), 3.0, &rect));
        assert!(!static_circle_to_static_rect(Vec2::new(7.0, 4.0), 2.5, &rect));
        // Center inside the rectangle
        assert!(static_circle_to_static_rect(Vec2::new(1.0, 1.0), 0.1, &rect));

        let seg = floor_wall();
        assert_eq!(static_point_to_static_line_segment(Vec2::new(2.0, 3.0), &seg), -3.0);
    }

    fn vec2() -> impl Strategy<Value = Vec2> {
        (-100.0f32..100.0, -100.0f32..100.0).prop_map(|(x, y)| Vec2::new(x, y))
    }

    proptest! {
        #[test]
        fn no_motion_never_hits(p in vec2(), a in vec2(), b in vec2(), radius in 0.5f32..20.0) {
            prop_assume!(a.distance(b) > 0.1);
            let seg = LineSegment::new(a, b).unwrap();
            prop_assert_eq!(animated_point_to_static_line_segment(p, p, &seg), Err(Miss::DegenerateInput));
            prop_assert_eq!(animated_circle_to_static_line_segment(p, p, radius, &seg), Err(Miss::DegenerateInput));
            prop_assert_eq!(animated_point_to_static_circle(p, p, a, radius), Err(Miss::DegenerateInput));
            prop_assert_eq!(animated_circle_to_static_circle(p, p, radius, b, radius), Err(Miss::DegenerateInput));
        }

        #[test]
        fn hits_stay_within_frame(
            start in vec2(),
            end in vec2(),
            a in vec2(),
            b in vec2(),
            radius in 0.5f32..20.0,
        ) {
            prop_assume!(a.distance(b) > 0.1);
            let seg = LineSegment::new(a, b).unwrap();

            let results = [
                reflect_animated_point_on_static_line_segment(start, end, &seg),
                reflect_animated_circle_on_static_line_segment(start, end, radius, &seg),
                reflect_animated_point_on_static_circle(start, end, a, radius),
                reflect_animated_circle_on_static_circle(start, end, radius, b, radius),
            ];
            for hit in results.iter().flatten() {
                prop_assert!((0.0..=1.0).contains(&hit.contact.t));
                let on_path = start + (end - start) * hit.contact.t;
                prop_assert!((on_path - hit.contact.point).length() < 1e-3);
                prop_assert!((hit.direction.length() - 1.0).abs() < 1e-3);
            }
        }

        #[test]
        fn circle_contact_lies_on_circle(start in vec2(), end in vec2(), center in vec2(), radius in 1.0f32..30.0) {
            if let Ok(c) = animated_point_to_static_circle(start, end, center, radius) {
                prop_assert!(((c.point - center).length() - radius).abs() < 5e-2);
            }
        }

        #[test]
        fn reflection_preserves_speed(
            start in vec2(),
            velocity in vec2(),
            center in vec2(),
            radius in 1.0f32..30.0,
        ) {
            prop_assume!(velocity.length() > 1.0);
            let end = start + velocity;
            if let Ok(hit) = reflect_animated_point_on_static_circle(start, end, center, radius) {
                let bounced = hit.direction * velocity.length();
                prop_assert!((bounced.length() - velocity.length()).abs() < 1e-3 * velocity.length());
            }
        }
    }
}
