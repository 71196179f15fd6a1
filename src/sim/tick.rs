//! Per-tick driver
//!
//! Resolves the pause/step state from input, advances the ball through one
//! frame with at most one bounce, then refreshes every placement matrix.

use glam::Vec2;

use super::collision::{
    Reflection, reflect_animated_circle_on_static_circle,
    reflect_animated_circle_on_static_line_segment,
};
use super::state::{DriverPhase, Obstacle, World};
use crate::consts::STEP_DT;
use crate::math::scale_add;
use crate::settings::ResponseMode;

/// Control signals for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Stop the simulation (while running)
    pub pause: bool,
    /// Let the simulation run again (while paused)
    pub resume: bool,
    /// Advance one `STEP_DT` step (while paused)
    pub step: bool,
    /// Keep stepping every tick while held (while paused)
    pub step_held: bool,
}

/// The bounce applied during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    /// Index into `World::obstacles`
    pub obstacle: usize,
    pub t: f32,
    /// Ball center at contact
    pub point: Vec2,
    /// Unit direction after the bounce
    pub direction: Vec2,
    pub normal: Vec2,
}

impl Bounce {
    fn new(obstacle: usize, hit: Reflection) -> Self {
        Self {
            obstacle,
            t: hit.contact.t,
            point: hit.contact.point,
            direction: hit.direction,
            normal: hit.normal,
        }
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Whether the ball was advanced
    pub advanced: bool,
    /// Time step used (0 when paused)
    pub dt: f32,
    pub bounce: Option<Bounce>,
}

impl TickReport {
    fn idle() -> Self {
        Self {
            advanced: false,
            dt: 0.0,
            bounce: None,
        }
    }
}

/// Advance the world by one frame of `frame_dt` seconds
pub fn tick(world: &mut World, input: &TickInput, frame_dt: f32) -> TickReport {
    let frame_dt = if frame_dt > 0.0 {
        frame_dt
    } else {
        if frame_dt.is_nan() || frame_dt < 0.0 {
            log::warn!("Ignoring invalid frame time {frame_dt}");
        }
        0.0
    };

    let step_dt = match world.phase {
        DriverPhase::Running => {
            if input.pause {
                world.phase = DriverPhase::Paused;
                None
            } else {
                Some(frame_dt)
            }
        }
        DriverPhase::Paused | DriverPhase::SingleStep => {
            if input.resume {
                world.phase = DriverPhase::Running;
                Some(frame_dt)
            } else if input.step || input.step_held {
                world.phase = DriverPhase::SingleStep;
                Some(STEP_DT)
            } else {
                world.phase = DriverPhase::Paused;
                None
            }
        }
    };

    let report = match step_dt {
        Some(dt) => advance(world, dt),
        None => TickReport::idle(),
    };

    // Placements are refreshed even when paused
    world.sync_entities();
    report
}

/// Move the ball through one step, bouncing off the earliest obstacle
fn advance(world: &mut World, dt: f32) -> TickReport {
    let body = &mut world.body;
    let start = body.pos;
    let end = scale_add(body.vel, start, dt);

    let bounce = earliest_bounce(start, end, body.radius, &world.obstacles);

    match world.settings.response {
        ResponseMode::Reference => {
            if let Some(b) = &bounce {
                body.pos = b.point + b.direction;
                body.vel = b.direction * body.vel.length();
            }
            body.pos = scale_add(body.vel, body.pos, dt);
        }
        ResponseMode::RemainderCorrected => match &bounce {
            Some(b) => {
                let speed = body.vel.length();
                body.vel = b.direction * speed;
                body.pos = b.point + b.direction * (speed * (1.0 - b.t) * dt);
            }
            None => body.pos = end,
        },
    }

    if let Some(b) = &bounce {
        log::debug!(
            "tick {}: bounce off obstacle {} at t={:.4} ({:.2}, {:.2})",
            world.time_ticks,
            b.obstacle,
            b.t,
            b.point.x,
            b.point.y
        );
    }
    world.time_ticks += 1;

    TickReport {
        advanced: true,
        dt,
        bounce,
    }
}

/// Earliest bounce of a circle moving `start -> end` over all obstacles.
///
/// Strictly smaller `t` wins, so on exact ties the first obstacle in order is kept.
pub fn earliest_bounce(
    start: Vec2,
    end: Vec2,
    radius: f32,
    obstacles: &[Obstacle],
) -> Option<Bounce> {
    let mut earliest: Option<Bounce> = None;

    for (index, obstacle) in obstacles.iter().enumerate() {
        let hit = match obstacle {
            Obstacle::Segment(segment) => {
                reflect_animated_circle_on_static_line_segment(start, end, radius, segment)
            }
            Obstacle::Circle(circle) => reflect_animated_circle_on_static_circle(
                start,
                end,
                radius,
                circle.center,
                circle.radius,
            ),
        };

        let Ok(hit) = hit else { continue };
        if earliest.is_none_or(|e| hit.contact.t < e.t) {
            earliest = Some(Bounce::new(index, hit));
        }
    }

    earliest
}
