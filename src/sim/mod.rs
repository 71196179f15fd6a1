//! Deterministic simulation module
//!
//! Everything that moves the ball lives here. This module must stay pure:
//! - Caller-supplied time steps only
//! - Seeded RNG only
//! - Stable obstacle order (earliest contact, first in order on ties)
//! - No rendering or platform dependencies

pub mod collision;
pub mod segment;
pub mod state;
pub mod tick;

pub use collision::{Contact, Miss, NO_INTERSECTION, Rect, Reflection, impact_time, reflect};
pub use segment::{LineSegment, SegmentError};
pub use state::{
    Body, CircleObstacle, DriverPhase, Entities, Entity, EntityHandle, Obstacle, ShapeKind, World,
    WorldError,
};
pub use tick::{Bounce, TickInput, TickReport, earliest_bounce, tick};
