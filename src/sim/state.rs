//! World state: the moving ball, static obstacles and the entity arena
//!
//! Obstacles are built once from `Settings` and never change. The ball is the
//! only thing the driver mutates. Entities only carry what the renderer needs
//! (shape + placement) and live in a fixed-capacity arena with generational
//! handles.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use super::segment::{LineSegment, SegmentError};
use crate::consts::*;
use crate::math::{Transform, angle_of, from_angle};
use crate::settings::{Launch, Settings};

/// Errors raised while building a world
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("wall {index} is degenerate: {source}")]
    DegenerateWall { index: usize, source: SegmentError },
    #[error("pillar wall {index} is degenerate: {source}")]
    DegeneratePillarWall { index: usize, source: SegmentError },
    #[error("pillar {index} has non-positive radius {radius}")]
    BadPillarRadius { index: usize, radius: f32 },
    #[error("ball radius must be positive, got {0}")]
    BadBallRadius(f32),
    #[error("entity arena is full ({0} slots)")]
    ArenaFull(usize),
}

/// Driver state, changed only by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriverPhase {
    Running,
    Paused,
    /// A manual step was taken last tick; behaves as paused
    SingleStep,
}

/// The moving ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// A static circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircleObstacle {
    pub center: Vec2,
    pub radius: f32,
}

/// Something the ball can bounce off
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Obstacle {
    Segment(LineSegment),
    Circle(CircleObstacle),
}

/// What an entity looks like to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    Ball,
    Line,
    Pillar,
    DebugLine,
}

/// A renderable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Entity {
    pub shape: ShapeKind,
    pub transform: Transform,
}

new_key_type! {
    /// Stable reference to an entity; stale once the entity is destroyed
    pub struct EntityHandle;
}

/// Fixed-capacity entity storage with generational handles
#[derive(Debug, Clone)]
pub struct Entities {
    slots: SlotMap<EntityHandle, Entity>,
    capacity: usize,
}

impl Default for Entities {
    fn default() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }
}

impl Entities {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            capacity,
        }
    }

    /// Store an entity, reusing a freed slot first
    pub fn create(&mut self, entity: Entity) -> Result<EntityHandle, WorldError> {
        if self.slots.len() >= self.capacity {
            return Err(WorldError::ArenaFull(self.capacity));
        }
        Ok(self.slots.insert(entity))
    }

    /// Free the slot. Returns false for stale or already destroyed handles.
    pub fn destroy(&mut self, handle: EntityHandle) -> bool {
        self.slots.remove(handle).is_some()
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.slots.get(handle)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.slots.get_mut(handle)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.values_mut()
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub body: Body,
    /// Obstacles in query order (first found wins ties)
    pub obstacles: Vec<Obstacle>,
    pub entities: Entities,
    pub phase: DriverPhase,
    /// Ticks that advanced the ball
    pub time_ticks: u64,
    ball: EntityHandle,
    velocity_marker: Option<EntityHandle>,
}

impl World {
    /// Build obstacles and entities from settings
    pub fn new(settings: Settings) -> Result<Self, WorldError> {
        if !(settings.ball_radius > 0.0) {
            return Err(WorldError::BadBallRadius(settings.ball_radius));
        }

        let mut entities = Entities::default();
        let mut obstacles = Vec::new();
        let mut segments = Vec::new();

        for (index, wall) in settings.walls.iter().enumerate() {
            let segment = LineSegment::new(wall.from, wall.to)
                .map_err(|source| WorldError::DegenerateWall { index, source })?;
            obstacles.push(Obstacle::Segment(segment));
            segments.push(segment);
            entities.create(Entity {
                shape: ShapeKind::Line,
                transform: Transform::for_segment(wall.from, wall.to, settings.wall_thickness),
            })?;
        }

        for (index, pillar) in settings.pillars.iter().enumerate() {
            if !(pillar.radius > 0.0) {
                return Err(WorldError::BadPillarRadius {
                    index,
                    radius: pillar.radius,
                });
            }
        }

        // Each pillar pair: both pillars, then the wall joining them
        let pairs = if settings.pillar_walls {
            settings.pillars.len() / 2
        } else {
            0
        };
        for (index, pillar) in settings.pillars.iter().enumerate() {
            obstacles.push(Obstacle::Circle(CircleObstacle {
                center: pillar.center,
                radius: pillar.radius,
            }));
            entities.create(Entity {
                shape: ShapeKind::Pillar,
                transform: Transform::for_circle(pillar.center, pillar.radius),
            })?;

            if index % 2 == 1 && index / 2 < pairs {
                let from = settings.pillars[index - 1].center;
                let to = pillar.center;
                let segment = LineSegment::new(from, to).map_err(|source| {
                    WorldError::DegeneratePillarWall {
                        index: index / 2,
                        source,
                    }
                })?;
                obstacles.push(Obstacle::Segment(segment));
                segments.push(segment);
                entities.create(Entity {
                    shape: ShapeKind::Line,
                    transform: Transform::for_segment(from, to, settings.wall_thickness),
                })?;
            }
        }

        let body = Body::new(settings.ball_start, launch_velocity(&settings.launch), settings.ball_radius);
        let ball = entities.create(Entity {
            shape: ShapeKind::Ball,
            transform: Transform::for_circle(body.pos, body.radius),
        })?;

        let velocity_marker = if settings.debug_draw {
            for segment in &segments {
                entities.create(Entity {
                    shape: ShapeKind::DebugLine,
                    transform: Transform::new(
                        segment.midpoint(),
                        angle_of(segment.normal()),
                        Vec2::new(NORMAL_MARKER_LENGTH, WALL_THICKNESS),
                    ),
                })?;
            }
            Some(entities.create(Entity {
                shape: ShapeKind::DebugLine,
                transform: Transform::new(
                    body.pos,
                    0.0,
                    Vec2::new(VELOCITY_MARKER_LENGTH, VELOCITY_MARKER_THICKNESS),
                ),
            })?)
        } else {
            None
        };

        log::info!(
            "World built: {} obstacles, {} entities, ball at ({}, {})",
            obstacles.len(),
            entities.len(),
            body.pos.x,
            body.pos.y
        );

        let mut world = Self {
            settings,
            body,
            obstacles,
            entities,
            phase: DriverPhase::Running,
            time_ticks: 0,
            ball,
            velocity_marker,
        };
        world.sync_entities();
        Ok(world)
    }

    /// Handle of the ball's render entity
    pub fn ball_entity(&self) -> EntityHandle {
        self.ball
    }

    /// Copy ball state into its entities and rebuild every placement matrix
    pub fn sync_entities(&mut self) {
        let body = self.body;
        if let Some(ball) = self.entities.get_mut(self.ball) {
            ball.transform.position = body.pos;
            ball.transform.scale = Vec2::splat(body.radius * 2.0);
        }
        if let Some(marker) = self.velocity_marker.and_then(|h| self.entities.get_mut(h)) {
            marker.transform.position = body.pos;
            if body.vel != Vec2::ZERO {
                marker.transform.angle = angle_of(body.vel);
            }
        }

        for entity in self.entities.iter_mut() {
            entity.transform.recompute();
        }
    }
}

/// Initial velocity for the configured launch
fn launch_velocity(launch: &Launch) -> Vec2 {
    match *launch {
        Launch::Fixed { velocity } => velocity,
        Launch::Seeded { seed, speed } => {
            let mut rng = Pcg32::seed_from_u64(seed);
            from_angle(rng.random_range(0.0..std::f32::consts::TAU)) * speed
        }
    }
}
