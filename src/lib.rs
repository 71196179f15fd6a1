//! Ricochet - swept collision core for a ball bouncing inside a 2D arena
//!
//! Core modules:
//! - `math`: Vector helpers and affine placement matrices
//! - `sim`: Deterministic simulation (segments, intersection engine, world, tick)
//! - `render`: Unit meshes and per-entity instances for an external renderer
//! - `settings`: Arena layout and driver configuration

pub mod math;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{ArenaPreset, ResponseMode, Settings};

/// Simulation configuration constants
pub mod consts {
    use glam::Vec2;

    /// Frame time used for manual single steps while paused
    pub const STEP_DT: f32 = 0.016;
    /// Longest frame the runner hands to a single tick
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_START_VELOCITY: Vec2 = Vec2::new(130.0, 110.0);

    /// Entity arena capacity
    pub const MAX_ENTITIES: usize = 2048;

    /// Rendered thickness of walls and normal markers
    pub const WALL_THICKNESS: f32 = 5.0;
    /// Length of the debug markers drawn on segment normals
    pub const NORMAL_MARKER_LENGTH: f32 = 25.0;
    /// Length of the debug marker following the ball velocity
    pub const VELOCITY_MARKER_LENGTH: f32 = 50.0;
    pub const VELOCITY_MARKER_THICKNESS: f32 = 1.0;

    /// Triangles in the unit circle mesh
    pub const CIRCLE_MESH_PARTS: usize = 24;
}
