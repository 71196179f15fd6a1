//! Math primitives shared by the simulation and the render output
//!
//! Vectors are `glam::Vec2`; placement matrices are `glam::Mat3`.

pub mod transform;
pub mod vector;

pub use transform::{Transform, placement, rotation_deg, row_major};
pub use vector::{
    angle_of, distance, dot, from_angle, from_angle_deg, normalize, scale_add, square_distance,
};
