//! Render output for an external renderer
//!
//! Every entity is one unit mesh drawn with its placement matrix. The core
//! never draws; it only hands out meshes and per-entity instance data.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::consts::CIRCLE_MESH_PARTS;
use crate::math::row_major;
use crate::sim::{Entity, ShapeKind, World};

/// How a unit mesh's vertices are assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    Lines,
}

impl ShapeKind {
    pub fn primitive(&self) -> Primitive {
        match self {
            ShapeKind::Ball | ShapeKind::Pillar => Primitive::Triangles,
            ShapeKind::Line | ShapeKind::DebugLine => Primitive::Lines,
        }
    }

    /// Shader-side tag for the shape
    pub fn id(&self) -> u32 {
        match self {
            ShapeKind::Ball => 0,
            ShapeKind::Line => 1,
            ShapeKind::Pillar => 2,
            ShapeKind::DebugLine => 3,
        }
    }
}

/// Local-space vertices of the unit shape for `kind`
///
/// Circles have diameter 1 around the origin as a triangle list; lines run
/// from the origin to `(1, 0)`.
pub fn unit_mesh(kind: ShapeKind) -> Vec<Vec2> {
    match kind.primitive() {
        Primitive::Triangles => unit_circle(CIRCLE_MESH_PARTS),
        Primitive::Lines => vec![Vec2::ZERO, Vec2::X],
    }
}

fn unit_circle(parts: usize) -> Vec<Vec2> {
    let mut vertices = Vec::with_capacity(parts * 3);
    let radius = 0.5;

    for i in 0..parts {
        let theta1 = (i as f32 / parts as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / parts as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vec2::ZERO);
        vertices.push(Vec2::new(radius * theta1.cos(), radius * theta1.sin()));
        vertices.push(Vec2::new(radius * theta2.cos(), radius * theta2.sin()));
    }

    vertices
}

/// Per-entity instance data, laid out for a uniform/instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Placement matrix rows, each padded to vec4
    pub rows: [[f32; 4]; 3],
    /// `ShapeKind::id`
    pub kind: u32,
    pub _padding: [u32; 3],
}

impl InstanceRaw {
    pub fn from_entity(entity: &Entity) -> Self {
        let m = row_major(&entity.transform.matrix);
        Self {
            rows: [
                [m[0][0], m[0][1], m[0][2], 0.0],
                [m[1][0], m[1][1], m[1][2], 0.0],
                [m[2][0], m[2][1], m[2][2], 0.0],
            ],
            kind: entity.shape.id(),
            _padding: [0; 3],
        }
    }
}

impl World {
    /// Instances for every active entity, in slot order
    pub fn instances(&self) -> Vec<InstanceRaw> {
        self.entities.iter().map(InstanceRaw::from_entity).collect()
    }
}

/// Raw bytes of an instance slice, ready for upload
pub fn instance_bytes(instances: &[InstanceRaw]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
