//! Mesh generation for RoadNetwork
//!
//! Generates engine-agnostic mesh data from a finished network: a line list
//! for the segments and a quad per remaining attraction point.

mod colors;

pub use colors::{BasicColorMapper, ColorMapper, CustomColorMapper, MeshColor};

use glam::Vec2;

use crate::attraction::AttractionPoint;
use crate::network::RoadNetwork;

/// How consecutive indices are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primitive {
    /// Every two indices form a line
    #[default]
    Lines,
    /// Every three indices form a triangle
    Triangles,
}

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine. Positions
/// are 4-component (`z = 0`, `w = 1`) to match homogeneous vertex layouts.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<[f32; 4]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Primitive indices
    pub indices: Vec<u32>,
    pub primitive: Primitive,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of lines or triangles
    pub fn primitive_count(&self) -> usize {
        match self.primitive {
            Primitive::Lines => self.indices.len() / 2,
            Primitive::Triangles => self.indices.len() / 3,
        }
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn push_vertex(&mut self, position: Vec2, color: MeshColor) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push([position.x, position.y, 0.0, 1.0]);
        self.colors.push(color);
        index
    }
}

/// Generate a line-list mesh with one line per segment
///
/// Segment `i` uses vertices `2i` and `2i + 1`, colored by its tag.
pub fn generate_segment_mesh<C>(network: &RoadNetwork, color_mapper: &C) -> MeshData
where
    C: ColorMapper,
{
    let mut mesh = MeshData {
        primitive: Primitive::Lines,
        ..Default::default()
    };

    for segment in network.segments() {
        let color = color_mapper.segment_color(segment.tag);
        let a = mesh.push_vertex(segment.start, color);
        let b = mesh.push_vertex(segment.end, color);
        mesh.indices.extend_from_slice(&[a, b]);
    }

    mesh
}

/// Generate a triangle mesh with a unit quad at each attraction point
///
/// Each quad spans from the point's location one unit along +x and +y.
pub fn generate_point_mesh<C>(points: &[AttractionPoint], color_mapper: &C) -> MeshData
where
    C: ColorMapper,
{
    let mut mesh = MeshData {
        primitive: Primitive::Triangles,
        ..Default::default()
    };
    let color = color_mapper.point_color();

    for point in points {
        let p = point.location;
        let v0 = mesh.push_vertex(p, color);
        let v1 = mesh.push_vertex(p + Vec2::X, color);
        let v2 = mesh.push_vertex(p + Vec2::ONE, color);
        let v3 = mesh.push_vertex(p + Vec2::Y, color);
        mesh.indices.extend_from_slice(&[v0, v1, v2, v0, v2, v3]);
    }

    mesh
}
