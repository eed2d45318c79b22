//! Mesh data structures for voxel rendering.
//!
//! A chunk mesh is two growing quad buffers: one for opaque and alpha-cut geometry,
//! one for translucent geometry that must be drawn after it.

use super::face::Face;
use crate::engine_state::rendering::vertex::{as_floats, VERTICES_PER_FACE};
use crate::engine_state::rendering::Vertex;

/// The vertex buffers of one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    /// Quads of voxels that are not translucent
    pub opaque: Vec<Vertex>,
    /// Quads of translucent voxels (water, ice, glass)
    pub translucent: Vec<Vertex>,
}

impl ChunkMesh {
    /// Appends a face to the buffer selected by its voxel's translucency.
    pub fn push_face(&mut self, face: &Face) {
        let buffer = if face.voxel_type.is_translucent() {
            &mut self.translucent
        } else {
            &mut self.opaque
        };
        buffer.extend_from_slice(&face.vertices());
    }

    /// Number of quads in the opaque buffer.
    pub fn opaque_face_count(&self) -> usize {
        self.opaque.len() / VERTICES_PER_FACE
    }

    /// Number of quads in the translucent buffer.
    pub fn translucent_face_count(&self) -> usize {
        self.translucent.len() / VERTICES_PER_FACE
    }

    /// Number of quads in both buffers.
    pub fn face_count(&self) -> usize {
        self.opaque_face_count() + self.translucent_face_count()
    }

    /// Whether both buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.translucent.is_empty()
    }

    /// The opaque buffer as interleaved floats.
    pub fn opaque_floats(&self) -> &[f32] {
        as_floats(&self.opaque)
    }

    /// The translucent buffer as interleaved floats.
    pub fn translucent_floats(&self) -> &[f32] {
        as_floats(&self.translucent)
    }
}

/// A built mesh waiting in a chunk's staging slot.
#[derive(Debug, Clone)]
pub struct StagedMesh {
    /// The chunk revision the mesh was built from
    pub revision: u64,
    /// The built buffers
    pub mesh: ChunkMesh,
}
