//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the interleaved vertex format handed to the external renderer.

/// Number of `f32` values per vertex (3 position + 2 texture).
pub const FLOATS_PER_VERTEX: usize = 5;
/// Every emitted face is one quad.
pub const VERTICES_PER_FACE: usize = 4;

/// A vertex in the voxel rendering pipeline.
///
/// Positions are relative to the owning chunk's world origin.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 20 bytes, tightly packed so a slice of vertices can be handed to a GPU
/// buffer as raw bytes or as a flat `f32` slice.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-relative position
    pub position: [f32; 3],
    /// Atlas UV coordinates
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Vertex {
            position,
            tex_coords,
        }
    }
}

/// Reinterprets a vertex slice as the interleaved float stream.
pub fn as_floats(vertices: &[Vertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}

/// Reinterprets a vertex slice as raw bytes for buffer uploads.
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_five_packed_floats() {
        assert_eq!(
            std::mem::size_of::<Vertex>(),
            FLOATS_PER_VERTEX * std::mem::size_of::<f32>()
        );
        let vertices = [
            Vertex::new([1.0, 2.0, 3.0], [0.25, 0.5]),
            Vertex::new([4.0, 5.0, 6.0], [0.75, 1.0]),
        ];
        assert_eq!(
            as_floats(&vertices),
            &[1.0, 2.0, 3.0, 0.25, 0.5, 4.0, 5.0, 6.0, 0.75, 1.0]
        );
        assert_eq!(as_bytes(&vertices).len(), 40);
    }
}
