//! Mesh generation primitives for voxel rendering.
//!
//! # Architecture
//! - [`ChunkMesh`]: the opaque and translucent quad buffers of one chunk
//! - [`StagedMesh`]: a built mesh tagged with the chunk revision it was built from
//! - [`Face`]: a single quad, either a cube side or one plane of a cross-shaped voxel

mod face;
#[allow(clippy::module_inception)]
mod mesh;

pub use face::Face;
pub use mesh::*;
