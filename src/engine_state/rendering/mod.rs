//! Rendering side of the voxel engine.
//!
//! This module turns voxel data into vertex buffers and defines the contract an
//! external renderer implements to draw them. Binding buffers and issuing draw calls
//! stay outside the engine.

pub mod meshing;
pub mod tasks;
pub mod vertex;

// Re-export commonly used types
pub use meshing::{render_world, Drawable, MeshRenderer, RenderStats};
pub use vertex::Vertex;
