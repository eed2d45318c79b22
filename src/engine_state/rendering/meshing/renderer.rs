//! Renderer contract for chunk meshes.
//!
//! The engine does not own a graphics context. An external renderer implements
//! [`MeshRenderer`] and receives one call per non-empty vertex buffer; anything
//! with a mesh implements [`Drawable`] to describe how it hands its buffers over.
//!
//! [`render_world`] draws every built chunk within the view distance: opaque buffers
//! front to back (cheap early depth rejection), then translucent buffers back to front
//! so blending composes correctly.

use std::cmp::Ordering;

use cgmath::Point3;

use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::world::World;

/// Receives vertex buffers for drawing.
pub trait MeshRenderer {
    /// Draws `face_count` quads from `vertices`, positioned relative to `origin`.
    fn render_vertex_buffer(&mut self, origin: Point3<f32>, vertices: &[Vertex], face_count: usize);
}

/// Something with opaque and translucent geometry at a world position.
pub trait Drawable {
    /// Hands the opaque buffer to `renderer`.
    fn draw(&self, renderer: &mut dyn MeshRenderer);
    /// Hands the translucent buffer to `renderer`.
    fn draw_translucent(&self, renderer: &mut dyn MeshRenderer);
    /// World-space origin of the geometry.
    fn position(&self) -> Point3<f32>;
    /// Distance from a representative point of the geometry to `point`.
    fn distance_to(&self, point: Point3<f32>) -> f32;
}

impl Drawable for Chunk {
    fn draw(&self, renderer: &mut dyn MeshRenderer) {
        let mesh = self.mesh();
        if !mesh.opaque.is_empty() {
            renderer.render_vertex_buffer(self.origin(), &mesh.opaque, mesh.opaque_face_count());
        }
    }

    fn draw_translucent(&self, renderer: &mut dyn MeshRenderer) {
        let mesh = self.mesh();
        if !mesh.translucent.is_empty() {
            renderer.render_vertex_buffer(
                self.origin(),
                &mesh.translucent,
                mesh.translucent_face_count(),
            );
        }
    }

    fn position(&self) -> Point3<f32> {
        self.origin()
    }

    fn distance_to(&self, point: Point3<f32>) -> f32 {
        Chunk::distance_to(self, point)
    }
}

/// Counters from one [`render_world`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Chunks within range that had a committed mesh.
    pub chunks_drawn: usize,
    /// Opaque quads handed to the renderer.
    pub opaque_faces: usize,
    /// Translucent quads handed to the renderer.
    pub translucent_faces: usize,
}

/// Draws every built chunk whose centre is within `view_distance` of `eye`.
pub fn render_world(
    world: &World,
    eye: Point3<f32>,
    view_distance: f32,
    renderer: &mut dyn MeshRenderer,
) -> RenderStats {
    let chunks: Vec<_> = world
        .chunk_indices()
        .into_iter()
        .filter_map(|index| world.chunk(index))
        .collect();

    let mut visible: Vec<(f32, _)> = chunks
        .iter()
        .map(|chunk| chunk.get())
        .filter(|chunk| chunk.is_built())
        .map(|chunk| (Drawable::distance_to(&*chunk, eye), chunk))
        .filter(|(distance, _)| *distance <= view_distance)
        .collect();
    visible.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut stats = RenderStats {
        chunks_drawn: visible.len(),
        ..RenderStats::default()
    };
    for (_, chunk) in &visible {
        chunk.draw(renderer);
        stats.opaque_faces += chunk.mesh().opaque_face_count();
    }
    for (_, chunk) in visible.iter().rev() {
        chunk.draw_translucent(renderer);
        stats.translucent_faces += chunk.mesh().translucent_face_count();
    }
    stats
}
