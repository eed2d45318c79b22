//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: builds a chunk mesh on a worker and commits it on the main thread

pub mod chunk_mesh_generation_task;
