//! # Voxel Engine Core
//!
//! This module contains the voxel data model: what a cell can hold, how cells are
//! grouped into chunks, how chunks are indexed into a world, and how new chunks are
//! generated.
//!
//! ## Architecture
//!
//! * **Voxel**: the closed catalog of voxel types, their properties and atlas cells
//! * **Chunk**: fixed 30x90x30 columns of cells with lifecycle flags and mesh buffers
//! * **World**: the sparse chunk index and world-space queries
//! * **Generation**: seeded procedural terrain, ores and foliage
//! * **Tasks**: deferred chunk generation
//!
//! ## Data Flow
//!
//! 1. A generation task fills a new chunk off the main thread
//! 2. The main thread registers it and marks its neighbours dirty
//! 3. Dirty chunks get mesh tasks; their results are committed on the main thread
//! 4. Block breaking mutates a chunk and rebuilds its mesh immediately
//!
//! ## Thread Safety
//!
//! Chunks are shared as `MtResource<Chunk>`. Workers only take read guards; every
//! write (registration, dirty flags, mesh commits, block breaking) happens on the
//! main thread.

pub mod chunk;
pub mod coordinates;
pub mod generation;
pub mod tasks;
pub mod voxel;
pub mod world;
