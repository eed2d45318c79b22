//! # Voxel Task System
//!
//! Tasks related to voxel world generation, processed through the deferred work
//! queue so terrain generation never stalls the main loop.

pub mod chunk_generation_task;
