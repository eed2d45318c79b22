//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the deferred work queue.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and queued via `TaskManager::publish_task()`
//! 2. `TaskManager::run_up_to()` hands it to a worker (or runs it inline)
//! 3. The task's `process()` method returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the main thread
//! 5. The result may return follow-up tasks, which join the back of the queue
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker thread
//! - `TaskResult` must be `Send` to be transferred back to the main thread
//! - Work that touches rendering-visible state belongs in `handle_result()`

use crate::engine_state::context::EngineContext;

/// A unit of work that can run off the main thread.
///
/// Tasks should own (or share through `MtResource`) everything they read, and only
/// ever take read guards on shared voxel data.
pub trait Task: Send {
    /// Performs the work and returns the result to apply on the main thread.
    ///
    /// Runs on a worker thread, or inline when the manager has no workers.
    fn process(&self) -> Box<dyn TaskResult>;
}

/// The outcome of a `Task`, applied on the main thread.
pub trait TaskResult: Send {
    /// Applies the result to engine state.
    ///
    /// # Returns
    /// Follow-up tasks to queue (can be empty).
    fn handle_result(self: Box<Self>, context: &mut EngineContext) -> Vec<Box<dyn Task>>;
}
