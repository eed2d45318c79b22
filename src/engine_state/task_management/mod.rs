//! # Task Management System
//!
//! A deferred work queue that runs chunk generation and meshing on a small pool of
//! worker threads, and applies their results on the main thread.
//!
//! ## Architecture Overview
//! - `TaskManager`: owns the FIFO queue and the worker channels
//! - `Task`: a unit of work that can run off the main thread
//! - `TaskResult`: the outcome of a task, which can spawn follow-up tasks
//! - `TaskChannel`: the pair of channels linking the main thread to one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are queued via `TaskManager::publish_task()`
//! 2. `run_up_to(n)` dispatches at most `n` of them, oldest first, round-robin
//!    across workers that have room
//! 3. Workers process tasks and send results back
//! 4. `process_completed_tasks()` applies results on the main thread
//! 5. Follow-up tasks join the back of the queue
//!
//! With zero workers (or once every worker has gone away) `run_up_to` runs tasks
//! inline on the calling thread, and their results wait for the next
//! `process_completed_tasks()` exactly as worker results do.

pub mod task;

use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{debug, error, info};
use task::{Task, TaskResult};

use super::context::EngineContext;

/// A communication channel between the main thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from main thread to worker
/// - `result_receiver`: Receives task results from worker
/// - `num_tasks_in_flight`: Tasks sent but not yet collected
/// - `connected`: Cleared once either end of the channel is found closed
/// - `_worker`: Handle to the worker thread
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task>>,
    result_receiver: Receiver<Box<dyn TaskResult>>,
    num_tasks_in_flight: usize,
    connected: bool,
    _worker: JoinHandle<()>,
}

impl TaskChannel {
    fn has_room(&self) -> bool {
        self.connected && self.num_tasks_in_flight < MAX_TASKS_IN_FLIGHT
    }

    fn disconnect(&mut self, worker: usize) {
        if self.num_tasks_in_flight > 0 {
            error!(
                "Worker {} went away with {} task(s) in flight",
                worker, self.num_tasks_in_flight
            );
        }
        self.connected = false;
        self.num_tasks_in_flight = 0;
    }
}

/// Manages a pool of worker threads and the queue of tasks waiting for them.
///
/// # Fields
/// - `channels`: One channel per worker
/// - `queued_tasks`: Tasks waiting to be dispatched, oldest first
/// - `inline_results`: Results of tasks run on the calling thread
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task>>,
    inline_results: VecDeque<Box<dyn TaskResult>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 4;

impl TaskManager {
    /// Creates a new `TaskManager` with `num_workers` worker threads.
    ///
    /// Zero workers is valid and makes every task run inline.
    ///
    /// # Errors
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn new(num_workers: usize) -> io::Result<Self> {
        let mut channels = Vec::with_capacity(num_workers);

        for worker in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let handle = thread::Builder::new()
                .name(format!("voxel-worker-{worker}"))
                .spawn(task_closure)?;

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                connected: true,
                _worker: handle,
            });
        }

        info!(
            "Task manager started with {} worker(s) (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        Ok(TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            inline_results: VecDeque::new(),
            current_channel: 0,
        })
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was handed to the worker
    /// - `Err(task)` if the worker has gone away
    fn try_send_task(
        &mut self,
        task: Box<dyn Task>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task>> {
        let channel = &mut self.channels[channel_idx];
        match channel.task_sender.send(task) {
            Ok(()) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(err) => {
                channel.disconnect(channel_idx);
                Err(err.0)
            }
        }
    }

    /// Finds a connected worker channel with room, round-robin from the last used one.
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|step| (self.current_channel + step) % len)
            .find(|&idx| self.channels[idx].has_room())
    }

    fn has_live_workers(&self) -> bool {
        self.channels.iter().any(|channel| channel.connected)
    }

    /// Appends a task to the back of the queue. Nothing runs until `run_up_to`.
    pub fn publish_task(&mut self, task: Box<dyn Task>) {
        self.queued_tasks.push_back(task);
    }

    /// Appends several tasks, preserving their order.
    pub fn publish_tasks<I>(&mut self, tasks: I)
    where
        I: IntoIterator<Item = Box<dyn Task>>,
    {
        self.queued_tasks.extend(tasks);
    }

    /// Dispatches at most `n` queued tasks, oldest first.
    ///
    /// Stops early when every worker is at `MAX_TASKS_IN_FLIGHT`. Without live
    /// workers the tasks are processed right here.
    ///
    /// # Returns
    /// How many tasks were dispatched (or run inline).
    pub fn run_up_to(&mut self, n: usize) -> usize {
        let mut dispatched = 0;

        while dispatched < n {
            if !self.has_live_workers() {
                let Some(task) = self.queued_tasks.pop_front() else {
                    break;
                };
                self.inline_results.push_back(task.process());
                dispatched += 1;
                continue;
            }

            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(()) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    dispatched += 1;
                }
                Err(task) => self.queued_tasks.push_front(task),
            }
        }

        if dispatched > 0 {
            debug!(
                "Dispatched {} task(s), {} still queued",
                dispatched,
                self.queued_tasks.len()
            );
        }
        dispatched
    }

    /// Applies every result that is ready, without blocking.
    ///
    /// Follow-up tasks returned by the results are queued.
    ///
    /// # Returns
    /// How many results were applied.
    pub fn process_completed_tasks(&mut self, context: &mut EngineContext) -> usize {
        let mut results: Vec<Box<dyn TaskResult>> = self.inline_results.drain(..).collect();

        for (idx, channel) in self.channels.iter_mut().enumerate() {
            if !channel.connected {
                continue;
            }
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight = channel.num_tasks_in_flight.saturating_sub(1);
                        results.push(result);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        channel.disconnect(idx);
                        break;
                    }
                }
            }
        }

        self.apply_results(results, context)
    }

    /// Blocks until at least one result is available, then applies all ready results.
    ///
    /// Returns immediately with `0` when nothing is pending anywhere.
    pub fn wait_for_completed(&mut self, context: &mut EngineContext) -> usize {
        if self.inline_results.is_empty() {
            let busy = self
                .channels
                .iter()
                .position(|channel| channel.connected && channel.num_tasks_in_flight > 0);
            if let Some(idx) = busy {
                let channel = &mut self.channels[idx];
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        let applied = self.apply_results(vec![result], context);
                        return applied + self.process_completed_tasks(context);
                    }
                    Err(_) => channel.disconnect(idx),
                }
            }
        }
        self.process_completed_tasks(context)
    }

    fn apply_results(
        &mut self,
        results: Vec<Box<dyn TaskResult>>,
        context: &mut EngineContext,
    ) -> usize {
        let applied = results.len();
        for result in results {
            let follow_ups = result.handle_result(context);
            self.queued_tasks.extend(follow_ups);
        }
        applied
    }

    /// Tasks waiting to be dispatched.
    pub fn queued(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Tasks dispatched whose results have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.inline_results.len()
            + self
                .channels
                .iter()
                .map(|channel| channel.num_tasks_in_flight)
                .sum::<usize>()
    }

    /// Whether no task is queued, running, or waiting to be applied.
    pub fn is_idle(&self) -> bool {
        self.queued() == 0 && self.in_flight() == 0
    }

    /// Number of workers still accepting tasks.
    pub fn live_workers(&self) -> usize {
        self.channels.iter().filter(|channel| channel.connected).count()
    }
}
