//! Per-stage runtime: one bounded channel, one worker thread, one transform.
//!
//! A [`Stage`] owns the channel its work arrives on and the worker thread
//! that drains it. The worker loop consumes, transforms, and forwards until
//! it observes the end-of-stream sentinel, then signals the channel's
//! finished latch so the orchestrator can join it.
//!
//! Stages are handle-owned values: initializing the same stage kind twice
//! yields two fully independent instances, so a pipeline like
//! `logger logger` is legal.

pub mod transform;
pub mod transforms;

pub use transform::{AnyTransform, BuiltinTransform, Transform};

use crate::config::SENTINEL;
use crate::error::{PipelineError, Result};
use crate::sync::Channel;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

/// Lifecycle of a stage's worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StageState {
    Idle = 0,
    Running = 1,
    /// The sentinel has been observed and is being forwarded.
    Draining = 2,
    Finished = 3,
}

/// Atomic holder for [`StageState`], shared between the worker thread, the
/// stage handle, and every [`Intake`] clone.
pub struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        Self(AtomicU8::new(StageState::Idle as u8))
    }

    fn set(&self, state: StageState) {
        self.0.store(state as u8, Ordering::Release);
    }

    pub fn get(&self) -> StageState {
        match self.0.load(Ordering::Acquire) {
            0 => StageState::Idle,
            1 => StageState::Running,
            2 => StageState::Draining,
            _ => StageState::Finished,
        }
    }

    /// Whether the stage still accepts new work. False from the moment the
    /// worker observes the sentinel.
    pub fn is_accepting(&self) -> bool {
        matches!(self.get(), StageState::Idle | StageState::Running)
    }
}

/// The enqueue capability of a stage: its `place_work` operation as a
/// cloneable value. Handed to the upstream stage at wire time and to the
/// orchestrator for feeding external input.
#[derive(Clone)]
pub struct Intake {
    stage: Arc<str>,
    channel: Arc<Channel>,
    state: Arc<StateCell>,
}

impl Intake {
    /// Copies `line` into the stage's queue, blocking while it is full.
    ///
    /// Rejected once the stage has observed the sentinel: a late producer
    /// gets an error instead of a string sitting forever in a drained
    /// queue.
    pub fn place_work(&self, line: &str) -> Result<()> {
        if !self.state.is_accepting() {
            return Err(PipelineError::StageFinished {
                stage: self.stage.to_string(),
            });
        }
        self.channel.put(line)?;
        Ok(())
    }

    pub fn stage_name(&self) -> &str {
        &self.stage
    }
}

/// A running pipeline stage.
pub struct Stage {
    name: Arc<str>,
    channel: Arc<Channel>,
    state: Arc<StateCell>,
    downstream: Arc<OnceLock<Intake>>,
    worker: Option<JoinHandle<()>>,
}

impl Stage {
    /// Creates the stage's channel, moves `transform` into a freshly
    /// spawned worker thread, and transitions the stage to `Running`.
    pub fn spawn(name: &str, transform: AnyTransform, queue_capacity: usize) -> Result<Self> {
        let name: Arc<str> = Arc::from(name);
        let channel = Arc::new(Channel::new(queue_capacity)?);
        let state = Arc::new(StateCell::new());
        let downstream: Arc<OnceLock<Intake>> = Arc::new(OnceLock::new());

        state.set(StageState::Running);
        let worker = thread::Builder::new()
            .name(format!("stage-{name}"))
            .spawn({
                let name = name.clone();
                let channel = channel.clone();
                let state = state.clone();
                let downstream = downstream.clone();
                move || worker_loop(&name, &channel, &downstream, &state, transform)
            })?;

        tracing::debug!(stage = %name, queue_capacity, "stage initialized");
        Ok(Self {
            name,
            channel,
            state,
            downstream,
            worker: Some(worker),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> StageState {
        self.state.get()
    }

    /// This stage's enqueue capability.
    pub fn intake(&self) -> Intake {
        Intake {
            stage: self.name.clone(),
            channel: self.channel.clone(),
            state: self.state.clone(),
        }
    }

    /// Stores the downstream intake the worker forwards into. May be called
    /// at most once, strictly before any input flows.
    pub fn attach(&self, next: Intake) -> Result<()> {
        self.downstream
            .set(next)
            .map_err(|_| PipelineError::Wire {
                stage: self.name.to_string(),
                message: "downstream already attached".to_string(),
            })
    }

    /// Blocks until this stage's worker has exited its consume loop.
    pub fn wait_finished(&self) -> Result<()> {
        self.channel
            .wait_finished()
            .map_err(|e| PipelineError::Drain {
                stage: self.name.to_string(),
                message: e.to_string(),
            })
    }

    /// Joins the worker thread and releases the stage's resources.
    ///
    /// Must only be called after the worker has observed the sentinel
    /// (otherwise the join blocks indefinitely); the orchestrator
    /// guarantees that ordering by draining first.
    pub fn finalize(mut self) -> Result<()> {
        if let Some(worker) = self.worker.take() {
            worker.join().map_err(|_| PipelineError::Teardown {
                stage: self.name.to_string(),
                message: "worker thread panicked".to_string(),
            })?;
        }
        tracing::debug!(stage = %self.name, "stage finalized");
        Ok(())
    }
}

/// The consume-transform-forward loop, one per stage.
fn worker_loop(
    name: &str,
    channel: &Channel,
    downstream: &OnceLock<Intake>,
    state: &StateCell,
    mut transform: AnyTransform,
) {
    loop {
        let line = match channel.get() {
            Ok(line) => line,
            Err(e) => {
                // Abnormal but non-crashing: stop consuming and report
                // finished so the orchestrator does not hang.
                tracing::error!(stage = %name, error = %e, "queue wait failed; stopping worker");
                break;
            }
        };

        if line == SENTINEL {
            state.set(StageState::Draining);
            forward(name, downstream, SENTINEL);
            break;
        }

        match transform.apply(&line) {
            Some(out) => forward(name, downstream, &out),
            None => {
                // The item is dropped; the pipeline is not aborted.
                tracing::warn!(stage = %name, "transform produced no result; dropping item");
            }
        }
    }

    state.set(StageState::Finished);
    channel.signal_finished();
    tracing::debug!(stage = %name, "worker exited");
}

/// Best-effort forwarding: a downstream failure is logged, never retried,
/// and never aborts this stage's loop.
fn forward(name: &str, downstream: &OnceLock<Intake>, line: &str) {
    if let Some(next) = downstream.get() {
        if let Err(e) = next.place_work(line) {
            tracing::error!(stage = %name, error = %e, "failed to forward downstream");
        }
    }
}
