//! Pipeline orchestration.
//!
//! The orchestrator drives six strictly ordered steps across N stages, each
//! step's failure aborting the rest:
//!
//! 1. **Load** every requested stage name through the registry.
//! 2. **Initialize** each stage in order with the shared queue capacity;
//!    a failure rolls back every already-initialized stage in reverse.
//! 3. **Wire** each stage's downstream to the next stage's intake.
//! 4. **Feed** external input line by line into stage 0.
//! 5. **Drain**: wait for every stage to observe the sentinel.
//! 6. **Teardown**: finalize every stage in reverse order.
//!
//! ```text
//! input ──► [stage 0] ──► [stage 1] ──► … ──► [stage N-1]
//! ```
//!
//! Backpressure needs no explicit signal: a worker forwarding into a full
//! downstream queue blocks inside its own consume loop, transitively
//! stalling every earlier stage.

pub mod input;

use crate::config::SENTINEL;
use crate::error::{PipelineError, Result};
use crate::registry::{LoadedStage, StageRegistry};
use crate::stage::Stage;
use input::BoundedLineReader;
use std::io::BufRead;

/// An ordered, immutable-after-wiring chain of running stages.
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Step 1: resolve every stage name. Nothing is initialized yet, so a
    /// failure here has nothing to roll back.
    pub fn load(registry: &StageRegistry, names: &[String]) -> Result<Vec<LoadedStage>> {
        names.iter().map(|name| registry.load(name)).collect()
    }

    /// Step 2: initialize every loaded stage in order.
    ///
    /// If stage *i* fails, stages `0..i` are finalized in reverse order and
    /// the error surfaces as an init failure naming the stage; stages after
    /// *i* are dropped untouched.
    pub fn init(loaded: &[LoadedStage], queue_capacity: usize) -> Result<Self> {
        let mut stages: Vec<Stage> = Vec::with_capacity(loaded.len());
        for loaded_stage in loaded {
            match loaded_stage.init(queue_capacity) {
                Ok(stage) => stages.push(stage),
                Err(e) => {
                    let err = match e {
                        e @ PipelineError::Init { .. } => e,
                        other => PipelineError::Init {
                            stage: loaded_stage.name().to_string(),
                            message: other.to_string(),
                        },
                    };
                    tracing::error!(stage = loaded_stage.name(), error = %err, "stage initialization failed; rolling back");
                    Self::rollback(stages);
                    return Err(err);
                }
            }
        }
        Ok(Self { stages })
    }

    /// Reverse-order finalization of already-initialized stages. Errors are
    /// logged, not propagated: the init failure that triggered the rollback
    /// is the one the caller reports.
    fn rollback(stages: Vec<Stage>) {
        for stage in stages.into_iter().rev() {
            // The worker is parked on its empty queue; it needs the
            // sentinel before it can be joined.
            if let Err(e) = stage.intake().place_work(SENTINEL) {
                tracing::error!(stage = stage.name(), error = %e, "failed to stop stage during rollback");
            }
            let name = stage.name().to_string();
            if let Err(e) = stage.finalize() {
                tracing::error!(stage = %name, error = %e, "finalize failed during rollback");
            }
        }
    }

    /// Step 3: attach each stage's downstream to the next stage's intake,
    /// for all but the last.
    pub fn wire(&self) -> Result<()> {
        for window in self.stages.windows(2) {
            window[0].attach(window[1].intake())?;
        }
        Ok(())
    }

    /// Step 4: read `input` line by line into stage 0.
    ///
    /// Feeding stops at the first line equal to the sentinel, which is
    /// forwarded like any other item. If input ends without a sentinel the
    /// orchestrator injects one so the pipeline still shuts down.
    pub fn feed<R: BufRead>(&self, input: R) -> Result<()> {
        let first = self
            .stages
            .first()
            .ok_or_else(|| PipelineError::Usage("pipeline has no stages".to_string()))?;
        let intake = first.intake();

        let mut reader = BoundedLineReader::new(input);
        let mut saw_sentinel = false;
        while let Some(line) = reader.next_line()? {
            intake.place_work(&line)?;
            if line == SENTINEL {
                saw_sentinel = true;
                break;
            }
        }
        if !saw_sentinel {
            tracing::debug!("input ended without sentinel; injecting one");
            intake.place_work(SENTINEL)?;
        }
        Ok(())
    }

    /// Step 5: block until every stage's worker has exited its loop.
    pub fn drain(&self) -> Result<()> {
        for stage in &self.stages {
            stage.wait_finished()?;
        }
        Ok(())
    }

    /// Step 6: finalize every stage in reverse order.
    pub fn teardown(self) -> Result<()> {
        for stage in self.stages.into_iter().rev() {
            stage.finalize()?;
        }
        Ok(())
    }

    /// Runs all six steps against `registry` with the given stage names.
    pub fn run<R: BufRead>(
        registry: &StageRegistry,
        names: &[String],
        queue_capacity: usize,
        input: R,
    ) -> Result<()> {
        let loaded = Self::load(registry, names)?;
        let pipeline = Self::init(&loaded, queue_capacity)?;
        pipeline.wire()?;
        pipeline.feed(input)?;
        pipeline.drain()?;
        pipeline.teardown()?;
        tracing::info!("pipeline shut down cleanly");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The running stages, in pipeline order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}
