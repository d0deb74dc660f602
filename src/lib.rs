//! # linepipe: a pluggable text-line pipeline
//!
//! Text lines enter at stage 0 and flow stage-to-stage through bounded
//! blocking queues until the end-of-stream sentinel (`<END>`) passes
//! through, at which point every stage drains, reports completion, and is
//! torn down in reverse order.
//!
//! ## Architecture
//!
//! - **Sync primitives**: a manual-reset [`Latch`] (mutex + condvar + flag)
//!   and the bounded [`Channel`] built from one mutex and three latches
//! - **Stages**: one worker thread per stage consuming its own channel,
//!   applying a [`Transform`], and forwarding downstream
//! - **Orchestration**: [`Pipeline`] sequences load, init (with rollback),
//!   wire, feed, drain, and teardown
//! - **Registry**: [`StageRegistry`] resolves stage names to transform
//!   factories at load time
//!
//! ## Example
//!
//! ```ignore
//! use linepipe::{Pipeline, StageRegistry};
//! use std::io;
//!
//! fn main() -> linepipe::Result<()> {
//!     let registry = StageRegistry::with_builtins();
//!     let names = vec!["uppercaser".to_string(), "logger".to_string()];
//!     let stdin = io::stdin();
//!     Pipeline::run(&registry, &names, 20, stdin.lock())
//! }
//! ```
//!
//! Backpressure falls out of the queue bound: a worker forwarding into a
//! full downstream queue blocks in its own consume loop, stalling every
//! earlier stage first-in-first-served. The only termination signal is the
//! sentinel flowing through the data path; all waits are unbounded.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod stage;
pub mod sync;

// Re-export commonly used types
pub use config::{MAX_LINE_LEN, SENTINEL};
pub use error::{PipelineError, Result};
pub use pipeline::Pipeline;
pub use registry::{LoadedStage, StageRegistry};
pub use stage::{AnyTransform, BuiltinTransform, Intake, Stage, StageState, Transform};
pub use sync::{Channel, Latch};
