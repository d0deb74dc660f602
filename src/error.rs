//! Error handling for the pipeline.
//!
//! One taxonomy covers every orchestration-level failure; each variant maps
//! onto the process exit-code contract via [`PipelineError::exit_code`].
//! Per-item transform failures are deliberately absent: a transform that
//! cannot produce a result for one line is logged and absorbed inside the
//! stage's worker loop, and the pipeline keeps running.

use crate::sync::ChannelError;
use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed command line or an empty pipeline.
    #[error("usage error: {0}")]
    Usage(String),

    /// A requested stage name could not be resolved.
    #[error("failed to load stage '{stage}': {message}")]
    Load { stage: String, message: String },

    /// A stage's init failed; previously initialized stages were rolled
    /// back in reverse order.
    #[error("stage '{stage}' failed to initialize: {message}")]
    Init { stage: String, message: String },

    /// Wiring misuse, e.g. attaching a downstream twice.
    #[error("failed to wire stage '{stage}': {message}")]
    Wire { stage: String, message: String },

    /// Reading external input or spawning a worker thread failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A queue operation failed at the primitive level.
    #[error("queue error: {0}")]
    Channel(#[from] ChannelError),

    /// Work was placed into a stage that has already observed the sentinel.
    #[error("stage '{stage}' is no longer accepting work")]
    StageFinished { stage: String },

    /// Waiting for a stage to drain failed.
    #[error("failed while waiting for stage '{stage}' to finish: {message}")]
    Drain { stage: String, message: String },

    /// Finalizing a stage failed.
    #[error("failed to finalize stage '{stage}': {message}")]
    Teardown { stage: String, message: String },
}

impl PipelineError {
    /// Process exit code for this failure: 2 for a stage initialization
    /// failure (after rollback), 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Init { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_failures_map_to_exit_code_2() {
        let err = PipelineError::Init {
            stage: "rotator".to_string(),
            message: "queue capacity must be at least 1".to_string(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn other_failures_map_to_exit_code_1() {
        let err = PipelineError::Load {
            stage: "missing".to_string(),
            message: "unknown stage".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        let err = PipelineError::Usage("no stages".to_string());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn messages_name_the_failing_stage() {
        let err = PipelineError::Drain {
            stage: "flipper".to_string(),
            message: "poisoned".to_string(),
        };
        assert!(err.to_string().contains("flipper"));
    }
}
