//! Integration tests for whole-pipeline behavior
//!
//! These tests validate the complete orchestration workflow:
//! - End-to-end flow through one or more stages
//! - Order preservation under small queue capacities
//! - Initialization rollback
//! - Sentinel handling at the boundaries

use linepipe::{AnyTransform, Pipeline, PipelineError, StageRegistry, Transform, SENTINEL};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Records every line it sees and passes it through unchanged.
struct CaptureTransform {
    seen: Arc<Mutex<Vec<String>>>,
}

impl Transform for CaptureTransform {
    fn name(&self) -> &str {
        "capture"
    }

    fn apply(&mut self, input: &str) -> Option<String> {
        self.seen.lock().unwrap().push(input.to_owned());
        Some(input.to_owned())
    }
}

/// Flags when its worker drops it, i.e. when the stage was finalized.
struct TrackedTransform {
    finalized: Arc<AtomicBool>,
}

impl Transform for TrackedTransform {
    fn name(&self) -> &str {
        "tracked"
    }

    fn apply(&mut self, input: &str) -> Option<String> {
        Some(input.to_owned())
    }
}

impl Drop for TrackedTransform {
    fn drop(&mut self) {
        self.finalized.store(true, Ordering::SeqCst);
    }
}

fn registry_with_capture(seen: Arc<Mutex<Vec<String>>>) -> StageRegistry {
    let mut registry = StageRegistry::with_builtins();
    registry.register("capture", move || {
        Ok(AnyTransform::Custom(Box::new(CaptureTransform {
            seen: seen.clone(),
        })))
    });
    registry
}

#[test]
fn single_passthrough_stage_end_to_end() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_capture(seen.clone());

    let input = Cursor::new("hello\n<END>\n".to_owned());
    Pipeline::run(&registry, &["capture".to_string()], 1, input).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["hello"]);
}

#[test]
fn order_is_preserved_across_stages() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_capture(seen.clone());

    let names = vec!["uppercaser".to_string(), "capture".to_string()];
    let input = Cursor::new("alpha\nbeta\ngamma\n<END>\n".to_owned());
    Pipeline::run(&registry, &names, 1, input).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["ALPHA", "BETA", "GAMMA"]);
}

#[test]
fn same_stage_kind_can_appear_twice() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_capture(seen.clone());

    let names = vec!["capture".to_string(), "capture".to_string()];
    let input = Cursor::new("once\n<END>\n".to_owned());
    Pipeline::run(&registry, &names, 2, input).unwrap();

    // Both instances record the line independently.
    assert_eq!(*seen.lock().unwrap(), vec!["once", "once"]);
}

#[test]
fn eof_without_sentinel_still_shuts_down() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_capture(seen.clone());

    let input = Cursor::new("no terminator here".to_owned());
    Pipeline::run(&registry, &["capture".to_string()], 4, input).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["no terminator here"]);
}

#[test]
fn sentinel_never_reaches_a_transform() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_capture(seen.clone());

    let input = Cursor::new("x\n<END>\nafter\n".to_owned());
    Pipeline::run(&registry, &["capture".to_string()], 4, input).unwrap();

    // Feeding stopped at the sentinel and the transform never saw it.
    assert_eq!(*seen.lock().unwrap(), vec!["x"]);
    assert!(!seen.lock().unwrap().iter().any(|line| line == SENTINEL));
}

#[test]
fn failed_init_rolls_back_earlier_stages() {
    let first_finalized = Arc::new(AtomicBool::new(false));
    let second_finalized = Arc::new(AtomicBool::new(false));

    let mut registry = StageRegistry::with_builtins();
    {
        let flag = first_finalized.clone();
        registry.register("tracked-a", move || {
            Ok(AnyTransform::Custom(Box::new(TrackedTransform {
                finalized: flag.clone(),
            })))
        });
    }
    {
        let flag = second_finalized.clone();
        registry.register("tracked-b", move || {
            Ok(AnyTransform::Custom(Box::new(TrackedTransform {
                finalized: flag.clone(),
            })))
        });
    }
    registry.register("boom", || Err("simulated init failure".to_string()));

    let names = vec![
        "tracked-a".to_string(),
        "tracked-b".to_string(),
        "boom".to_string(),
    ];
    let loaded = Pipeline::load(&registry, &names).unwrap();
    let err = Pipeline::init(&loaded, 2).unwrap_err();

    match &err {
        PipelineError::Init { stage, message } => {
            assert_eq!(stage, "boom");
            assert!(message.contains("simulated init failure"));
        }
        other => panic!("expected Init error, got {other}"),
    }
    assert_eq!(err.exit_code(), 2);

    // Both previously initialized stages were finalized: their workers
    // exited and dropped the transforms.
    assert!(first_finalized.load(Ordering::SeqCst));
    assert!(second_finalized.load(Ordering::SeqCst));
}

#[test]
fn unknown_stage_fails_before_anything_starts() {
    let registry = StageRegistry::with_builtins();
    let names = vec!["logger".to_string(), "mystery".to_string()];
    let err = Pipeline::load(&registry, &names).unwrap_err();
    assert!(matches!(err, PipelineError::Load { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn builtin_transforms_compose() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_capture(seen.clone());

    // uppercaser then rotator: "hello" -> "HELLO" -> "OHELL"
    let names = vec![
        "uppercaser".to_string(),
        "rotator".to_string(),
        "capture".to_string(),
    ];
    let input = Cursor::new("hello\n<END>\n".to_owned());
    Pipeline::run(&registry, &names, 3, input).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["OHELL"]);
}

#[test]
fn empty_lines_flow_through() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = registry_with_capture(seen.clone());

    let input = Cursor::new("\n\n<END>\n".to_owned());
    Pipeline::run(&registry, &["capture".to_string()], 2, input).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["", ""]);
}
