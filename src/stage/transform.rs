//! Transform abstraction for stages.
//!
//! Two-layer design:
//! - **`Transform` trait** — for user-registered stages and test doubles.
//! - **`BuiltinTransform` enum** — for the shipped stages; the compiler can
//!   inline match arms, so the hot path pays no dynamic dispatch.
//!
//! `AnyTransform` wraps either variant so the worker loop handles both
//! uniformly.

use crate::stage::transforms::{
    ExpanderTransform, FlipperTransform, LoggerTransform, RotatorTransform, TypewriterTransform,
    UppercaserTransform,
};

/// One stage's per-item string transform.
///
/// A transform is a pure function over a single line; it never sees the
/// end-of-stream sentinel (the worker loop intercepts it first) and has no
/// concurrency concerns of its own.
pub trait Transform: Send {
    /// Human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Produces the transformed line, or `None` if no result could be
    /// produced for this item. A `None` is logged by the worker and the
    /// item is dropped; the stage keeps running.
    fn apply(&mut self, input: &str) -> Option<String>;
}

/// Enum dispatch for the shipped stages.
pub enum BuiltinTransform {
    Uppercaser(UppercaserTransform),
    Flipper(FlipperTransform),
    Rotator(RotatorTransform),
    Expander(ExpanderTransform),
    Typewriter(TypewriterTransform),
    Logger(LoggerTransform),
}

impl BuiltinTransform {
    pub fn name(&self) -> &str {
        match self {
            BuiltinTransform::Uppercaser(t) => t.name(),
            BuiltinTransform::Flipper(t) => t.name(),
            BuiltinTransform::Rotator(t) => t.name(),
            BuiltinTransform::Expander(t) => t.name(),
            BuiltinTransform::Typewriter(t) => t.name(),
            BuiltinTransform::Logger(t) => t.name(),
        }
    }

    pub fn apply(&mut self, input: &str) -> Option<String> {
        match self {
            BuiltinTransform::Uppercaser(t) => t.apply(input),
            BuiltinTransform::Flipper(t) => t.apply(input),
            BuiltinTransform::Rotator(t) => t.apply(input),
            BuiltinTransform::Expander(t) => t.apply(input),
            BuiltinTransform::Typewriter(t) => t.apply(input),
            BuiltinTransform::Logger(t) => t.apply(input),
        }
    }
}

/// Wrapper holding either a built-in transform (enum dispatch) or a
/// registered one (trait object).
pub enum AnyTransform {
    Builtin(BuiltinTransform),
    Custom(Box<dyn Transform>),
}

impl AnyTransform {
    pub fn name(&self) -> &str {
        match self {
            AnyTransform::Builtin(t) => t.name(),
            AnyTransform::Custom(t) => t.name(),
        }
    }

    pub fn apply(&mut self, input: &str) -> Option<String> {
        match self {
            AnyTransform::Builtin(t) => t.apply(input),
            AnyTransform::Custom(t) => t.apply(input),
        }
    }
}
