//! Stage loading: resolves stage names to capability bundles.
//!
//! The registry is assembled once at startup; `load` binds a name to its
//! transform factory in a [`LoadedStage`], and every later operation goes
//! through that value — no name lookup happens after the load step. Unknown
//! names fail before any stage has been initialized, so there is nothing to
//! roll back.

use crate::error::{PipelineError, Result};
use crate::stage::transforms::{
    ExpanderTransform, FlipperTransform, LoggerTransform, RotatorTransform, TypewriterTransform,
    UppercaserTransform,
};
use crate::stage::{AnyTransform, BuiltinTransform, Stage};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds one transform instance for a stage. Returns an error message on
/// failure, which surfaces as that stage's init failure.
type TransformFactory =
    Arc<dyn Fn() -> std::result::Result<AnyTransform, String> + Send + Sync>;

/// A stage name bound to its transform factory; produced by
/// [`StageRegistry::load`].
pub struct LoadedStage {
    name: String,
    factory: TransformFactory,
}

impl LoadedStage {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instantiates the transform and spawns the stage with the shared
    /// queue capacity.
    pub fn init(&self, queue_capacity: usize) -> Result<Stage> {
        let transform = (self.factory)().map_err(|message| PipelineError::Init {
            stage: self.name.clone(),
            message,
        })?;
        Stage::spawn(&self.name, transform, queue_capacity)
    }
}

/// Name → factory table for the stages a pipeline may be built from.
pub struct StageRegistry {
    factories: HashMap<String, TransformFactory>,
}

impl StageRegistry {
    /// An empty registry. Most callers want [`with_builtins`].
    ///
    /// [`with_builtins`]: StageRegistry::with_builtins
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry pre-populated with the six shipped stages.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("uppercaser", || {
            Ok(AnyTransform::Builtin(BuiltinTransform::Uppercaser(
                UppercaserTransform,
            )))
        });
        registry.register("flipper", || {
            Ok(AnyTransform::Builtin(BuiltinTransform::Flipper(
                FlipperTransform,
            )))
        });
        registry.register("rotator", || {
            Ok(AnyTransform::Builtin(BuiltinTransform::Rotator(
                RotatorTransform,
            )))
        });
        registry.register("expander", || {
            Ok(AnyTransform::Builtin(BuiltinTransform::Expander(
                ExpanderTransform,
            )))
        });
        registry.register("typewriter", || {
            Ok(AnyTransform::Builtin(BuiltinTransform::Typewriter(
                TypewriterTransform,
            )))
        });
        registry.register("logger", || {
            Ok(AnyTransform::Builtin(BuiltinTransform::Logger(
                LoggerTransform,
            )))
        });
        registry
    }

    /// Registers (or replaces) a stage factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> std::result::Result<AnyTransform, String> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Resolves `name` to a [`LoadedStage`], failing with the list of
    /// registered stages if it is unknown.
    pub fn load(&self, name: &str) -> Result<LoadedStage> {
        match self.factories.get(name) {
            Some(factory) => Ok(LoadedStage {
                name: name.to_string(),
                factory: factory.clone(),
            }),
            None => Err(PipelineError::Load {
                stage: name.to_string(),
                message: format!("unknown stage (available: {})", self.stage_names().join(", ")),
            }),
        }
    }

    /// Registered stage names, sorted.
    pub fn stage_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
