//! Lifecycle hook chains
//!
//! ## Design
//!
//! Hooks are ordered lists of callables the lifecycle invokes at fixed
//! points: before/after save, before/after create (wrapping only the
//! first save of a new record), before/after destroy. A before-hook may
//! return [`HookOutcome::Halt`] to stop the operation; the lifecycle
//! then reports [`Outcome::Halted`] instead of erroring. Validation and
//! business rules belong to the framework that registers the hooks, not
//! to this core.

use crate::record::Record;
use std::sync::Arc;

/// What one hook decides about the operation in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// Keep going
    Continue,
    /// Stop the operation; later hooks in this chain do not run
    Halt,
}

/// How a hooked operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation ran to completion
    Completed,
    /// A before-hook halted the operation; no store write happened
    Halted,
}

impl Outcome {
    /// Whether the operation completed
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// One registered hook
pub type Hook = Arc<dyn Fn(&mut Record) -> HookOutcome + Send + Sync>;

/// The hook point a callable is registered at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    BeforeSave,
    AfterSave,
    BeforeCreate,
    AfterCreate,
    BeforeDestroy,
    AfterDestroy,
}

/// Ordered hook chains for one record type
#[derive(Clone, Default)]
pub struct Hooks {
    before_save: Vec<Hook>,
    after_save: Vec<Hook>,
    before_create: Vec<Hook>,
    after_create: Vec<Hook>,
    before_destroy: Vec<Hook>,
    after_destroy: Vec<Hook>,
}

impl Hooks {
    /// Empty chains
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook at the given point, in registration order
    pub fn register(
        &mut self,
        point: HookPoint,
        hook: impl Fn(&mut Record) -> HookOutcome + Send + Sync + 'static,
    ) -> &mut Self {
        self.chain_mut(point).push(Arc::new(hook));
        self
    }

    /// Run the chain at `point`; stops at the first [`HookOutcome::Halt`]
    pub(crate) fn run(&self, point: HookPoint, record: &mut Record) -> HookOutcome {
        for hook in self.chain(point) {
            if hook(record) == HookOutcome::Halt {
                return HookOutcome::Halt;
            }
        }
        HookOutcome::Continue
    }

    fn chain(&self, point: HookPoint) -> &[Hook] {
        match point {
            HookPoint::BeforeSave => &self.before_save,
            HookPoint::AfterSave => &self.after_save,
            HookPoint::BeforeCreate => &self.before_create,
            HookPoint::AfterCreate => &self.after_create,
            HookPoint::BeforeDestroy => &self.before_destroy,
            HookPoint::AfterDestroy => &self.after_destroy,
        }
    }

    fn chain_mut(&mut self, point: HookPoint) -> &mut Vec<Hook> {
        match point {
            HookPoint::BeforeSave => &mut self.before_save,
            HookPoint::AfterSave => &mut self.after_save,
            HookPoint::BeforeCreate => &mut self.before_create,
            HookPoint::AfterCreate => &mut self.after_create,
            HookPoint::BeforeDestroy => &mut self.before_destroy,
            HookPoint::AfterDestroy => &mut self.after_destroy,
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("before_save", &self.before_save.len())
            .field("after_save", &self.after_save.len())
            .field("before_create", &self.before_create.len())
            .field("after_create", &self.after_create.len())
            .field("before_destroy", &self.before_destroy.len())
            .field("after_destroy", &self.after_destroy.len())
            .finish()
    }
}
