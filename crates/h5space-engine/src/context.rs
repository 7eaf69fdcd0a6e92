//! The engine's error stack and logging toggle, under one lock.
//!
//! An [`EngineContext`] is created explicitly and torn down explicitly
//! with [`shutdown`](EngineContext::shutdown). Nothing here is a hidden
//! global, so tests can run side by side with one context each.

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::config::{ConfigError, ContextConfig};
use crate::target::EngineFault;

/// One captured engine fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Monotonic sequence number within the owning context.
    pub seq: u64,
    /// The engine operation that failed.
    pub operation: &'static str,
    /// What the engine reported.
    pub fault: EngineFault,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.seq, self.operation, self.fault)
    }
}

/// Errors from context construction or access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextError {
    /// A thread panicked while holding the context lock.
    Poisoned,
    /// The configuration failed validation.
    InvalidConfig(ConfigError),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poisoned => write!(f, "engine context lock poisoned"),
            Self::InvalidConfig(e) => write!(f, "invalid context config: {e}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            Self::Poisoned => None,
        }
    }
}

impl From<ConfigError> for ContextError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

impl<T> From<PoisonError<T>> for ContextError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

#[derive(Debug)]
struct ContextState {
    stack: VecDeque<ErrorRecord>,
    silenced: bool,
    /// Open [`EngineContext::silenced`] scopes.
    scoped: usize,
    dropped: u64,
    next_seq: u64,
}

impl ContextState {
    fn is_silenced(&self) -> bool {
        self.silenced || self.scoped > 0
    }
}

/// Closes one silencing scope when dropped, including during unwinding.
struct ScopeGuard<'a> {
    state: &'a Mutex<ContextState>,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.scoped -= 1;
    }
}

/// Process-wide engine error state: a bounded fault stack plus a switch
/// that suppresses fault logging.
///
/// Silencing only affects logging. Faults are always captured.
///
/// # Examples
///
/// ```
/// use h5space_engine::{ContextConfig, EngineContext, EngineFault};
///
/// let ctx = EngineContext::new(ContextConfig::default()).unwrap();
/// ctx.silenced(|| ctx.push("select_all", EngineFault::new(-1, "closed")))
///     .unwrap()
///     .unwrap();
/// assert_eq!(ctx.depth().unwrap(), 1);
/// assert_eq!(ctx.shutdown().len(), 1);
/// ```
#[derive(Debug)]
pub struct EngineContext {
    max_depth: usize,
    state: Mutex<ContextState>,
}

impl EngineContext {
    /// Validate `config` and create a context.
    pub fn new(config: ContextConfig) -> Result<Self, ContextError> {
        config.validate()?;
        debug!(
            max_stack_depth = config.max_stack_depth,
            silenced = config.start_silenced,
            "engine context created"
        );
        Ok(Self {
            max_depth: config.max_stack_depth,
            state: Mutex::new(ContextState {
                stack: VecDeque::with_capacity(config.max_stack_depth),
                silenced: config.start_silenced,
                scoped: 0,
                dropped: 0,
                next_seq: 0,
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ContextState>, ContextError> {
        Ok(self.state.lock()?)
    }

    /// Capture a fault and return the new stack depth.
    ///
    /// When the stack is full the oldest record is dropped. The fault is
    /// logged at `warn` level unless the context is silenced.
    pub fn push(&self, operation: &'static str, fault: EngineFault) -> Result<usize, ContextError> {
        let mut state = self.lock()?;
        if !state.is_silenced() {
            warn!(operation, code = fault.code, message = %fault.message, "engine fault");
        }
        if state.stack.len() == self.max_depth {
            state.stack.pop_front();
            state.dropped += 1;
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.stack.push_back(ErrorRecord {
            seq,
            operation,
            fault,
        });
        Ok(state.stack.len())
    }

    /// Current number of captured records.
    pub fn depth(&self) -> Result<usize, ContextError> {
        Ok(self.lock()?.stack.len())
    }

    /// The most recent record, if any.
    pub fn last(&self) -> Result<Option<ErrorRecord>, ContextError> {
        Ok(self.lock()?.stack.back().cloned())
    }

    /// Remove and return every record, oldest first.
    pub fn drain(&self) -> Result<Vec<ErrorRecord>, ContextError> {
        Ok(self.lock()?.stack.drain(..).collect())
    }

    /// Discard every record.
    pub fn clear(&self) -> Result<(), ContextError> {
        self.lock()?.stack.clear();
        Ok(())
    }

    /// Records discarded because the stack was full.
    pub fn dropped_records(&self) -> Result<u64, ContextError> {
        Ok(self.lock()?.dropped)
    }

    /// `true` if fault logging is suppressed, either by
    /// [`set_silenced`](Self::set_silenced) or by an open
    /// [`silenced`](Self::silenced) scope.
    pub fn is_silenced(&self) -> Result<bool, ContextError> {
        Ok(self.lock()?.is_silenced())
    }

    /// Turn fault logging off or on; returns the previous setting.
    ///
    /// Open [`silenced`](Self::silenced) scopes keep logging off until
    /// they close, whatever this is set to.
    pub fn set_silenced(&self, silenced: bool) -> Result<bool, ContextError> {
        let mut state = self.lock()?;
        Ok(std::mem::replace(&mut state.silenced, silenced))
    }

    /// Run `f` with fault logging suppressed.
    ///
    /// Scopes nest and may overlap across threads: logging stays off until
    /// the last open scope closes, even if `f` panics. The lock is not
    /// held while `f` runs, so `f` may push faults.
    pub fn silenced<R>(&self, f: impl FnOnce() -> R) -> Result<R, ContextError> {
        self.lock()?.scoped += 1;
        let _scope = ScopeGuard { state: &self.state };
        Ok(f())
    }

    /// Tear down the context, returning any records still on the stack.
    ///
    /// A poisoned lock does not prevent teardown.
    pub fn shutdown(self) -> Vec<ErrorRecord> {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(
            remaining = state.stack.len(),
            dropped = state.dropped,
            "engine context shut down"
        );
        state.stack.into()
    }
}
