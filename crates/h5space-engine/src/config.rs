//! Error-context configuration and validation.

use std::error::Error;
use std::fmt;

/// Largest accepted error-stack depth.
pub const MAX_STACK_DEPTH: usize = 1024;

// ── ContextConfig ─────────────────────────────────────────────────

/// Configuration for an [`EngineContext`](crate::EngineContext).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextConfig {
    /// Records kept on the error stack before the oldest is dropped.
    /// Default: 32. Must be in `1..=1024`.
    pub max_stack_depth: usize,
    /// Start with engine-fault logging suppressed. Default: false.
    pub start_silenced: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: 32,
            start_silenced: false,
        }
    }
}

impl ContextConfig {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_stack_depth == 0 || self.max_stack_depth > MAX_STACK_DEPTH {
            return Err(ConfigError::StackDepthOutOfRange {
                configured: self.max_stack_depth,
            });
        }
        Ok(())
    }
}

// ── ConfigError ───────────────────────────────────────────────────

/// Errors detected by [`ContextConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_stack_depth` is zero or above [`MAX_STACK_DEPTH`].
    StackDepthOutOfRange {
        /// The configured depth.
        configured: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackDepthOutOfRange { configured } => write!(
                f,
                "max_stack_depth {configured} is outside 1..={MAX_STACK_DEPTH}"
            ),
        }
    }
}

impl Error for ConfigError {}
