//! Stable numeric status codes for every error kind.
//!
//! [`SpaceStatus`] is a `repr(i32)` enum for callers that speak numeric
//! codes. Conversions from [`SpaceError`], [`TransferError`],
//! [`ContextError`] and [`ConfigError`] are provided.

use h5space_core::SpaceError;

use crate::config::ConfigError;
use crate::context::ContextError;
use crate::transfer::TransferError;

/// Numeric status of an operation.
///
/// `Ok` = 0, all errors are negative. Values are stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpaceStatus {
    /// Success.
    Ok = 0,
    /// Malformed shape description.
    InvalidExtents = -1,
    /// Selection rank disagrees with the extents.
    RankMismatch = -2,
    /// Malformed or impossible selection.
    InvalidSelection = -3,
    /// A selected index lies beyond the current extents.
    OutOfBounds = -4,
    /// Buffer length disagrees with the selection.
    BufferSizeMismatch = -5,
    /// Rank queried on an unbound selection.
    UnboundRank = -6,
    /// The storage engine rejected a call.
    EngineFault = -7,
    /// Context configuration is invalid.
    ConfigError = -8,
    /// The error context lock was poisoned.
    InternalError = -9,
}

impl SpaceStatus {
    /// The numeric code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Status of a fallible operation's result.
    pub fn of<T, E>(result: &Result<T, E>) -> Self
    where
        for<'a> SpaceStatus: From<&'a E>,
    {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => Self::from(e),
        }
    }
}

impl From<&SpaceError> for SpaceStatus {
    fn from(e: &SpaceError) -> Self {
        match e {
            SpaceError::InvalidExtents { .. } => Self::InvalidExtents,
            SpaceError::RankMismatch { .. } => Self::RankMismatch,
            SpaceError::InvalidSelection { .. } => Self::InvalidSelection,
            SpaceError::OutOfBounds { .. } => Self::OutOfBounds,
            SpaceError::BufferSizeMismatch { .. } => Self::BufferSizeMismatch,
            SpaceError::UnboundRank => Self::UnboundRank,
        }
    }
}

impl From<&ConfigError> for SpaceStatus {
    fn from(_e: &ConfigError) -> Self {
        Self::ConfigError
    }
}

impl From<&ContextError> for SpaceStatus {
    fn from(e: &ContextError) -> Self {
        match e {
            ContextError::Poisoned => Self::InternalError,
            ContextError::InvalidConfig(c) => Self::from(c),
        }
    }
}

impl From<&TransferError> for SpaceStatus {
    fn from(e: &TransferError) -> Self {
        match e {
            TransferError::Space(s) => Self::from(s),
            TransferError::Engine { .. } => Self::EngineFault,
            TransferError::Context(c) => Self::from(c),
        }
    }
}
