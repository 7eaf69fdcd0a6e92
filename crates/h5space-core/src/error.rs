//! Error types for extents, selections, and dataspaces.
//!
//! A single flat taxonomy covers every failure the translation layer can
//! detect. Each variant is classified locally and returned; presenting it
//! to the end user is left to the caller.

use crate::ix::Ix;
use std::error::Error;
use std::fmt;

/// Errors from extents construction, selection construction, and
/// dataspace validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpaceError {
    /// Malformed shape description, e.g. a current size above its maximum.
    InvalidExtents {
        /// What went wrong.
        reason: String,
    },
    /// A selection's rank disagrees with the bound extents, or point
    /// tuples have heterogeneous lengths.
    RankMismatch {
        /// The rank that was required.
        expected: usize,
        /// The rank that was supplied.
        got: usize,
    },
    /// Non-positive stride or block, overlapping blocks, or a selection
    /// that cannot exist in the target dataspace.
    InvalidSelection {
        /// What went wrong.
        reason: String,
    },
    /// A selection addresses an index beyond the current extents.
    OutOfBounds {
        /// Dimension on which the violation occurred.
        axis: usize,
        /// The farthest offending index.
        index: Ix,
        /// Current size of that dimension.
        size: Ix,
    },
    /// An I/O buffer's element count disagrees with the effective
    /// selection count.
    BufferSizeMismatch {
        /// Effective element count of the dataspace.
        expected: u64,
        /// Element count of the supplied buffer.
        got: u64,
    },
    /// Rank was queried on a selection that has not been bound to extents.
    UnboundRank,
}

impl SpaceError {
    /// Shorthand for [`SpaceError::InvalidExtents`].
    pub fn invalid_extents(reason: impl Into<String>) -> Self {
        Self::InvalidExtents {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SpaceError::InvalidSelection`].
    pub fn invalid_selection(reason: impl Into<String>) -> Self {
        Self::InvalidSelection {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidExtents { reason } => write!(f, "invalid extents: {reason}"),
            Self::RankMismatch { expected, got } => {
                write!(f, "rank mismatch: expected {expected}, got {got}")
            }
            Self::InvalidSelection { reason } => write!(f, "invalid selection: {reason}"),
            Self::OutOfBounds { axis, index, size } => {
                write!(
                    f,
                    "index {index} out of bounds for axis {axis} with size {size}"
                )
            }
            Self::BufferSizeMismatch { expected, got } => {
                write!(
                    f,
                    "buffer holds {got} elements but the selection has {expected}"
                )
            }
            Self::UnboundRank => write!(f, "rank of an unbound selection is undefined"),
        }
    }
}

impl Error for SpaceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_out_of_bounds() {
        let e = SpaceError::OutOfBounds {
            axis: 1,
            index: 7,
            size: 4,
        };
        assert_eq!(e.to_string(), "index 7 out of bounds for axis 1 with size 4");
    }

    #[test]
    fn display_buffer_mismatch() {
        let e = SpaceError::BufferSizeMismatch {
            expected: 8,
            got: 5,
        };
        assert_eq!(
            e.to_string(),
            "buffer holds 5 elements but the selection has 8"
        );
    }

    #[test]
    fn shorthand_constructors() {
        assert_eq!(
            SpaceError::invalid_extents("x"),
            SpaceError::InvalidExtents { reason: "x".into() }
        );
        assert_eq!(
            SpaceError::invalid_selection("y"),
            SpaceError::InvalidSelection { reason: "y".into() }
        );
    }
}
