//! The opaque engine handle a prepared dataspace is pushed into.

use std::error::Error;
use std::fmt;

use h5space_core::Ix;
use h5space_select::WireExtents;

/// A failure reported by the storage engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineFault {
    /// Engine-specific numeric code.
    pub code: i32,
    /// Engine-supplied description.
    pub message: String,
}

impl EngineFault {
    /// Build a fault from a code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine fault {}: {}", self.code, self.message)
    }
}

impl Error for EngineFault {}

/// A borrowed engine dataspace handle.
///
/// Implementors own the underlying handle and its lifetime. Callers in
/// this crate borrow it for one [`prepare`](crate::transfer::prepare)
/// call and never store it.
pub trait SelectionTarget {
    /// Replace the handle's extents.
    fn set_extents(&mut self, extents: &WireExtents) -> Result<(), EngineFault>;

    /// Select every element.
    fn select_all(&mut self) -> Result<(), EngineFault>;

    /// Select one regular hyperslab from four parallel arrays.
    fn select_hyperslab(
        &mut self,
        start: &[Ix],
        stride: &[Ix],
        count: &[Ix],
        block: &[Ix],
    ) -> Result<(), EngineFault>;

    /// Select `coords.len() / rank` points from flat row-major coordinates.
    fn select_elements(&mut self, rank: usize, coords: &[Ix]) -> Result<(), EngineFault>;
}
