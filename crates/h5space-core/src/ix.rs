//! Index and coordinate types, plus the engine's rank limit.

use smallvec::SmallVec;

/// A single index or size along one dimension.
///
/// Matches the engine's unsigned 64-bit size type so wire arrays can be
/// handed over without conversion.
pub type Ix = u64;

/// An N-dimensional coordinate, dimension 0 first.
///
/// Inline capacity of 4 avoids heap allocation for the common 1D-4D
/// datasets; higher ranks spill to the heap transparently.
pub type Coord = SmallVec<[Ix; 4]>;

/// Maximum rank accepted by the engine.
pub const MAX_RANK: usize = 32;

/// Wire sentinel for an unlimited maximum dimension size.
pub const UNLIMITED: Ix = Ix::MAX;

/// Overflow-checked product of a sequence of sizes.
///
/// Returns `Some(1)` for an empty sequence and `None` on overflow.
pub fn checked_product<I>(sizes: I) -> Option<Ix>
where
    I: IntoIterator<Item = Ix>,
{
    sizes
        .into_iter()
        .try_fold(1 as Ix, |acc, n| acc.checked_mul(n))
}
