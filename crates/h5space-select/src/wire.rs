//! Flat-array forms handed to the storage engine.
//!
//! Dimension 0 comes first in every array. Unlimited maxima travel as the
//! [`UNLIMITED`] sentinel.

use h5space_core::{Ix, SpaceError, UNLIMITED};

use crate::extents::{Extent, Extents, SpaceClass};
use crate::selection::{Hyperslab, Points, Selection};

/// Extents as the engine receives them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WireExtents {
    /// Dataspace class.
    pub class: SpaceClass,
    /// Current sizes; empty for null and scalar.
    pub dims: Vec<Ix>,
    /// Maximum sizes with [`UNLIMITED`] for unbounded dimensions.
    pub maxdims: Vec<Ix>,
}

impl WireExtents {
    /// Rebuild validated extents.
    ///
    /// `dims` and `maxdims` must have the same length.
    pub fn into_extents(self) -> Result<Extents, SpaceError> {
        if self.maxdims.len() != self.dims.len() {
            return Err(SpaceError::RankMismatch {
                expected: self.dims.len(),
                got: self.maxdims.len(),
            });
        }
        let extents: Vec<Extent> = self
            .dims
            .iter()
            .zip(&self.maxdims)
            .map(|(&dim, &max)| Extent::new(dim, (max != UNLIMITED).then_some(max)))
            .collect();
        Extents::from_parts(self.class, &extents)
    }
}

impl Extents {
    /// The engine's view of these extents.
    pub fn to_wire(&self) -> WireExtents {
        WireExtents {
            class: self.class(),
            dims: self.iter().map(|e| e.dim).collect(),
            maxdims: self.iter().map(|e| e.max.unwrap_or(UNLIMITED)).collect(),
        }
    }
}

/// A selection as the engine receives it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WireSelection {
    /// Select everything.
    All,
    /// Four parallel arrays of length rank.
    Hyperslab {
        /// First block offset per dimension.
        start: Vec<Ix>,
        /// Block spacing per dimension.
        stride: Vec<Ix>,
        /// Block count per dimension.
        count: Vec<Ix>,
        /// Block size per dimension.
        block: Vec<Ix>,
    },
    /// Flat row-major coordinates, `rank * npoints` long.
    Points {
        /// Rank of each point; 0 when there are no points.
        rank: usize,
        /// Coordinates, point-major.
        coords: Vec<Ix>,
    },
}

impl WireSelection {
    /// Short name of the selection kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Hyperslab { .. } => "hyperslab",
            Self::Points { .. } => "points",
        }
    }

    /// Rebuild a validated selection.
    ///
    /// Unlimited hyperslab counts are an engine extension this model does
    /// not represent and are rejected with `InvalidSelection`.
    pub fn into_selection(self) -> Result<Selection, SpaceError> {
        match self {
            Self::All => Ok(Selection::All),
            Self::Hyperslab {
                start,
                stride,
                count,
                block,
            } => {
                if count.contains(&UNLIMITED) {
                    return Err(SpaceError::invalid_selection(
                        "unlimited hyperslab counts are not supported",
                    ));
                }
                Hyperslab::from_arrays(&start, &stride, &count, &block).map(Selection::Hyperslab)
            }
            Self::Points { rank, coords } => Points::from_flat(rank, coords).map(Selection::Points),
        }
    }
}

impl Selection {
    /// The engine's view of this selection.
    ///
    /// Hyperslabs stay hyperslabs even when they cover everything; use
    /// [`Dataspace::simplified`](crate::Dataspace::simplified) to collapse.
    pub fn to_wire(&self) -> WireSelection {
        match self {
            Self::All => WireSelection::All,
            Self::Hyperslab(h) => WireSelection::Hyperslab {
                start: h.iter().map(|d| d.start()).collect(),
                stride: h.iter().map(|d| d.stride()).collect(),
                count: h.iter().map(|d| d.count()).collect(),
                block: h.iter().map(|d| d.block()).collect(),
            },
            Self::Points(p) => WireSelection::Points {
                rank: p.ndim().unwrap_or(0),
                coords: p.as_flat().to_vec(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Extents ─────────────────────────────────────────────────

    #[test]
    fn unlimited_travels_as_sentinel() {
        let e = Extents::from_extents([Extent::unlimited(5), Extent::new(2, Some(9))]).unwrap();
        let wire = e.to_wire();
        assert_eq!(wire.class, SpaceClass::Simple);
        assert_eq!(wire.dims, vec![5, 2]);
        assert_eq!(wire.maxdims, vec![UNLIMITED, 9]);
        assert_eq!(wire.into_extents(), Ok(e));
    }

    #[test]
    fn null_and_scalar_carry_no_arrays() {
        for e in [Extents::null(), Extents::scalar()] {
            let wire = e.to_wire();
            assert!(wire.dims.is_empty());
            assert!(wire.maxdims.is_empty());
            assert_eq!(wire.into_extents(), Ok(e));
        }
    }

    #[test]
    fn mismatched_array_lengths_are_rejected() {
        let wire = WireExtents {
            class: SpaceClass::Simple,
            dims: vec![3, 4],
            maxdims: vec![3],
        };
        assert_eq!(
            wire.into_extents(),
            Err(SpaceError::RankMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn wire_dim_above_max_is_rejected() {
        let wire = WireExtents {
            class: SpaceClass::Simple,
            dims: vec![5],
            maxdims: vec![4],
        };
        assert!(matches!(
            wire.into_extents(),
            Err(SpaceError::InvalidExtents { .. })
        ));
    }

    // ── Selections ──────────────────────────────────────────────

    #[test]
    fn hyperslab_arrays_are_dimension_major() {
        let sel = Selection::hyperslab(&[1, 0], &[1, 2], &[2, 2], &[1, 1]).unwrap();
        assert_eq!(
            sel.to_wire(),
            WireSelection::Hyperslab {
                start: vec![1, 0],
                stride: vec![1, 2],
                count: vec![2, 2],
                block: vec![1, 1],
            }
        );
        assert_eq!(sel.to_wire().into_selection(), Ok(sel));
    }

    #[test]
    fn points_are_flat_row_major() {
        let sel = Selection::points([[0u64, 0], [2, 3]]).unwrap();
        let wire = sel.to_wire();
        assert_eq!(
            wire,
            WireSelection::Points {
                rank: 2,
                coords: vec![0, 0, 2, 3]
            }
        );
        assert_eq!(wire.kind(), "points");
        assert_eq!(wire.into_selection(), Ok(sel));
    }

    #[test]
    fn empty_points_have_rank_zero_on_the_wire() {
        let sel = Selection::points(Vec::<Vec<Ix>>::new()).unwrap();
        let wire = sel.to_wire();
        assert_eq!(
            wire,
            WireSelection::Points {
                rank: 0,
                coords: vec![]
            }
        );
        assert_eq!(wire.into_selection(), Ok(sel));
    }

    #[test]
    fn unlimited_count_is_rejected() {
        let wire = WireSelection::Hyperslab {
            start: vec![0],
            stride: vec![1],
            count: vec![UNLIMITED],
            block: vec![1],
        };
        assert!(matches!(
            wire.into_selection(),
            Err(SpaceError::InvalidSelection { .. })
        ));
    }

    #[test]
    fn ragged_point_array_is_rejected() {
        let wire = WireSelection::Points {
            rank: 2,
            coords: vec![0, 1, 2],
        };
        assert!(wire.into_selection().is_err());
    }
}
