//! Conversion from ergonomic shape and selection descriptions.
//!
//! Every accepted input form is a variant of [`ShapeInput`], [`DimSelect`]
//! or [`SelectionInput`]. Each has exactly one conversion function, and
//! every client-facing form reaches it through a `From` impl.

use std::iter;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use h5space_core::{Ix, SpaceError};

use crate::extents::{Extent, Extents, SimpleExtents};
use crate::selection::{Hyperslab, HyperslabDim, Points, Selection};

// ── Shapes ──────────────────────────────────────────────────────

/// Every accepted description of a dataset shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeInput {
    /// The null dataspace.
    Null,
    /// The scalar dataspace.
    Scalar,
    /// A single fixed dimension.
    Len(Ix),
    /// Fixed dimensions.
    Dims(Vec<Ix>),
    /// Explicit current/maximum pairs.
    Extents(Vec<Extent>),
}

impl ShapeInput {
    /// Resolve into validated extents.
    pub fn into_extents(self) -> Result<Extents, SpaceError> {
        match self {
            Self::Null => Ok(Extents::Null),
            Self::Scalar => Ok(Extents::Scalar),
            Self::Len(n) => Extents::simple([n]),
            Self::Dims(dims) => Extents::simple(dims),
            Self::Extents(extents) => SimpleExtents::new(extents).map(Extents::Simple),
        }
    }
}

impl TryFrom<ShapeInput> for Extents {
    type Error = SpaceError;

    fn try_from(shape: ShapeInput) -> Result<Self, SpaceError> {
        shape.into_extents()
    }
}

impl From<()> for ShapeInput {
    fn from(_: ()) -> Self {
        Self::Scalar
    }
}

impl From<Ix> for ShapeInput {
    fn from(n: Ix) -> Self {
        Self::Len(n)
    }
}

impl From<Vec<Ix>> for ShapeInput {
    fn from(dims: Vec<Ix>) -> Self {
        Self::Dims(dims)
    }
}

impl From<&[Ix]> for ShapeInput {
    fn from(dims: &[Ix]) -> Self {
        Self::Dims(dims.to_vec())
    }
}

impl<const N: usize> From<[Ix; N]> for ShapeInput {
    fn from(dims: [Ix; N]) -> Self {
        Self::Dims(dims.to_vec())
    }
}

impl From<Extent> for ShapeInput {
    fn from(extent: Extent) -> Self {
        Self::Extents(vec![extent])
    }
}

impl From<Vec<Extent>> for ShapeInput {
    fn from(extents: Vec<Extent>) -> Self {
        Self::Extents(extents)
    }
}

impl From<&[Extent]> for ShapeInput {
    fn from(extents: &[Extent]) -> Self {
        Self::Extents(extents.to_vec())
    }
}

impl From<Vec<(Ix, Option<Ix>)>> for ShapeInput {
    fn from(pairs: Vec<(Ix, Option<Ix>)>) -> Self {
        Self::Extents(pairs.into_iter().map(Extent::from).collect())
    }
}

impl From<RangeFrom<Ix>> for ShapeInput {
    fn from(range: RangeFrom<Ix>) -> Self {
        Self::Extents(vec![Extent::from(range)])
    }
}

impl From<RangeInclusive<Ix>> for ShapeInput {
    fn from(range: RangeInclusive<Ix>) -> Self {
        Self::Extents(vec![Extent::from(range)])
    }
}

macro_rules! ix_of {
    ($name:ident) => {
        Ix
    };
}

macro_rules! impl_shape_tuple {
    () => ();

    ($head:ident, $($tail:ident,)*) => (
        impl From<(ix_of!($head), $(ix_of!($tail),)*)> for ShapeInput {
            fn from(($head, $($tail,)*): (ix_of!($head), $(ix_of!($tail),)*)) -> Self {
                Self::Dims(vec![$head, $($tail,)*])
            }
        }

        impl_shape_tuple! { $($tail,)* }
    )
}

impl_shape_tuple! { d0, d1, d2, d3, d4, d5, }

// ── Single dimensions ───────────────────────────────────────────

/// Selection along one dimension before it is resolved against a size.
///
/// Negative indices and bounds count from the end of the dimension.
/// Indices are held as `i128` so every `i64` and `u64` value is exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DimSelect {
    /// One index.
    Index(i128),
    /// A stepped half-open range; open ends default to `0` and the size.
    Slice {
        /// Inclusive start.
        start: Option<i128>,
        /// Exclusive end.
        end: Option<i128>,
        /// Step, must be positive.
        step: i64,
    },
    /// An explicit hyperslab dimension, taken as is.
    Slab(HyperslabDim),
    /// The whole dimension.
    Full,
}

impl DimSelect {
    /// Same selection with a different step. Indices are unaffected.
    pub fn step(self, step: i64) -> Self {
        match self {
            Self::Slice { start, end, .. } => Self::Slice { start, end, step },
            Self::Full => Self::Slice {
                start: None,
                end: None,
                step,
            },
            other => other,
        }
    }

    /// Resolve against dimension `axis` of size `dim`.
    pub fn resolve(self, axis: usize, dim: Ix) -> Result<HyperslabDim, SpaceError> {
        match self {
            Self::Index(index) => resolve_index(axis, index, dim).map(HyperslabDim::index),
            Self::Slice { start, end, step } => {
                if step < 1 {
                    return Err(SpaceError::invalid_selection(format!(
                        "axis {axis}: step {step} must be positive"
                    )));
                }
                let start = start.map_or(Ok(0), |b| resolve_bound(axis, b, dim))?;
                let end = end.map_or(Ok(dim), |b| resolve_bound(axis, b, dim))?;
                HyperslabDim::strided(start, end, step.unsigned_abs())
            }
            Self::Slab(slab) => Ok(slab),
            Self::Full => Ok(HyperslabDim::range(0..dim)),
        }
    }
}

/// Index into `0..dim`, negatives counted from the end.
fn resolve_index(axis: usize, index: i128, dim: Ix) -> Result<Ix, SpaceError> {
    match from_end(index, dim) {
        Some(i) if i < dim => Ok(i),
        _ => Err(out_of_bounds(axis, index, dim)),
    }
}

/// Range bound in `0..=dim`, negatives counted from the end.
fn resolve_bound(axis: usize, bound: i128, dim: Ix) -> Result<Ix, SpaceError> {
    match from_end(bound, dim) {
        Some(i) if i <= dim => Ok(i),
        _ => Err(out_of_bounds(axis, bound, dim)),
    }
}

/// `value` as an offset into a dimension of size `dim`, or `None` if it
/// cannot be one.
fn from_end(value: i128, dim: Ix) -> Option<Ix> {
    let magnitude = Ix::try_from(value.unsigned_abs()).ok()?;
    if value < 0 {
        dim.checked_sub(magnitude)
    } else {
        Some(magnitude)
    }
}

fn out_of_bounds(axis: usize, value: i128, dim: Ix) -> SpaceError {
    SpaceError::OutOfBounds {
        axis,
        index: Ix::try_from(value.unsigned_abs()).unwrap_or(Ix::MAX),
        size: dim,
    }
}

/// Exclusive end for an inclusive bound; `..=-1` runs to the end.
fn inclusive_end(end: i128) -> Option<i128> {
    if end == -1 {
        None
    } else {
        Some(end.saturating_add(1))
    }
}

impl From<RangeFull> for DimSelect {
    fn from(_: RangeFull) -> Self {
        Self::Full
    }
}

impl From<HyperslabDim> for DimSelect {
    fn from(slab: HyperslabDim) -> Self {
        Self::Slab(slab)
    }
}

// Every integer type listed below converts to i128 without loss.
macro_rules! impl_dim_select {
    ($($t:ty),+) => {$(
        impl From<$t> for DimSelect {
            fn from(index: $t) -> Self {
                Self::Index(index as i128)
            }
        }

        impl From<Range<$t>> for DimSelect {
            fn from(r: Range<$t>) -> Self {
                Self::Slice {
                    start: Some(r.start as i128),
                    end: Some(r.end as i128),
                    step: 1,
                }
            }
        }

        impl From<RangeFrom<$t>> for DimSelect {
            fn from(r: RangeFrom<$t>) -> Self {
                Self::Slice {
                    start: Some(r.start as i128),
                    end: None,
                    step: 1,
                }
            }
        }

        impl From<RangeTo<$t>> for DimSelect {
            fn from(r: RangeTo<$t>) -> Self {
                Self::Slice {
                    start: None,
                    end: Some(r.end as i128),
                    step: 1,
                }
            }
        }

        impl From<RangeInclusive<$t>> for DimSelect {
            fn from(r: RangeInclusive<$t>) -> Self {
                let (start, end) = r.into_inner();
                Self::Slice {
                    start: Some(start as i128),
                    end: inclusive_end(end as i128),
                    step: 1,
                }
            }
        }

        impl From<RangeToInclusive<$t>> for DimSelect {
            fn from(r: RangeToInclusive<$t>) -> Self {
                Self::Slice {
                    start: None,
                    end: inclusive_end(r.end as i128),
                    step: 1,
                }
            }
        }

        impl From<$t> for SelectionInput {
            fn from(index: $t) -> Self {
                Self::Dims(vec![index.into()])
            }
        }

        impl From<Range<$t>> for SelectionInput {
            fn from(r: Range<$t>) -> Self {
                Self::Dims(vec![r.into()])
            }
        }

        impl From<RangeFrom<$t>> for SelectionInput {
            fn from(r: RangeFrom<$t>) -> Self {
                Self::Dims(vec![r.into()])
            }
        }

        impl From<RangeTo<$t>> for SelectionInput {
            fn from(r: RangeTo<$t>) -> Self {
                Self::Dims(vec![r.into()])
            }
        }

        impl From<RangeInclusive<$t>> for SelectionInput {
            fn from(r: RangeInclusive<$t>) -> Self {
                Self::Dims(vec![r.into()])
            }
        }

        impl From<RangeToInclusive<$t>> for SelectionInput {
            fn from(r: RangeToInclusive<$t>) -> Self {
                Self::Dims(vec![r.into()])
            }
        }
    )+};
}

impl_dim_select!(i32, i64, isize, u32, u64, usize);

// ── Whole selections ────────────────────────────────────────────

/// Every accepted description of a selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionInput {
    /// Everything.
    All,
    /// Per-dimension selections; missing trailing dimensions select fully.
    Dims(Vec<DimSelect>),
    /// A one-dimensional index list, kept as points.
    Indices(Vec<Ix>),
    /// Explicit coordinate tuples.
    Points(Vec<Vec<Ix>>),
    /// A prepared hyperslab.
    Hyperslab(Hyperslab),
    /// A prepared selection.
    Selection(Selection),
}

impl SelectionInput {
    /// Resolve against `extents`.
    ///
    /// Only index resolution happens here; bounds of explicit hyperslabs
    /// and points are checked when the selection is attached to a
    /// dataspace.
    pub fn into_selection(self, extents: &Extents) -> Result<Selection, SpaceError> {
        match self {
            Self::All => Ok(Selection::All),
            Self::Dims(dims) => {
                let rank = extents.rank();
                if dims.len() > rank {
                    return Err(SpaceError::RankMismatch {
                        expected: rank,
                        got: dims.len(),
                    });
                }
                let resolved = extents
                    .iter()
                    .zip(dims.into_iter().chain(iter::repeat(DimSelect::Full)))
                    .enumerate()
                    .map(|(axis, (extent, sel))| sel.resolve(axis, extent.dim))
                    .collect::<Result<Vec<_>, _>>()?;
                Hyperslab::new(resolved).map(Selection::Hyperslab)
            }
            Self::Indices(indices) => {
                Points::new(indices.into_iter().map(|i| [i])).map(Selection::Points)
            }
            Self::Points(points) => Points::new(points).map(Selection::Points),
            Self::Hyperslab(hyper) => Ok(Selection::Hyperslab(hyper)),
            Self::Selection(sel) => Ok(sel),
        }
    }
}

impl From<RangeFull> for SelectionInput {
    fn from(_: RangeFull) -> Self {
        Self::All
    }
}

impl From<DimSelect> for SelectionInput {
    fn from(sel: DimSelect) -> Self {
        Self::Dims(vec![sel])
    }
}

impl From<HyperslabDim> for SelectionInput {
    fn from(slab: HyperslabDim) -> Self {
        Self::Dims(vec![DimSelect::Slab(slab)])
    }
}

impl From<Vec<DimSelect>> for SelectionInput {
    fn from(dims: Vec<DimSelect>) -> Self {
        Self::Dims(dims)
    }
}

impl From<Vec<Ix>> for SelectionInput {
    fn from(indices: Vec<Ix>) -> Self {
        Self::Indices(indices)
    }
}

impl From<&[Ix]> for SelectionInput {
    fn from(indices: &[Ix]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

impl From<Vec<Vec<Ix>>> for SelectionInput {
    fn from(points: Vec<Vec<Ix>>) -> Self {
        Self::Points(points)
    }
}

impl From<Hyperslab> for SelectionInput {
    fn from(hyper: Hyperslab) -> Self {
        Self::Hyperslab(hyper)
    }
}

impl From<Selection> for SelectionInput {
    fn from(sel: Selection) -> Self {
        Self::Selection(sel)
    }
}

impl From<&Selection> for SelectionInput {
    fn from(sel: &Selection) -> Self {
        Self::Selection(sel.clone())
    }
}

macro_rules! impl_select_tuple {
    () => ();

    ($head:ident, $($tail:ident,)*) => (
        #[allow(non_snake_case)]
        impl<$head, $($tail,)*> From<($head, $($tail,)*)> for SelectionInput
            where $head: Into<DimSelect>, $($tail: Into<DimSelect>,)*
        {
            fn from(dims: ($head, $($tail,)*)) -> Self {
                let ($head, $($tail,)*) = dims;
                Self::Dims(vec![$head.into(), $($tail.into(),)*])
            }
        }

        impl_select_tuple! { $($tail,)* }
    )
}

impl_select_tuple! { T0, T1, T2, T3, T4, T5, }
