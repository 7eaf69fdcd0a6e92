//! Element selections: all, discrete points, or one regular hyperslab.
//!
//! A [`Selection`] is rank-agnostic until it is validated against an
//! [`Extents`]. Only a single regular box is representable; unions of
//! hyperslabs are not, matching the engine's regular-hyperslab model.

use std::fmt;
use std::ops::{Deref, Range};

use h5space_core::{checked_product, Coord, Ix, SpaceError, MAX_RANK};
use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::extents::{Extent, Extents};
use crate::iter::SelectionIter;

/// One dimension of a regular hyperslab.
///
/// Starting at `start`, `count` runs of `block` contiguous elements,
/// consecutive runs `stride` apart. Fields are private so the
/// `stride >= 1`, `block >= 1` and non-overlap invariants always hold.
///
/// ```text
/// start=1 stride=4 count=2 block=2 over 10 elements
/// _ s s _ _ s s _ _ _
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HyperslabDim {
    start: Ix,
    stride: Ix,
    count: Ix,
    block: Ix,
}

impl HyperslabDim {
    /// Validated constructor.
    ///
    /// Fails with `InvalidSelection` if `stride` or `block` is zero, if
    /// blocks overlap (`count > 1` and `block > stride`), or if the
    /// farthest addressed index does not fit in [`Ix`].
    pub fn new(start: Ix, stride: Ix, count: Ix, block: Ix) -> Result<Self, SpaceError> {
        if stride < 1 {
            return Err(SpaceError::invalid_selection("stride must be at least 1"));
        }
        if block < 1 {
            return Err(SpaceError::invalid_selection("block must be at least 1"));
        }
        if count > 1 && block > stride {
            return Err(SpaceError::invalid_selection(format!(
                "block {block} overlaps stride {stride}"
            )));
        }
        if count > 0 {
            let last = (count - 1)
                .checked_mul(stride)
                .and_then(|span| span.checked_add(block - 1))
                .and_then(|span| span.checked_add(start));
            if last.is_none() || count.checked_mul(block).is_none() {
                return Err(SpaceError::invalid_selection(
                    "hyperslab extent overflows u64",
                ));
            }
        }
        Ok(Self {
            start,
            stride,
            count,
            block,
        })
    }

    /// A single index.
    pub const fn index(index: Ix) -> Self {
        Self {
            start: index,
            stride: 1,
            count: 1,
            block: 1,
        }
    }

    /// A contiguous half-open range; empty when `end <= start`.
    pub const fn range(range: Range<Ix>) -> Self {
        Self {
            start: range.start,
            stride: 1,
            count: range.end.saturating_sub(range.start),
            block: 1,
        }
    }

    /// Every `step`-th index of `start..end`.
    ///
    /// `count` is `ceil((end - start) / step)`, zero when `end <= start`.
    pub fn strided(start: Ix, end: Ix, step: Ix) -> Result<Self, SpaceError> {
        if step < 1 {
            return Err(SpaceError::invalid_selection("step must be at least 1"));
        }
        let span = end.saturating_sub(start);
        let count = span / step + Ix::from(span % step != 0);
        Self::new(start, step, count, 1)
    }

    /// Same dimension with a different block size.
    pub fn with_block(self, block: Ix) -> Result<Self, SpaceError> {
        Self::new(self.start, self.stride, self.count, block)
    }

    /// Offset of the first block.
    pub fn start(&self) -> Ix {
        self.start
    }

    /// Distance between consecutive block starts.
    pub fn stride(&self) -> Ix {
        self.stride
    }

    /// Number of blocks.
    pub fn count(&self) -> Ix {
        self.count
    }

    /// Elements per block.
    pub fn block(&self) -> Ix {
        self.block
    }

    /// Number of selected indices along this dimension.
    pub fn len(&self) -> Ix {
        self.count * self.block
    }

    /// `true` if nothing is selected along this dimension.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The farthest addressed index, or `None` if empty.
    pub fn last(&self) -> Option<Ix> {
        if self.count == 0 {
            return None;
        }
        Some(self.start + (self.count - 1) * self.stride + (self.block - 1))
    }

    /// The `k`-th selected index, `k < len()`.
    pub(crate) fn position(&self, k: Ix) -> Ix {
        self.start + (k / self.block) * self.stride + k % self.block
    }

    /// `true` if this dimension selects every index of `extent`.
    pub fn covers(&self, extent: &Extent) -> bool {
        self.start == 0 && self.len() == extent.dim && (self.count <= 1 || self.stride == self.block)
    }
}

impl fmt::Display for HyperslabDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 && self.block == 1 {
            return write!(f, "{}", self.start);
        }
        let end = self.last().map_or(self.start, |last| last + 1);
        write!(f, "{}..{end}", self.start)?;
        if self.stride != 1 {
            write!(f, ";{}", self.stride)?;
        }
        if self.block != 1 {
            write!(f, "(Bx{})", self.block)?;
        }
        Ok(())
    }
}

/// A regular hyperslab: one [`HyperslabDim`] per dimension.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hyperslab {
    dims: SmallVec<[HyperslabDim; 4]>,
}

impl Hyperslab {
    /// Collect per-dimension descriptions.
    ///
    /// Fails if the rank exceeds [`MAX_RANK`] or the total element count
    /// overflows [`Ix`].
    pub fn new<I: IntoIterator<Item = HyperslabDim>>(dims: I) -> Result<Self, SpaceError> {
        let dims: SmallVec<[HyperslabDim; 4]> = dims.into_iter().collect();
        if dims.len() > MAX_RANK {
            return Err(SpaceError::invalid_selection(format!(
                "rank {} exceeds the maximum of {MAX_RANK}",
                dims.len()
            )));
        }
        if checked_product(dims.iter().map(HyperslabDim::len)).is_none() {
            return Err(SpaceError::invalid_selection(
                "selected element count overflows u64",
            ));
        }
        Ok(Self { dims })
    }

    /// Build from the engine's four parallel arrays.
    pub fn from_arrays(
        start: &[Ix],
        stride: &[Ix],
        count: &[Ix],
        block: &[Ix],
    ) -> Result<Self, SpaceError> {
        let rank = start.len();
        for len in [stride.len(), count.len(), block.len()] {
            if len != rank {
                return Err(SpaceError::RankMismatch {
                    expected: rank,
                    got: len,
                });
            }
        }
        let dims = (0..rank)
            .map(|i| HyperslabDim::new(start[i], stride[i], count[i], block[i]))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dims)
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Product of the per-dimension lengths.
    pub fn element_count(&self) -> u64 {
        self.dims.iter().map(HyperslabDim::len).product()
    }

    /// Per-dimension lengths (`count * block`).
    pub fn shape(&self) -> Coord {
        self.dims.iter().map(HyperslabDim::len).collect()
    }

    /// `true` if any dimension selects nothing.
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(HyperslabDim::is_empty)
    }

    /// Same hyperslab with one dimension's block size changed.
    pub fn set_block(&self, axis: usize, block: Ix) -> Result<Self, SpaceError> {
        let mut dims = self.dims.clone();
        let dim = dims.get_mut(axis).ok_or(SpaceError::RankMismatch {
            expected: self.rank(),
            got: axis + 1,
        })?;
        *dim = dim.with_block(block)?;
        Self::new(dims)
    }
}

impl Deref for Hyperslab {
    type Target = [HyperslabDim];

    fn deref(&self) -> &Self::Target {
        &self.dims
    }
}

impl fmt::Display for Hyperslab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        if self.dims.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// An ordered list of point coordinates stored flat, row-major.
///
/// Duplicates are allowed and order is preserved: it defines the order
/// in which elements move between the dataset and a flat buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Points {
    ndim: usize,
    coords: Vec<Ix>,
}

impl Points {
    /// Collect coordinate tuples.
    ///
    /// Fails with `RankMismatch` when tuples have different lengths and
    /// with `InvalidSelection` for zero-length tuples or a rank above
    /// [`MAX_RANK`].
    pub fn new<I, C>(tuples: I) -> Result<Self, SpaceError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[Ix]>,
    {
        let mut ndim = None;
        let mut coords = Vec::new();
        for tuple in tuples {
            let tuple = tuple.as_ref();
            match ndim {
                None => {
                    if tuple.is_empty() {
                        return Err(SpaceError::invalid_selection(
                            "point coordinates need at least one dimension",
                        ));
                    }
                    if tuple.len() > MAX_RANK {
                        return Err(SpaceError::invalid_selection(format!(
                            "rank {} exceeds the maximum of {MAX_RANK}",
                            tuple.len()
                        )));
                    }
                    ndim = Some(tuple.len());
                }
                Some(n) if n != tuple.len() => {
                    return Err(SpaceError::RankMismatch {
                        expected: n,
                        got: tuple.len(),
                    });
                }
                Some(_) => {}
            }
            coords.extend_from_slice(tuple);
        }
        Ok(Self {
            ndim: ndim.unwrap_or(0),
            coords,
        })
    }

    /// Build from a flat row-major array of `ndim * npoints` indices.
    pub fn from_flat(ndim: usize, coords: Vec<Ix>) -> Result<Self, SpaceError> {
        if coords.is_empty() {
            return Ok(Self::default());
        }
        if ndim == 0 || ndim > MAX_RANK {
            return Err(SpaceError::invalid_selection(format!(
                "point rank {ndim} must be in 1..={MAX_RANK}"
            )));
        }
        if coords.len() % ndim != 0 {
            return Err(SpaceError::invalid_selection(format!(
                "{} flat indices do not divide into rank-{ndim} points",
                coords.len()
            )));
        }
        Ok(Self { ndim, coords })
    }

    /// Rank of every point, or `None` for an empty list.
    pub fn ndim(&self) -> Option<usize> {
        if self.coords.is_empty() {
            None
        } else {
            Some(self.ndim)
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        if self.ndim == 0 {
            0
        } else {
            self.coords.len() / self.ndim
        }
    }

    /// `true` if there are no points.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The `i`-th point.
    pub fn get(&self, i: usize) -> Option<&[Ix]> {
        let start = i.checked_mul(self.ndim)?;
        self.coords.get(start..start + self.ndim).filter(|_| self.ndim > 0)
    }

    /// Points in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &[Ix]> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// The flat row-major storage.
    pub fn as_flat(&self) -> &[Ix] {
        &self.coords
    }

    /// Number of distinct points.
    pub fn unique_count(&self) -> usize {
        self.iter().collect::<IndexSet<_>>().len()
    }

    /// `true` if any point appears more than once.
    pub fn has_duplicates(&self) -> bool {
        self.unique_count() != self.len()
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "(")?;
            for (j, x) in p.iter().enumerate() {
                if j != 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{x}")?;
            }
            write!(f, ")")?;
        }
        write!(f, "]")
    }
}

/// How strictly to bounds-check a selection against extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundsCheck {
    /// Check every dimension against its current size.
    Eager,
    /// Skip unlimited dimensions; their check is deferred to I/O time.
    Bounded,
}

impl BoundsCheck {
    fn applies(self, extent: &Extent) -> bool {
        match self {
            Self::Eager => true,
            Self::Bounded => !extent.is_unlimited(),
        }
    }
}

/// A subset of the elements of an address space.
///
/// # Examples
///
/// ```
/// use h5space_select::{Extents, Selection};
///
/// let extents = Extents::new((3, 4)).unwrap();
/// let sel = Selection::hyperslab(&[1, 0], &[1, 1], &[2, 4], &[1, 1]).unwrap();
/// assert_eq!(sel.element_count(&extents), 8);
/// assert_eq!(sel.coords(&extents).count(), 8);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Every element of the bound extents.
    #[default]
    All,
    /// Explicit coordinates in transfer order.
    Points(Points),
    /// A single regular hyperslab.
    Hyperslab(Hyperslab),
}

impl Selection {
    /// Select everything.
    pub const fn all() -> Self {
        Self::All
    }

    /// Select explicit coordinates.
    pub fn points<I, C>(tuples: I) -> Result<Self, SpaceError>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[Ix]>,
    {
        Points::new(tuples).map(Self::Points)
    }

    /// Select a hyperslab from the engine's four parallel arrays.
    pub fn hyperslab(
        start: &[Ix],
        stride: &[Ix],
        count: &[Ix],
        block: &[Ix],
    ) -> Result<Self, SpaceError> {
        Hyperslab::from_arrays(start, stride, count, block).map(Self::Hyperslab)
    }

    /// Rank of the selection.
    ///
    /// `All` and an empty point list carry no rank of their own and fail
    /// with [`SpaceError::UnboundRank`].
    pub fn rank(&self) -> Result<usize, SpaceError> {
        self.ndim_hint().ok_or(SpaceError::UnboundRank)
    }

    /// Rank if the selection carries one.
    pub fn ndim_hint(&self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Points(p) => p.ndim(),
            Self::Hyperslab(h) => Some(h.rank()),
        }
    }

    /// Element count if it does not depend on the extents.
    pub fn fixed_count(&self) -> Option<u64> {
        match self {
            Self::All => None,
            Self::Points(p) => Some(p.len() as u64),
            Self::Hyperslab(h) => Some(h.element_count()),
        }
    }

    /// Number of selected elements when bound to `extents`.
    pub fn element_count(&self, extents: &Extents) -> u64 {
        self.fixed_count()
            .unwrap_or_else(|| extents.element_count())
    }

    /// `true` for [`Selection::All`].
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// `true` for a point selection.
    pub fn is_points(&self) -> bool {
        matches!(self, Self::Points(_))
    }

    /// `true` for a hyperslab selection.
    pub fn is_hyperslab(&self) -> bool {
        matches!(self, Self::Hyperslab(_))
    }

    /// `true` if nothing is selected when bound to `extents`.
    pub fn is_empty_in(&self, extents: &Extents) -> bool {
        self.element_count(extents) == 0
    }

    /// `true` if every element of `extents` is selected exactly once, in
    /// row-major order.
    pub fn covers(&self, extents: &Extents) -> bool {
        match self {
            Self::All => true,
            Self::Points(_) => false,
            Self::Hyperslab(h) => {
                h.rank() == extents.rank()
                    && !extents.is_null()
                    && h.iter().zip(extents.iter()).all(|(d, e)| d.covers(e))
            }
        }
    }

    /// Check rank compatibility and bounds against `extents`.
    ///
    /// With [`BoundsCheck::Bounded`], indices along unlimited dimensions
    /// are not checked; the caller must re-validate eagerly before I/O.
    pub fn validate(&self, extents: &Extents, check: BoundsCheck) -> Result<(), SpaceError> {
        match self {
            Self::All => Ok(()),
            Self::Points(points) => {
                let Some(ndim) = points.ndim() else {
                    return Ok(());
                };
                if ndim != extents.rank() {
                    return Err(SpaceError::RankMismatch {
                        expected: extents.rank(),
                        got: ndim,
                    });
                }
                for point in points.iter() {
                    for (axis, (&index, extent)) in point.iter().zip(extents.iter()).enumerate() {
                        if check.applies(extent) && index >= extent.dim {
                            return Err(SpaceError::OutOfBounds {
                                axis,
                                index,
                                size: extent.dim,
                            });
                        }
                    }
                }
                Ok(())
            }
            Self::Hyperslab(hyper) => {
                if hyper.rank() != extents.rank() {
                    return Err(SpaceError::RankMismatch {
                        expected: extents.rank(),
                        got: hyper.rank(),
                    });
                }
                if extents.is_null() && !hyper.is_empty() {
                    return Err(SpaceError::invalid_selection(
                        "a null dataspace has no elements to select",
                    ));
                }
                for (axis, (dim, extent)) in hyper.iter().zip(extents.iter()).enumerate() {
                    if let Some(last) = dim.last() {
                        if check.applies(extent) && last >= extent.dim {
                            return Err(SpaceError::OutOfBounds {
                                axis,
                                index: last,
                                size: extent.dim,
                            });
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Selected coordinates in transfer order.
    ///
    /// Each call returns a fresh iterator, so the selection can be counted
    /// and then walked without any shared cursor state.
    pub fn coords<'a>(&'a self, extents: &Extents) -> SelectionIter<'a> {
        match self {
            Self::All => SelectionIter::all(extents),
            Self::Points(p) => SelectionIter::points(p),
            Self::Hyperslab(h) => SelectionIter::hyperslab(h),
        }
    }
}

impl From<Hyperslab> for Selection {
    fn from(hyper: Hyperslab) -> Self {
        Self::Hyperslab(hyper)
    }
}

impl From<Points> for Selection {
    fn from(points: Points) -> Self {
        Self::Points(points)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, ".."),
            Self::Points(p) => write!(f, "{p}"),
            Self::Hyperslab(h) => write!(f, "{h}"),
        }
    }
}
