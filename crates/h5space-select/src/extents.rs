//! Dataset address-space shape: null, scalar, or simple extents.

use std::fmt;
use std::ops::{Deref, RangeFrom, RangeInclusive};

use h5space_core::{checked_product, Coord, Ix, SpaceError, MAX_RANK};
use smallvec::SmallVec;

use crate::convert::ShapeInput;

/// The class tag of a dataspace, independent of any dimension data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpaceClass {
    /// No elements at all; a placeholder for uninitialized datasets.
    Null,
    /// Rank 0 with exactly one element.
    Scalar,
    /// Rank 1 or more with per-dimension sizes.
    Simple,
}

/// Current and maximum size of a single dimension.
///
/// `max == None` marks an unlimited (extensible) dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Current size.
    pub dim: Ix,
    /// Maximum size, or `None` if unlimited.
    pub max: Option<Ix>,
}

impl Extent {
    /// A dimension with an explicit maximum.
    pub const fn new(dim: Ix, max: Option<Ix>) -> Self {
        Self { dim, max }
    }

    /// A dimension whose maximum equals its current size.
    pub const fn fixed(dim: Ix) -> Self {
        Self {
            dim,
            max: Some(dim),
        }
    }

    /// A dimension that may grow without limit.
    pub const fn unlimited(dim: Ix) -> Self {
        Self { dim, max: None }
    }

    /// `true` if the maximum equals the current size.
    pub fn is_fixed(&self) -> bool {
        self.max == Some(self.dim)
    }

    /// `true` if there is no maximum.
    pub fn is_unlimited(&self) -> bool {
        self.max.is_none()
    }

    /// `true` if `dim` is a legal current size for this dimension.
    pub fn accepts(&self, dim: Ix) -> bool {
        self.max.map_or(true, |max| dim <= max)
    }
}

impl From<Ix> for Extent {
    fn from(dim: Ix) -> Self {
        Self::fixed(dim)
    }
}

impl From<(Ix, Option<Ix>)> for Extent {
    fn from((dim, max): (Ix, Option<Ix>)) -> Self {
        Self::new(dim, max)
    }
}

impl From<RangeFrom<Ix>> for Extent {
    fn from(range: RangeFrom<Ix>) -> Self {
        Self::unlimited(range.start)
    }
}

impl From<RangeInclusive<Ix>> for Extent {
    fn from(range: RangeInclusive<Ix>) -> Self {
        Self::new(*range.start(), Some(*range.end()))
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.dim => write!(f, "{}", self.dim),
            Some(max) => write!(f, "{}..={max}", self.dim),
            None => write!(f, "{}..", self.dim),
        }
    }
}

/// Validated per-dimension extents of rank `1..=MAX_RANK`.
///
/// Construction guarantees `dim <= max` on every bounded dimension and
/// that the total element count fits in [`Ix`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SimpleExtents {
    inner: SmallVec<[Extent; 4]>,
}

impl SimpleExtents {
    /// Validate and collect a sequence of dimensions.
    pub fn new<I>(extents: I) -> Result<Self, SpaceError>
    where
        I: IntoIterator,
        I::Item: Into<Extent>,
    {
        let inner: SmallVec<[Extent; 4]> = extents.into_iter().map(Into::into).collect();
        if inner.is_empty() {
            return Err(SpaceError::invalid_extents(
                "simple extents need at least one dimension",
            ));
        }
        if inner.len() > MAX_RANK {
            return Err(SpaceError::invalid_extents(format!(
                "rank {} exceeds the maximum of {MAX_RANK}",
                inner.len()
            )));
        }
        for (axis, extent) in inner.iter().enumerate() {
            if let Some(max) = extent.max {
                if extent.dim > max {
                    return Err(SpaceError::invalid_extents(format!(
                        "axis {axis}: current size {} exceeds maximum {max}",
                        extent.dim
                    )));
                }
            }
        }
        if checked_product(inner.iter().map(|e| e.dim)).is_none() {
            return Err(SpaceError::invalid_extents("element count overflows u64"));
        }
        Ok(Self { inner })
    }

    /// Fixed-size dimensions.
    pub fn fixed<I: IntoIterator<Item = Ix>>(dims: I) -> Result<Self, SpaceError> {
        Self::new(dims.into_iter().map(Extent::fixed))
    }

    /// Unlimited dimensions starting at the given sizes.
    pub fn resizable<I: IntoIterator<Item = Ix>>(dims: I) -> Result<Self, SpaceError> {
        Self::new(dims.into_iter().map(Extent::unlimited))
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.inner.len()
    }

    /// Current sizes.
    pub fn dims(&self) -> Coord {
        self.inner.iter().map(|e| e.dim).collect()
    }

    /// Maximum sizes, `None` for unlimited.
    pub fn maxdims(&self) -> Vec<Option<Ix>> {
        self.inner.iter().map(|e| e.max).collect()
    }

    /// Product of the current sizes.
    pub fn element_count(&self) -> u64 {
        // Overflow was ruled out at construction.
        self.inner.iter().map(|e| e.dim).product()
    }

    /// `true` if any dimension may change size.
    pub fn is_resizable(&self) -> bool {
        self.inner.iter().any(|e| !e.is_fixed())
    }

    /// `true` if any dimension is unlimited.
    pub fn is_unlimited(&self) -> bool {
        self.inner.iter().any(Extent::is_unlimited)
    }

    /// Same maxima, new current sizes.
    pub fn extend(&self, dims: &[Ix]) -> Result<Self, SpaceError> {
        if dims.len() != self.ndim() {
            return Err(SpaceError::RankMismatch {
                expected: self.ndim(),
                got: dims.len(),
            });
        }
        Self::new(
            self.inner
                .iter()
                .zip(dims)
                .map(|(e, &dim)| Extent::new(dim, e.max)),
        )
    }
}

impl Deref for SimpleExtents {
    type Target = [Extent];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Display for SimpleExtents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, e) in self.inner.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        if self.inner.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// Shape of a dataset's address space.
///
/// # Examples
///
/// ```
/// use h5space_select::Extents;
///
/// let e = Extents::new((3, 4)).unwrap();
/// assert_eq!(e.rank(), 2);
/// assert_eq!(e.element_count(), 12);
/// assert_eq!(e.dims().as_slice(), &[3, 4]);
///
/// assert_eq!(Extents::scalar().element_count(), 1);
/// assert_eq!(Extents::null().element_count(), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Extents {
    /// Zero elements.
    Null,
    /// One element, rank 0.
    Scalar,
    /// One or more dimensions.
    Simple(SimpleExtents),
}

impl Extents {
    /// Convert any accepted shape description.
    pub fn new<T: Into<ShapeInput>>(shape: T) -> Result<Self, SpaceError> {
        shape.into().into_extents()
    }

    /// The null dataspace.
    pub const fn null() -> Self {
        Self::Null
    }

    /// The scalar dataspace.
    pub const fn scalar() -> Self {
        Self::Scalar
    }

    /// Fixed-size simple extents.
    pub fn simple<I: IntoIterator<Item = Ix>>(dims: I) -> Result<Self, SpaceError> {
        SimpleExtents::fixed(dims).map(Self::Simple)
    }

    /// Simple extents with every dimension unlimited.
    pub fn resizable<I: IntoIterator<Item = Ix>>(dims: I) -> Result<Self, SpaceError> {
        SimpleExtents::resizable(dims).map(Self::Simple)
    }

    /// Simple extents from explicit `(current, max)` pairs.
    pub fn from_extents<I>(extents: I) -> Result<Self, SpaceError>
    where
        I: IntoIterator,
        I::Item: Into<Extent>,
    {
        SimpleExtents::new(extents).map(Self::Simple)
    }

    /// Build from an explicit class tag and dimension data.
    ///
    /// `Null` and `Scalar` must come with no dimensions.
    pub fn from_parts(class: SpaceClass, extents: &[Extent]) -> Result<Self, SpaceError> {
        match class {
            SpaceClass::Null | SpaceClass::Scalar if !extents.is_empty() => {
                Err(SpaceError::invalid_extents(format!(
                    "{class:?} dataspace cannot carry {} dimension(s)",
                    extents.len()
                )))
            }
            SpaceClass::Null => Ok(Self::Null),
            SpaceClass::Scalar => Ok(Self::Scalar),
            SpaceClass::Simple => Self::from_extents(extents.iter().copied()),
        }
    }

    /// The class tag.
    pub fn class(&self) -> SpaceClass {
        match self {
            Self::Null => SpaceClass::Null,
            Self::Scalar => SpaceClass::Scalar,
            Self::Simple(_) => SpaceClass::Simple,
        }
    }

    /// Number of dimensions; 0 for null and scalar.
    pub fn rank(&self) -> usize {
        match self {
            Self::Null | Self::Scalar => 0,
            Self::Simple(e) => e.ndim(),
        }
    }

    /// Alias for [`rank`](Self::rank).
    pub fn ndim(&self) -> usize {
        self.rank()
    }

    /// Total number of addressable elements.
    pub fn element_count(&self) -> u64 {
        match self {
            Self::Null => 0,
            Self::Scalar => 1,
            Self::Simple(e) => e.element_count(),
        }
    }

    /// Current sizes (empty for null and scalar).
    pub fn dims(&self) -> Coord {
        match self {
            Self::Simple(e) => e.dims(),
            _ => Coord::new(),
        }
    }

    /// Maximum sizes (empty for null and scalar).
    pub fn maxdims(&self) -> Vec<Option<Ix>> {
        match self {
            Self::Simple(e) => e.maxdims(),
            _ => Vec::new(),
        }
    }

    /// Per-dimension view (empty for null and scalar).
    pub fn iter(&self) -> std::slice::Iter<'_, Extent> {
        let empty: &'static [Extent] = &[];
        match self {
            Self::Simple(e) => e.iter(),
            _ => empty.iter(),
        }
    }

    /// The extent of one dimension.
    pub fn extent(&self, axis: usize) -> Option<Extent> {
        self.iter().nth(axis).copied()
    }

    /// `true` for the null dataspace.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `true` for the scalar dataspace.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar)
    }

    /// `true` for simple extents.
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    /// `true` if any dimension may change size.
    pub fn is_resizable(&self) -> bool {
        match self {
            Self::Simple(e) => e.is_resizable(),
            _ => false,
        }
    }

    /// `true` if any dimension is unlimited.
    pub fn is_unlimited(&self) -> bool {
        match self {
            Self::Simple(e) => e.is_unlimited(),
            _ => false,
        }
    }

    /// New extents with the same maxima and the given current sizes.
    ///
    /// Null and scalar extents accept only an empty size list.
    pub fn extend(&self, dims: &[Ix]) -> Result<Self, SpaceError> {
        match self {
            Self::Simple(e) => e.extend(dims).map(Self::Simple),
            _ if dims.is_empty() => Ok(self.clone()),
            _ => Err(SpaceError::RankMismatch {
                expected: 0,
                got: dims.len(),
            }),
        }
    }
}

impl Default for Extents {
    fn default() -> Self {
        Self::Null
    }
}

impl From<SimpleExtents> for Extents {
    fn from(e: SimpleExtents) -> Self {
        Self::Simple(e)
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Scalar => write!(f, "scalar"),
            Self::Simple(e) => write!(f, "{e}"),
        }
    }
}
