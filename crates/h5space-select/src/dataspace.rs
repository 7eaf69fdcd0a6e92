//! Extents paired with an optional selection.

use std::fmt;

use h5space_core::{Coord, Ix, SpaceError};
use tracing::{debug, trace};

use crate::convert::{SelectionInput, ShapeInput};
use crate::extents::Extents;
use crate::iter::SelectionIter;
use crate::selection::{BoundsCheck, Selection};
use crate::wire::{WireExtents, WireSelection};

static ALL: Selection = Selection::All;

/// The complete description of which elements an I/O call touches.
///
/// An immutable value: operations that change the extents or selection
/// return a new `Dataspace`.
///
/// # Examples
///
/// ```
/// use h5space_select::Dataspace;
///
/// let space = Dataspace::from_shape((3, 4)).unwrap();
/// let rows = space.select((1..3, ..)).unwrap();
/// assert_eq!(rows.element_count(), 8);
/// assert_eq!(rows.selection_shape().as_slice(), &[2, 4]);
/// assert!(rows.check_buffer(8).is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dataspace {
    extents: Extents,
    selection: Option<Selection>,
}

impl Dataspace {
    /// A dataspace with no active selection.
    pub fn new(extents: Extents) -> Self {
        Self {
            extents,
            selection: None,
        }
    }

    /// Shortcut for `Dataspace::new(Extents::new(shape)?)`.
    pub fn from_shape<T: Into<ShapeInput>>(shape: T) -> Result<Self, SpaceError> {
        Extents::new(shape).map(Self::new)
    }

    /// Attach a selection, checking rank and bounds.
    ///
    /// Bounds along unlimited dimensions are deferred to [`validate`](Self::validate).
    /// `Selection::All` is the same as no selection and is stored as such.
    pub fn with_selection(extents: Extents, selection: Selection) -> Result<Self, SpaceError> {
        if let Err(e) = selection.validate(&extents, BoundsCheck::Bounded) {
            debug!(%extents, %selection, error = %e, "selection rejected");
            return Err(e);
        }
        if extents.is_unlimited() && !selection.is_all() {
            trace!(%extents, %selection, "bounds on unlimited dimensions deferred");
        }
        Ok(Self {
            extents,
            selection: (!selection.is_all()).then_some(selection),
        })
    }

    /// Convert `input` against these extents and attach it.
    pub fn select<T: Into<SelectionInput>>(&self, input: T) -> Result<Self, SpaceError> {
        let selection = input.into().into_selection(&self.extents)?;
        Self::with_selection(self.extents.clone(), selection)
    }

    /// Full validation, including deferred unlimited dimensions.
    ///
    /// Never modifies the dataspace, so repeated calls agree.
    pub fn validate(&self) -> Result<(), SpaceError> {
        self.selection()
            .validate(&self.extents, BoundsCheck::Eager)
            .inspect_err(|e| debug!(dataspace = %self, error = %e, "validation failed"))
    }

    /// Same selection over new current sizes.
    pub fn extend(&self, dims: &[Ix]) -> Result<Self, SpaceError> {
        let extents = self.extents.extend(dims)?;
        match &self.selection {
            None => Ok(Self::new(extents)),
            Some(sel) => Self::with_selection(extents, sel.clone()),
        }
    }

    /// The extents.
    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// The active selection, `All` if none was set.
    pub fn selection(&self) -> &Selection {
        self.selection.as_ref().unwrap_or(&ALL)
    }

    /// `true` if a selection was explicitly attached.
    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// Rank of the extents.
    pub fn rank(&self) -> usize {
        self.extents.rank()
    }

    /// Number of elements an I/O call moves.
    pub fn element_count(&self) -> u64 {
        self.selection().element_count(&self.extents)
    }

    /// Shape of the selected block.
    ///
    /// Hyperslabs give `count * block` per dimension, points give
    /// `[npoints]`, and `All` gives the extents' dimensions.
    pub fn selection_shape(&self) -> Coord {
        match self.selection() {
            Selection::All => self.extents.dims(),
            Selection::Points(p) => Coord::from_elem(p.len() as Ix, 1),
            Selection::Hyperslab(h) => h.shape(),
        }
    }

    /// Selected coordinates in transfer order.
    pub fn coords(&self) -> SelectionIter<'_> {
        self.selection().coords(&self.extents)
    }

    /// Validate, then produce the engine's view.
    pub fn to_wire(&self) -> Result<(WireExtents, WireSelection), SpaceError> {
        self.validate()?;
        Ok((self.extents.to_wire(), self.selection().to_wire()))
    }

    /// Rebuild from the engine's view.
    pub fn from_wire(extents: WireExtents, selection: WireSelection) -> Result<Self, SpaceError> {
        Self::with_selection(extents.into_extents()?, selection.into_selection()?)
    }

    /// Fail unless a buffer of `len` elements matches the selection.
    pub fn check_buffer(&self, len: usize) -> Result<(), SpaceError> {
        let expected = self.element_count();
        let got = len as u64;
        if got != expected {
            return Err(SpaceError::BufferSizeMismatch { expected, got });
        }
        Ok(())
    }

    /// Drop a hyperslab that covers every element.
    pub fn simplified(&self) -> Self {
        match &self.selection {
            Some(sel) if sel.covers(&self.extents) => Self::new(self.extents.clone()),
            _ => self.clone(),
        }
    }
}

impl From<Extents> for Dataspace {
    fn from(extents: Extents) -> Self {
        Self::new(extents)
    }
}

impl fmt::Display for Dataspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.extents, self.selection())
    }
}
