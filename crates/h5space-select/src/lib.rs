//! Extents, selections and dataspaces for HDF5-style datasets.
//!
//! This crate answers two questions about a multidimensional dataset:
//! what is the shape of its address space ([`Extents`]), and which
//! elements does an I/O call touch ([`Selection`]). A [`Dataspace`] pairs
//! the two and produces the flat-array [wire forms](wire) the storage
//! engine consumes.
//!
//! # Selection model
//!
//! Only the engine's native forms are representable: everything, an
//! ordered list of points, or one regular hyperslab. Client-side
//! descriptions (integers, ranges, tuples, index lists) enter through the
//! closed [`convert`] layer.
//!
//! ```
//! use h5space_select::Dataspace;
//!
//! let space = Dataspace::from_shape((3, 4)).unwrap();
//! let picked = space.select(vec![vec![0, 0], vec![2, 3]]).unwrap();
//! assert_eq!(picked.element_count(), 2);
//!
//! let coords: Vec<Vec<u64>> = picked.coords().map(|c| c.to_vec()).collect();
//! assert_eq!(coords, vec![vec![0, 0], vec![2, 3]]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod convert;
pub mod dataspace;
pub mod extents;
pub mod iter;
pub mod selection;
pub mod wire;

#[cfg(test)]
pub(crate) mod compliance;

pub use convert::{DimSelect, SelectionInput, ShapeInput};
pub use dataspace::Dataspace;
pub use extents::{Extent, Extents, SimpleExtents, SpaceClass};
pub use h5space_core::{Coord, Ix, SpaceError, MAX_RANK, UNLIMITED};
pub use iter::{linear_index, SelectionIter};
pub use selection::{BoundsCheck, Hyperslab, HyperslabDim, Points, Selection};
pub use wire::{WireExtents, WireSelection};
