//! Core types for the h5space workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! index and coordinate types shared by every other crate, the engine's
//! rank limit, and the [`SpaceError`] taxonomy returned by extents,
//! selection, and dataspace validation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ix;

pub use error::SpaceError;
pub use ix::{checked_product, Coord, Ix, MAX_RANK, UNLIMITED};
