//! h5space: typed extents, selections and dataspaces for hierarchical
//! array files.
//!
//! The three working crates are reachable from here under short module
//! names, and [`prelude`] gathers the types a typical read or write path
//! touches: shapes, selections, the engine target and the error context.
//!
//! # Quick start
//!
//! ```rust
//! use h5space::prelude::*;
//!
//! // A 3×4 dataset; select rows 1 and 2.
//! let space = Dataspace::from_shape((3, 4)).unwrap();
//! let rows = space.select((1..3, ..)).unwrap();
//! assert_eq!(rows.element_count(), 8);
//!
//! // A buffer of the wrong length is refused before the engine sees it.
//! assert!(matches!(
//!     rows.check_buffer(5),
//!     Err(SpaceError::BufferSizeMismatch { expected: 8, got: 5 })
//! ));
//!
//! // The engine receives four parallel arrays.
//! let (_, wire) = rows.to_wire().unwrap();
//! assert_eq!(
//!     wire,
//!     WireSelection::Hyperslab {
//!         start: vec![1, 0],
//!         stride: vec![1, 1],
//!         count: vec![2, 4],
//!         block: vec![1, 1],
//!     }
//! );
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `h5space-core` | `Ix`, `Coord`, `MAX_RANK`, `SpaceError` |
//! | [`select`] | `h5space-select` | Extents, selections, dataspaces, wire forms, conversion |
//! | [`engine`] | `h5space-engine` | Error context, engine target trait, transfer preparation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Index types and the error taxonomy (`h5space-core`).
pub use h5space_core as types;

/// Extents, selections and dataspaces (`h5space-select`).
///
/// Client-side shape and selection descriptions enter through
/// [`select::convert`]; the engine's flat arrays live in [`select::wire`].
pub use h5space_select as select;

/// Storage-engine boundary (`h5space-engine`).
///
/// [`engine::EngineContext`] holds the fault stack; [`engine::prepare`]
/// validates a dataspace against a buffer and pushes it into a
/// [`engine::SelectionTarget`].
pub use h5space_engine as engine;

/// Common imports for typical h5space usage.
///
/// ```rust
/// use h5space::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use h5space_core::{Coord, Ix, SpaceError, MAX_RANK, UNLIMITED};

    // Shapes and selections
    pub use h5space_select::{
        BoundsCheck, Dataspace, DimSelect, Extent, Extents, Hyperslab, HyperslabDim, Points,
        Selection, SpaceClass,
    };

    // Wire forms
    pub use h5space_select::{WireExtents, WireSelection};

    // Engine boundary
    pub use h5space_engine::{
        prepare, ContextConfig, EngineContext, EngineFault, SelectionTarget, SpaceStatus,
        Transfer, TransferError,
    };
}
