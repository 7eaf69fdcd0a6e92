//! Boundary between h5space dataspaces and the storage engine.
//!
//! The engine keeps a process-wide error stack and a switch that silences
//! its diagnostics. Here both live in one explicitly created
//! [`EngineContext`]. [`transfer::prepare`] validates a
//! [`Dataspace`](h5space_select::Dataspace) against an I/O buffer and
//! pushes its wire form into a borrowed [`SelectionTarget`]. Engine
//! failures are captured on the context and surfaced as
//! [`TransferError::Engine`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod status;
pub mod target;
pub mod transfer;

pub use config::{ConfigError, ContextConfig, MAX_STACK_DEPTH};
pub use context::{ContextError, EngineContext, ErrorRecord};
pub use status::SpaceStatus;
pub use target::{EngineFault, SelectionTarget};
pub use transfer::{prepare, prepare_slice, Transfer, TransferError};
