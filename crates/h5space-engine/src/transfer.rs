//! Preparing a dataspace for one engine read or write.

use std::error::Error;
use std::fmt;

use h5space_core::{Coord, SpaceError};
use h5space_select::{Dataspace, WireSelection};
use tracing::debug;

use crate::context::{ContextError, EngineContext};
use crate::target::{EngineFault, SelectionTarget};

/// What the engine was told to move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// Elements that will move between dataset and buffer.
    pub element_count: u64,
    /// Shape of the selected block.
    pub shape: Coord,
}

/// Errors from [`prepare`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferError {
    /// The dataspace or buffer failed validation; the engine was not touched.
    Space(SpaceError),
    /// The engine rejected a call. The fault is also on the context stack.
    Engine {
        /// What the engine reported.
        fault: EngineFault,
        /// Stack depth after the fault was captured.
        depth: usize,
    },
    /// The error context could not be used.
    Context(ContextError),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "dataspace: {e}"),
            Self::Engine { fault, depth } => write!(f, "{fault} (stack depth {depth})"),
            Self::Context(e) => write!(f, "context: {e}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Engine { fault, .. } => Some(fault),
            Self::Context(e) => Some(e),
        }
    }
}

impl From<SpaceError> for TransferError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<ContextError> for TransferError {
    fn from(e: ContextError) -> Self {
        Self::Context(e)
    }
}

/// Capture a failed engine call on the context stack.
fn record(
    ctx: &EngineContext,
    operation: &'static str,
    result: Result<(), EngineFault>,
) -> Result<(), TransferError> {
    match result {
        Ok(()) => Ok(()),
        Err(fault) => {
            let depth = ctx.push(operation, fault.clone())?;
            Err(TransferError::Engine { fault, depth })
        }
    }
}

/// Validate `dataspace` against a buffer of `buffer_len` elements and
/// push it into `target`.
///
/// Deferred bounds on unlimited dimensions are checked here. A hyperslab
/// covering the whole extents is sent as `select_all`. Nothing reaches
/// the engine unless every check passes.
pub fn prepare(
    ctx: &EngineContext,
    dataspace: &Dataspace,
    buffer_len: usize,
    target: &mut dyn SelectionTarget,
) -> Result<Transfer, TransferError> {
    let dataspace = dataspace.simplified();
    let (extents, selection) = dataspace.to_wire()?;
    dataspace.check_buffer(buffer_len)?;

    record(ctx, "set_extents", target.set_extents(&extents))?;
    match &selection {
        WireSelection::All => record(ctx, "select_all", target.select_all())?,
        WireSelection::Hyperslab {
            start,
            stride,
            count,
            block,
        } => record(
            ctx,
            "select_hyperslab",
            target.select_hyperslab(start, stride, count, block),
        )?,
        WireSelection::Points { rank, coords } => record(
            ctx,
            "select_elements",
            target.select_elements(*rank, coords),
        )?,
    }

    let transfer = Transfer {
        element_count: dataspace.element_count(),
        shape: dataspace.selection_shape(),
    };
    debug!(
        %dataspace,
        kind = selection.kind(),
        elements = transfer.element_count,
        "transfer prepared"
    );
    Ok(transfer)
}

/// [`prepare`] for an in-memory slice.
pub fn prepare_slice<T>(
    ctx: &EngineContext,
    dataspace: &Dataspace,
    buffer: &[T],
    target: &mut dyn SelectionTarget,
) -> Result<Transfer, TransferError> {
    prepare(ctx, dataspace, buffer.len(), target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextConfig;
    use h5space_core::Ix;
    use h5space_select::WireExtents;

    /// Minimal in-crate target; richer mocks live in the test-utils crate.
    #[derive(Default)]
    struct CountingTarget {
        calls: Vec<&'static str>,
        fail_selection: bool,
    }

    impl CountingTarget {
        fn outcome(&self) -> Result<(), EngineFault> {
            if self.fail_selection {
                Err(EngineFault::new(-7, "selection refused"))
            } else {
                Ok(())
            }
        }
    }

    impl SelectionTarget for CountingTarget {
        fn set_extents(&mut self, _: &WireExtents) -> Result<(), EngineFault> {
            self.calls.push("set_extents");
            Ok(())
        }

        fn select_all(&mut self) -> Result<(), EngineFault> {
            self.calls.push("select_all");
            self.outcome()
        }

        fn select_hyperslab(&mut self, _: &[Ix], _: &[Ix], _: &[Ix], _: &[Ix]) -> Result<(), EngineFault> {
            self.calls.push("select_hyperslab");
            self.outcome()
        }

        fn select_elements(&mut self, _: usize, _: &[Ix]) -> Result<(), EngineFault> {
            self.calls.push("select_elements");
            self.outcome()
        }
    }

    fn ctx() -> EngineContext {
        EngineContext::new(ContextConfig {
            start_silenced: true,
            ..ContextConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn hyperslab_reaches_target() {
        let ds = Dataspace::from_shape((3, 4)).unwrap().select((1..3, ..)).unwrap();
        let mut t = CountingTarget::default();
        let transfer = prepare(&ctx(), &ds, 8, &mut t).unwrap();
        assert_eq!(transfer.element_count, 8);
        assert_eq!(transfer.shape.as_slice(), &[2, 4]);
        assert_eq!(t.calls, vec!["set_extents", "select_hyperslab"]);
    }

    #[test]
    fn covering_hyperslab_is_sent_as_all() {
        let ds = Dataspace::from_shape((3, 4)).unwrap().select((.., ..)).unwrap();
        let mut t = CountingTarget::default();
        prepare(&ctx(), &ds, 12, &mut t).unwrap();
        assert_eq!(t.calls, vec!["set_extents", "select_all"]);
    }

    #[test]
    fn buffer_mismatch_never_touches_target() {
        let ds = Dataspace::from_shape((3, 4)).unwrap().select((1..3, ..)).unwrap();
        let mut t = CountingTarget::default();
        let r = prepare_slice(&ctx(), &ds, &[0u8; 5], &mut t);
        assert_eq!(
            r,
            Err(TransferError::Space(SpaceError::BufferSizeMismatch {
                expected: 8,
                got: 5
            }))
        );
        assert!(t.calls.is_empty());
    }

    #[test]
    fn engine_fault_is_captured_and_returned() {
        let c = ctx();
        let ds = Dataspace::from_shape(4).unwrap();
        let mut t = CountingTarget {
            fail_selection: true,
            ..CountingTarget::default()
        };
        let err = prepare(&c, &ds, 4, &mut t).unwrap_err();
        assert!(matches!(err, TransferError::Engine { depth: 1, .. }));
        assert!(err.source().is_some());
        assert_eq!(c.last().unwrap().unwrap().operation, "select_all");
    }
}
