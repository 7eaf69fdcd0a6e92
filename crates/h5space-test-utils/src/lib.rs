//! Test utilities and mock engine targets for h5space development.
//!
//! Provides [`RecordingTarget`], a [`SelectionTarget`] that records every
//! call and can be told to fail, plus canned dataspaces in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use h5space_core::Ix;
use h5space_engine::{EngineFault, SelectionTarget};
use h5space_select::WireExtents;

/// One call received by a [`RecordingTarget`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetCall {
    SetExtents(WireExtents),
    SelectAll,
    SelectHyperslab {
        start: Vec<Ix>,
        stride: Vec<Ix>,
        count: Vec<Ix>,
        block: Vec<Ix>,
    },
    SelectElements {
        rank: usize,
        coords: Vec<Ix>,
    },
}

impl TargetCall {
    /// Name of the engine operation, matching the context's record names.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SetExtents(_) => "set_extents",
            Self::SelectAll => "select_all",
            Self::SelectHyperslab { .. } => "select_hyperslab",
            Self::SelectElements { .. } => "select_elements",
        }
    }
}

/// Mock engine handle.
///
/// Every call is appended to [`calls`](RecordingTarget::calls), including
/// calls that fail. Arm a failure with
/// [`fail_on`](RecordingTarget::fail_on) before passing the target to
/// code under test.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub calls: Vec<TargetCall>,
    fail_on: Option<(&'static str, EngineFault)>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation fail with `fault`.
    pub fn fail_on(mut self, operation: &'static str, fault: EngineFault) -> Self {
        self.fail_on = Some((operation, fault));
        self
    }

    /// Names of the operations received, in order.
    pub fn operations(&self) -> Vec<&'static str> {
        self.calls.iter().map(TargetCall::operation).collect()
    }

    /// The last selection call, if any.
    pub fn last_selection(&self) -> Option<&TargetCall> {
        self.calls
            .iter()
            .rev()
            .find(|c| !matches!(c, TargetCall::SetExtents(_)))
    }

    fn receive(&mut self, call: TargetCall) -> Result<(), EngineFault> {
        let operation = call.operation();
        self.calls.push(call);
        match &self.fail_on {
            Some((op, fault)) if *op == operation => Err(fault.clone()),
            _ => Ok(()),
        }
    }
}

impl SelectionTarget for RecordingTarget {
    fn set_extents(&mut self, extents: &WireExtents) -> Result<(), EngineFault> {
        self.receive(TargetCall::SetExtents(extents.clone()))
    }

    fn select_all(&mut self) -> Result<(), EngineFault> {
        self.receive(TargetCall::SelectAll)
    }

    fn select_hyperslab(
        &mut self,
        start: &[Ix],
        stride: &[Ix],
        count: &[Ix],
        block: &[Ix],
    ) -> Result<(), EngineFault> {
        self.receive(TargetCall::SelectHyperslab {
            start: start.to_vec(),
            stride: stride.to_vec(),
            count: count.to_vec(),
            block: block.to_vec(),
        })
    }

    fn select_elements(&mut self, rank: usize, coords: &[Ix]) -> Result<(), EngineFault> {
        self.receive(TargetCall::SelectElements {
            rank,
            coords: coords.to_vec(),
        })
    }
}
