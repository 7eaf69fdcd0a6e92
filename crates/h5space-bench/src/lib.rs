//! Benchmark profiles and utilities for h5space.
//!
//! - [`large_grid`]: a 1000×1000 fixed dataspace (1M elements)
//! - [`random_points`]: seeded, reproducible point lists
//! - [`SinkTarget`]: an engine target that accepts everything

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use h5space_core::Ix;
use h5space_engine::{EngineFault, SelectionTarget};
use h5space_select::{Dataspace, Selection, WireExtents};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A 1000×1000 fixed-size dataspace with no selection.
pub fn large_grid() -> Dataspace {
    Dataspace::from_shape((1000, 1000)).unwrap()
}

/// Every third row and every other column of [`large_grid`], in 2×1 blocks.
pub fn strided_band() -> Dataspace {
    let sel = Selection::hyperslab(&[0, 0], &[3, 2], &[333, 500], &[2, 1]).unwrap();
    large_grid().select(sel).unwrap()
}

/// `n` points drawn uniformly inside `dims`, reproducible from `seed`.
///
/// Duplicates are possible and kept.
pub fn random_points(dims: &[Ix], n: usize, seed: u64) -> Vec<Vec<Ix>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| dims.iter().map(|&d| rng.next_u64() % d.max(1)).collect())
        .collect()
}

/// Engine target that accepts every call and keeps only a call count.
#[derive(Debug, Default)]
pub struct SinkTarget {
    /// Calls received.
    pub calls: u64,
}

impl SelectionTarget for SinkTarget {
    fn set_extents(&mut self, _extents: &WireExtents) -> Result<(), EngineFault> {
        self.calls += 1;
        Ok(())
    }

    fn select_all(&mut self) -> Result<(), EngineFault> {
        self.calls += 1;
        Ok(())
    }

    fn select_hyperslab(
        &mut self,
        _start: &[Ix],
        _stride: &[Ix],
        _count: &[Ix],
        _block: &[Ix],
    ) -> Result<(), EngineFault> {
        self.calls += 1;
        Ok(())
    }

    fn select_elements(&mut self, _rank: usize, _coords: &[Ix]) -> Result<(), EngineFault> {
        self.calls += 1;
        Ok(())
    }
}
