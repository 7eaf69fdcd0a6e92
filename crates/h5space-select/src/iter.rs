//! Lazy row-major coordinate iteration over a selection.

use std::iter::FusedIterator;

use h5space_core::{Coord, Ix};
use smallvec::SmallVec;

use crate::extents::Extents;
use crate::selection::{HyperslabDim, Hyperslab, Points};

/// Iterator over the coordinates of a selection, in transfer order.
///
/// Created by [`Selection::coords`](crate::Selection::coords). Hyperslabs
/// and `All` walk an odometer with the last dimension varying fastest;
/// points are yielded in stored order.
#[derive(Clone, Debug)]
pub struct SelectionIter<'a> {
    kind: IterKind<'a>,
}

#[derive(Clone, Debug)]
enum IterKind<'a> {
    Empty,
    Block(BlockCursor),
    Points {
        points: &'a Points,
        next: usize,
    },
}

/// Odometer over the per-dimension positions of a regular box.
#[derive(Clone, Debug)]
struct BlockCursor {
    dims: SmallVec<[HyperslabDim; 4]>,
    lens: Coord,
    ks: Coord,
    remaining: u64,
}

impl BlockCursor {
    fn new(dims: SmallVec<[HyperslabDim; 4]>) -> Self {
        let lens: Coord = dims.iter().map(HyperslabDim::len).collect();
        let remaining = lens.iter().product();
        let ks = SmallVec::from_elem(0, dims.len());
        Self {
            dims,
            lens,
            ks,
            remaining,
        }
    }

    fn next(&mut self) -> Option<Coord> {
        if self.remaining == 0 {
            return None;
        }
        let coord = self
            .dims
            .iter()
            .zip(&self.ks)
            .map(|(d, &k)| d.position(k))
            .collect();
        self.remaining -= 1;
        for axis in (0..self.ks.len()).rev() {
            self.ks[axis] += 1;
            if self.ks[axis] < self.lens[axis] {
                break;
            }
            self.ks[axis] = 0;
        }
        Some(coord)
    }
}

impl<'a> SelectionIter<'a> {
    pub(crate) fn all(extents: &Extents) -> Self {
        if extents.is_null() {
            return Self {
                kind: IterKind::Empty,
            };
        }
        // Scalar has no dimensions: the odometer yields one empty coord.
        let dims = extents
            .iter()
            .map(|e| HyperslabDim::range(0..e.dim))
            .collect();
        Self {
            kind: IterKind::Block(BlockCursor::new(dims)),
        }
    }

    pub(crate) fn hyperslab(hyper: &Hyperslab) -> Self {
        Self {
            kind: IterKind::Block(BlockCursor::new(hyper.iter().copied().collect())),
        }
    }

    pub(crate) fn points(points: &'a Points) -> Self {
        Self {
            kind: IterKind::Points { points, next: 0 },
        }
    }

    /// Number of coordinates left, as a `u64`.
    pub fn remaining(&self) -> u64 {
        match &self.kind {
            IterKind::Empty => 0,
            IterKind::Block(cursor) => cursor.remaining,
            IterKind::Points { points, next } => (points.len() - next) as u64,
        }
    }
}

impl Iterator for SelectionIter<'_> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        match &mut self.kind {
            IterKind::Empty => None,
            IterKind::Block(cursor) => cursor.next(),
            IterKind::Points { points, next } => {
                let point = points.get(*next)?;
                *next += 1;
                Some(point.iter().copied().collect())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

impl ExactSizeIterator for SelectionIter<'_> {}

impl FusedIterator for SelectionIter<'_> {}

/// Row-major linear offset of `coord` within `dims`.
///
/// Used to compare transfer order against storage order.
pub fn linear_index(coord: &[Ix], dims: &[Ix]) -> Ix {
    coord
        .iter()
        .zip(dims)
        .fold(0, |acc, (&c, &d)| acc * d + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use proptest::prelude::*;

    fn collect(sel: &Selection, extents: &Extents) -> Vec<Vec<Ix>> {
        sel.coords(extents).map(|c| c.to_vec()).collect()
    }

    // ── All ─────────────────────────────────────────────────────

    #[test]
    fn all_walks_row_major() {
        let e = Extents::simple([2, 3]).unwrap();
        let got = collect(&Selection::all(), &e);
        assert_eq!(
            got,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }

    #[test]
    fn scalar_all_yields_one_empty_coord() {
        let got = collect(&Selection::all(), &Extents::scalar());
        assert_eq!(got, vec![Vec::<Ix>::new()]);
    }

    #[test]
    fn null_all_yields_nothing() {
        let sel = Selection::all();
        let mut it = sel.coords(&Extents::null());
        assert_eq!(it.len(), 0);
        assert!(it.next().is_none());
    }

    #[test]
    fn zero_sized_dim_yields_nothing() {
        let e = Extents::simple([3, 0]).unwrap();
        assert_eq!(Selection::all().coords(&e).count(), 0);
    }

    // ── Hyperslabs ──────────────────────────────────────────────

    #[test]
    fn blocked_hyperslab_positions() {
        let e = Extents::simple([8]).unwrap();
        let sel = Selection::hyperslab(&[1], &[4], &[2], &[2]).unwrap();
        assert_eq!(
            collect(&sel, &e),
            vec![vec![1], vec![2], vec![5], vec![6]]
        );
    }

    #[test]
    fn strided_rows() {
        let e = Extents::simple([4, 4]).unwrap();
        let sel = Selection::hyperslab(&[0, 1], &[2, 1], &[2, 2], &[1, 1]).unwrap();
        assert_eq!(
            collect(&sel, &e),
            vec![vec![0, 1], vec![0, 2], vec![2, 1], vec![2, 2]]
        );
    }

    // ── Points ──────────────────────────────────────────────────

    #[test]
    fn points_keep_stored_order() {
        let e = Extents::simple([3, 4]).unwrap();
        let sel = Selection::points([[2u64, 3], [0, 0], [2, 3]]).unwrap();
        assert_eq!(
            collect(&sel, &e),
            vec![vec![2, 3], vec![0, 0], vec![2, 3]]
        );
    }

    #[test]
    fn empty_points_yield_nothing() {
        let sel = Selection::points(Vec::<Vec<Ix>>::new()).unwrap();
        assert_eq!(sel.coords(&Extents::null()).count(), 0);
    }

    // ── Iterator protocol ───────────────────────────────────────

    #[test]
    fn exact_size_tracks_progress() {
        let e = Extents::simple([3, 4]).unwrap();
        let sel = Selection::all();
        let mut it = sel.coords(&e);
        assert_eq!(it.len(), 12);
        it.next();
        it.next();
        assert_eq!(it.len(), 10);
        assert_eq!(it.remaining(), 10);
    }

    #[test]
    fn clones_are_independent() {
        let e = Extents::simple([2, 2]).unwrap();
        let sel = Selection::all();
        let mut a = sel.coords(&e);
        a.next();
        let b = a.clone();
        assert_eq!(a.collect::<Vec<_>>(), b.collect::<Vec<_>>());
    }

    #[test]
    fn fused_after_exhaustion() {
        let e = Extents::simple([1]).unwrap();
        let sel = Selection::all();
        let mut it = sel.coords(&e);
        assert!(it.next().is_some());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn linear_index_row_major() {
        assert_eq!(linear_index(&[1, 2], &[3, 4]), 6);
        assert_eq!(linear_index(&[], &[]), 0);
    }

    // ── Property tests ──────────────────────────────────────────

    proptest! {
        #[test]
        fn count_matches_element_count(
            dims in proptest::collection::vec(1u64..6, 1..4),
            seed in proptest::collection::vec((0u64..3, 1u64..3, 0u64..3, 1u64..3), 4),
        ) {
            let e = Extents::resizable(dims.iter().copied()).unwrap();
            let hyper = Hyperslab::new(dims.iter().zip(&seed).map(|(_, &(s, st, c, b))| {
                let stride = st.max(b);
                HyperslabDim::new(s, stride, c, b).unwrap()
            })).unwrap();
            let sel = Selection::from(hyper);
            let n = sel.coords(&e).count() as u64;
            prop_assert_eq!(n, sel.element_count(&e));
        }

        #[test]
        fn all_is_strictly_increasing_in_storage_order(dims in proptest::collection::vec(1u64..5, 1..4)) {
            let e = Extents::simple(dims.iter().copied()).unwrap();
            let offsets: Vec<_> = Selection::all()
                .coords(&e)
                .map(|c| linear_index(&c, &dims))
                .collect();
            prop_assert_eq!(offsets.len() as u64, e.element_count());
            for (i, off) in offsets.iter().enumerate() {
                prop_assert_eq!(*off, i as u64);
            }
        }
    }
}
