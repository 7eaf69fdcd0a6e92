//! Dataspace contract test helpers.
//!
//! These functions check the invariants every valid [`Dataspace`] must
//! satisfy, whatever its extents class or selection kind.

use crate::dataspace::Dataspace;
use h5space_core::Ix;
use indexmap::IndexSet;

/// Assert that iteration yields exactly `element_count` coordinates.
pub fn assert_count_matches_iteration(space: &Dataspace) {
    let n = space.coords().count() as u64;
    assert_eq!(
        n,
        space.element_count(),
        "{space}: iterated {n} coords, element_count is {}",
        space.element_count()
    );
    assert_eq!(space.coords().len() as u64, n, "{space}: len() disagrees");
}

/// Assert that two iterations produce the same sequence.
pub fn assert_iteration_restartable(space: &Dataspace) {
    let a: Vec<_> = space.coords().collect();
    let b: Vec<_> = space.coords().collect();
    assert_eq!(a, b, "{space}: coords() is not restartable");
}

/// Assert that every coordinate has the dataspace's rank and lies inside
/// the current extents.
pub fn assert_coords_in_bounds(space: &Dataspace) {
    let dims = space.extents().dims();
    for coord in space.coords() {
        assert_eq!(coord.len(), space.rank(), "{space}: coord {coord:?} has wrong rank");
        for (axis, (&c, &d)) in coord.iter().zip(dims.iter()).enumerate() {
            assert!(c < d, "{space}: coord {coord:?} out of bounds on axis {axis}");
        }
    }
}

/// Assert that regular selections never repeat a coordinate.
pub fn assert_regular_coords_unique(space: &Dataspace) {
    if space.selection().is_points() {
        return;
    }
    let unique: IndexSet<Vec<Ix>> = space.coords().map(|c| c.to_vec()).collect();
    assert_eq!(
        unique.len() as u64,
        space.element_count(),
        "{space}: regular selection repeats coordinates"
    );
}

/// Assert that `validate` is idempotent and succeeds.
pub fn assert_validate_idempotent(space: &Dataspace) {
    assert_eq!(space.validate(), Ok(()), "{space}: validate failed");
    assert_eq!(space.validate(), space.validate());
}

/// Assert that the wire form rebuilds an equal dataspace.
pub fn assert_wire_round_trip(space: &Dataspace) {
    let (extents, selection) = space.to_wire().expect("valid dataspace has a wire form");
    let back = Dataspace::from_wire(extents, selection).expect("wire form rebuilds");
    assert_eq!(&back, space, "{space}: wire round trip changed the dataspace");
}

/// Assert the buffer contract accepts exactly `element_count` elements.
pub fn assert_buffer_contract(space: &Dataspace) {
    let n = usize::try_from(space.element_count()).expect("test spaces are small");
    assert!(space.check_buffer(n).is_ok(), "{space}: exact buffer rejected");
    assert!(space.check_buffer(n + 1).is_err(), "{space}: oversized buffer accepted");
}

/// Assert that simplification preserves the selected coordinates.
pub fn assert_simplified_equivalent(space: &Dataspace) {
    let simple = space.simplified();
    assert_eq!(simple.element_count(), space.element_count());
    let a: Vec<_> = simple.coords().collect();
    let b: Vec<_> = space.coords().collect();
    assert_eq!(a, b, "{space}: simplification changed the coordinates");
}

/// Run every check on a fully valid dataspace.
pub fn run_full_compliance(space: &Dataspace) {
    assert_count_matches_iteration(space);
    assert_iteration_restartable(space);
    assert_coords_in_bounds(space);
    assert_regular_coords_unique(space);
    assert_validate_idempotent(space);
    assert_wire_round_trip(space);
    assert_buffer_contract(space);
    assert_simplified_equivalent(space);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extents::{Extent, Extents};
    use crate::selection::Selection;

    fn spaces() -> Vec<Dataspace> {
        let grid = Dataspace::from_shape((3, 4)).unwrap();
        let open = Dataspace::new(
            Extents::from_extents([Extent::unlimited(5), Extent::new(2, Some(8))]).unwrap(),
        );
        vec![
            Dataspace::new(Extents::null()),
            Dataspace::new(Extents::scalar()),
            Dataspace::with_selection(grid.extents().clone(), Selection::All).unwrap(),
            grid.clone(),
            grid.select((1..3, ..)).unwrap(),
            grid.select((.., ..)).unwrap(),
            grid.select((0..3, 1..4)).unwrap(),
            grid.select(vec![vec![0, 0], vec![2, 3], vec![0, 0]]).unwrap(),
            grid.select(Selection::hyperslab(&[0, 0], &[2, 2], &[2, 2], &[1, 2]).unwrap())
                .unwrap(),
            grid.select(Selection::hyperslab(&[0, 0], &[1, 1], &[0, 4], &[1, 1]).unwrap())
                .unwrap(),
            Dataspace::new(Extents::scalar())
                .select(Selection::hyperslab(&[], &[], &[], &[]).unwrap())
                .unwrap(),
            open.clone(),
            open.select((-1, ..)).unwrap(),
            Dataspace::from_shape(10).unwrap().select(vec![9, 0, 4]).unwrap(),
        ]
    }

    #[test]
    fn every_fixture_is_compliant() {
        for space in spaces() {
            run_full_compliance(&space);
        }
    }
}
