//! Canned dataspaces for engine and benchmark tests.
//!
//! - [`grid_3x4`]: fixed 3×4 extents, no selection.
//! - [`row_band`]: rows `1..3` of the grid as a hyperslab (8 elements).
//! - [`scattered_points`]: three points of the grid in non-storage order.
//! - [`appendable`]: unlimited rows over a fixed column count.

use h5space_core::Ix;
use h5space_select::{Dataspace, Extent, Extents, Selection};

/// Fixed 3×4 extents with no selection.
pub fn grid_3x4() -> Dataspace {
    Dataspace::from_shape((3, 4)).expect("3x4 is valid")
}

/// Rows `1..3` of [`grid_3x4`].
pub fn row_band() -> Dataspace {
    grid_3x4().select((1..3, ..)).expect("rows 1..3 fit in 3x4")
}

/// Points `(0,0)`, `(2,3)`, `(1,1)` of [`grid_3x4`], in that order.
pub fn scattered_points() -> Dataspace {
    grid_3x4()
        .select(vec![vec![0, 0], vec![2, 3], vec![1, 1]])
        .expect("points fit in 3x4")
}

/// `rows` unlimited rows of `cols` fixed columns.
pub fn appendable(rows: Ix, cols: Ix) -> Dataspace {
    Dataspace::new(
        Extents::from_extents([Extent::unlimited(rows), Extent::fixed(cols)])
            .expect("appendable extents are valid"),
    )
}

/// Every-other row and column of an `n`×`n` grid, in 1×1 blocks.
pub fn checkerboard(n: Ix) -> Dataspace {
    let half = n.div_ceil(2);
    let sel = Selection::hyperslab(&[0, 0], &[2, 2], &[half, half], &[1, 1])
        .expect("checkerboard is regular");
    Dataspace::new(Extents::simple([n, n]).expect("square extents are valid"))
        .select(sel)
        .expect("checkerboard fits")
}

/// One of each extents class and selection kind.
pub fn all_fixtures() -> Vec<Dataspace> {
    vec![
        Dataspace::new(Extents::null()),
        Dataspace::new(Extents::scalar()),
        grid_3x4(),
        row_band(),
        scattered_points(),
        appendable(4, 3),
        checkerboard(5),
    ]
}
