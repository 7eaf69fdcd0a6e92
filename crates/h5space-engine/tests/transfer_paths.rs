use std::sync::Arc;
use std::thread;

use h5space_core::{SpaceError, UNLIMITED};
use h5space_engine::{
    prepare, prepare_slice, ContextConfig, EngineContext, EngineFault, SpaceStatus, TransferError,
};
use h5space_select::{Selection, SpaceClass};
use h5space_test_utils::fixtures::{all_fixtures, appendable, row_band, scattered_points};
use h5space_test_utils::{RecordingTarget, TargetCall};

fn quiet() -> EngineContext {
    EngineContext::new(ContextConfig {
        start_silenced: true,
        ..ContextConfig::default()
    })
    .unwrap()
}

#[test]
fn row_band_pushes_four_arrays() {
    let ctx = quiet();
    let mut target = RecordingTarget::new();
    let transfer = prepare(&ctx, &row_band(), 8, &mut target).unwrap();
    assert_eq!(transfer.element_count, 8);
    assert_eq!(
        target.calls[1],
        TargetCall::SelectHyperslab {
            start: vec![1, 0],
            stride: vec![1, 1],
            count: vec![2, 4],
            block: vec![1, 1],
        }
    );
    assert!(ctx.shutdown().is_empty());
}

#[test]
fn points_push_flat_coordinates() {
    let ctx = quiet();
    let mut target = RecordingTarget::new();
    let buf = [0.0f32; 3];
    prepare_slice(&ctx, &scattered_points(), &buf, &mut target).unwrap();
    assert_eq!(
        target.last_selection(),
        Some(&TargetCall::SelectElements {
            rank: 2,
            coords: vec![0, 0, 2, 3, 1, 1],
        })
    );
}

#[test]
fn short_buffer_is_rejected_before_the_engine() {
    let ctx = quiet();
    let mut target = RecordingTarget::new();
    let err = prepare(&ctx, &row_band(), 5, &mut target).unwrap_err();
    assert_eq!(
        err,
        TransferError::Space(SpaceError::BufferSizeMismatch {
            expected: 8,
            got: 5
        })
    );
    assert_eq!(SpaceStatus::from(&err), SpaceStatus::BufferSizeMismatch);
    assert!(target.calls.is_empty());
    assert_eq!(ctx.depth().unwrap(), 0);
}

#[test]
fn deferred_bounds_are_enforced_at_transfer_time() {
    let ctx = quiet();
    let next_rows = appendable(2, 3).select((2..4, ..)).unwrap_err();
    // Bounds on unlimited dims are deferred, but index resolution still
    // checks against the current size.
    assert!(matches!(next_rows, SpaceError::OutOfBounds { axis: 0, .. }));

    let explicit = Selection::hyperslab(&[2, 0], &[1, 1], &[2, 3], &[1, 1]).unwrap();
    let pending = appendable(2, 3).select(explicit).unwrap();
    let mut target = RecordingTarget::new();
    let err = prepare(&ctx, &pending, 6, &mut target).unwrap_err();
    assert_eq!(SpaceStatus::from(&err), SpaceStatus::OutOfBounds);
    assert!(target.calls.is_empty());

    let grown = pending.extend(&[4, 3]).unwrap();
    prepare(&ctx, &grown, 6, &mut target).unwrap();
    match &target.calls[0] {
        TargetCall::SetExtents(wire) => {
            assert_eq!(wire.class, SpaceClass::Simple);
            assert_eq!(wire.dims, vec![4, 3]);
            assert_eq!(wire.maxdims, vec![UNLIMITED, 3]);
        }
        other => panic!("expected set_extents first, got {other:?}"),
    }
}

#[test]
fn engine_fault_lands_on_the_stack() {
    let ctx = quiet();
    let mut target =
        RecordingTarget::new().fail_on("select_elements", EngineFault::new(-12, "bad point"));
    let err = prepare(&ctx, &scattered_points(), 3, &mut target).unwrap_err();
    assert!(matches!(err, TransferError::Engine { depth: 1, .. }));
    assert_eq!(SpaceStatus::from(&err), SpaceStatus::EngineFault);
    assert_eq!(target.operations(), vec!["set_extents", "select_elements"]);

    let records = ctx.shutdown();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].operation, "select_elements");
    assert_eq!(records[0].fault.code, -12);
}

#[test]
fn set_extents_failure_stops_before_selection() {
    let ctx = quiet();
    let mut target =
        RecordingTarget::new().fail_on("set_extents", EngineFault::new(-1, "closed"));
    assert!(prepare(&ctx, &row_band(), 8, &mut target).is_err());
    assert_eq!(target.operations(), vec!["set_extents"]);
}

#[test]
fn every_fixture_prepares_with_an_exact_buffer() {
    let ctx = quiet();
    for space in all_fixtures() {
        let mut target = RecordingTarget::new();
        let n = usize::try_from(space.element_count()).unwrap();
        let transfer = prepare(&ctx, &space, n, &mut target).unwrap();
        assert_eq!(transfer.element_count, space.element_count(), "{space}");
        assert_eq!(target.calls.len(), 2, "{space}");
    }
    assert_eq!(ctx.depth().unwrap(), 0);
}

#[test]
fn one_context_many_threads() {
    let ctx = Arc::new(quiet());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let mut target =
                    RecordingTarget::new().fail_on("select_hyperslab", EngineFault::new(-2, "busy"));
                for _ in 0..4 {
                    assert!(prepare(&ctx, &row_band(), 8, &mut target).is_err());
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(ctx.depth().unwrap(), 16);
    let ctx = Arc::into_inner(ctx).unwrap();
    assert_eq!(ctx.shutdown().len(), 16);
}
