// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! End-to-end scan behaviour on small hand-built grids.

use fieldgrid_core::{
    CellCoord, Checker, FieldGrid, GridConfig, GridError, ObjectId, Overlap, OverlapRecorder,
    ScanConfig, ScanWorker, Sphere, Vec3,
};

fn ten_by_ten() -> FieldGrid<&'static str> {
    FieldGrid::new(&GridConfig::planar(Vec3::ZERO, 100.0, 100.0, 10.0)).expect("grid")
}

fn sphere(x: f32, y: f32, r: f32) -> Sphere {
    Sphere::new(Vec3::planar(x, y), r)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn field_index(grid: &FieldGrid<&'static str>, row: usize, col: usize) -> usize {
    let cell = grid.field_at(CellCoord::new(row, col, 0)).expect("cell");
    cell.id().index()
}

fn field_indices(grid: &FieldGrid<&'static str>, id: ObjectId) -> Vec<usize> {
    let obj = grid.object(id).expect("object");
    let mut out: Vec<_> = obj.fields().iter().map(|f| f.index()).collect();
    out.sort_unstable();
    out
}

#[test]
fn nearby_pair_fires_once_and_far_object_never_pairs() {
    let mut grid = ten_by_ten();
    let a = grid.register("A", sphere(5.0, 5.0, 1.0)).expect("A");
    let b = grid.register("B", sphere(6.0, 6.0, 1.0)).expect("B");
    let c = grid.register("C", sphere(95.0, 95.0, 1.0)).expect("C");

    assert_eq!(field_indices(&grid, a), vec![field_index(&grid, 0, 0)]);
    assert_eq!(field_indices(&grid, b), vec![field_index(&grid, 0, 0)]);
    assert_eq!(field_indices(&grid, c), vec![field_index(&grid, 9, 9)]);

    let mut events = Vec::new();
    let mut checker = Checker::new(|o: &Overlap<'_, &'static str>| {
        let mut pair = [*o.first.owner(), *o.second.owner()];
        pair.sort_unstable();
        events.push(pair);
    });
    checker.scan(&mut grid);
    drop(checker);
    assert_eq!(events, vec![["A", "B"]]);
}

#[test]
fn corner_object_spans_four_cells_and_duplicates_per_shared_cell() {
    let mut grid = ten_by_ten();
    let d = grid.register("D", sphere(20.0, 20.0, 5.0)).expect("D");
    let mut cells = vec![
        field_index(&grid, 1, 1),
        field_index(&grid, 1, 2),
        field_index(&grid, 2, 1),
        field_index(&grid, 2, 2),
    ];
    cells.sort_unstable();
    assert_eq!(field_indices(&grid, d), cells);

    // E straddles the x = 20 boundary in row 1, overlapping D in two shared cells.
    let e = grid.register("E", sphere(20.0, 14.0, 2.0)).expect("E");
    assert_eq!(field_indices(&grid, e).len(), 2);

    let mut checker = Checker::new(OverlapRecorder::new());
    checker.scan(&mut grid);
    let records = checker.handler_mut().drain();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.involves(d) && r.involves(e)));
    assert_ne!(records[0].field, records[1].field);
}

#[test]
fn field_with_k_members_costs_k_choose_2_checks() {
    let mut grid = ten_by_ten();
    for (owner, x) in ["a", "b", "c", "d", "e"].into_iter().zip([1.0, 3.0, 5.0, 7.0, 9.0]) {
        grid.register(owner, sphere(x, 5.0, 0.5)).expect("register");
    }
    let config = ScanConfig {
        measure_performance: true,
    };
    let mut checker = Checker::with_config(OverlapRecorder::new(), &config);
    checker.scan(&mut grid);
    assert_eq!(checker.stats().checks, 10);
    assert_eq!(checker.stats().collisions, 0);
    assert!(checker.handler().is_empty());
}

#[test]
fn virtual_objects_record_instead_of_notifying() {
    init_tracing();
    let mut grid = ten_by_ten();
    let sensor = grid.register("sensor", sphere(15.0, 15.0, 4.0)).expect("sensor");
    let a = grid.register("a", sphere(13.0, 15.0, 1.0)).expect("a");
    let b = grid.register("b", sphere(17.0, 15.0, 1.0)).expect("b");
    let far = grid.register("far", sphere(55.0, 55.0, 1.0)).expect("far");
    grid.set_virtual(sensor, true).expect("virtual");

    let mut checker = Checker::new(OverlapRecorder::new());
    checker.scan(&mut grid);

    // a and b are 4 apart with radii 1: no overlap between them, and the
    // sensor never notifies.
    assert!(checker.handler().is_empty());
    let sensor_obj = grid.object(sensor).expect("sensor");
    let seen: Vec<_> = sensor_obj.virtual_collisions().iter().copied().collect();
    assert_eq!(seen, vec![a, b]);
    assert!(!seen.contains(&far));

    // The set accumulates until cleared or re-marked.
    checker.scan(&mut grid);
    let recorded = grid.object(sensor).expect("sensor").virtual_collisions().len();
    assert_eq!(recorded, 2);
    grid.set_virtual(sensor, true).expect("re-mark");
    assert!(grid.object(sensor).expect("sensor").virtual_collisions().is_empty());
}

#[test]
fn two_virtual_objects_record_each_other() {
    let mut grid = ten_by_ten();
    let x = grid.register("x", sphere(5.0, 5.0, 2.0)).expect("x");
    let y = grid.register("y", sphere(6.0, 5.0, 2.0)).expect("y");
    grid.set_virtual(x, true).expect("x");
    grid.set_virtual(y, true).expect("y");

    let mut checker = Checker::new(OverlapRecorder::new());
    checker.scan(&mut grid);
    assert!(checker.handler().is_empty());
    assert!(grid.object(x).expect("x").virtual_collisions().contains(&y));
    assert!(grid.object(y).expect("y").virtual_collisions().contains(&x));
}

#[test]
fn small_moves_within_budget_never_rebind() {
    let mut grid = ten_by_ten();
    let a = grid.register("a", sphere(5.0, 5.0, 1.0)).expect("a");
    let budget = grid.object(a).expect("a").travel_budget();
    assert!((budget - 4.0).abs() < 1e-5);
    let before = field_indices(&grid, a);
    grid.reset_stats();

    for x in [6.0, 7.0, 8.0] {
        grid.update(a, Vec3::planar(x, 5.0)).expect("move");
    }
    assert_eq!(grid.stats().rebinds, 0);
    assert_eq!(grid.stats().recomputes, 0);
    assert_eq!(field_indices(&grid, a), before);

    // Crossing into the next cell exhausts the budget and rebinds.
    grid.update(a, Vec3::planar(12.0, 5.0)).expect("cross");
    assert_eq!(grid.stats().rebinds, 1);
    assert_eq!(field_indices(&grid, a), vec![field_index(&grid, 0, 1)]);
}

#[test]
fn exhausted_budget_without_range_change_recomputes_but_keeps_fields() {
    let mut grid = ten_by_ten();
    let a = grid.register("a", sphere(5.0, 5.0, 1.0)).expect("a");
    grid.reset_stats();
    // Two moves of 3.5 overspend the budget of 4 but end in the starting cell.
    grid.update(a, Vec3::planar(5.0, 8.5)).expect("move");
    assert_eq!(grid.stats().recomputes, 0);
    grid.update(a, Vec3::planar(5.0, 5.0)).expect("back");
    assert_eq!(grid.stats().recomputes, 1);
    assert_eq!(grid.stats().rebinds, 0);
}

#[test]
fn moving_fully_outside_reports_out_of_grid() {
    init_tracing();
    let mut grid = ten_by_ten();
    let a = grid.register("a", sphere(5.0, 5.0, 1.0)).expect("a");
    let other = grid.register("b", sphere(5.0, 5.0, 1.0)).expect("b");
    let moved = grid.update(a, Vec3::planar(-40.0, 5.0));
    assert_eq!(moved, Err(GridError::OutOfGrid(a)));
    assert!(grid.object(a).expect("a").fields().is_empty());
    assert!(grid.fields().iter().all(|f| !f.contains(a)));
    assert_eq!(grid.populated_count(), 1);

    let mut checker = Checker::new(OverlapRecorder::new());
    checker.scan(&mut grid);
    assert!(checker.handler().is_empty());

    grid.update(a, Vec3::planar(5.0, 5.0)).expect("back inside");
    checker.scan(&mut grid);
    assert_eq!(checker.handler().len(), 1);
    assert!(checker.handler().records()[0].involves(other));
}

#[test]
fn disposal_clears_membership_and_populated_list() {
    let mut grid = ten_by_ten();
    let d = grid.register("D", sphere(20.0, 20.0, 5.0)).expect("D");
    let keep = grid.register("K", sphere(25.0, 25.0, 1.0)).expect("K");
    assert_eq!(grid.populated_count(), 4);

    assert_eq!(grid.dispose(d), Ok("D"));
    assert!(grid.fields().iter().all(|f| !f.contains(d)));
    assert_eq!(grid.populated_count(), 1);
    let first = grid.populated_fields().next();
    assert_eq!(first.map(|f| f.contains(keep)), Some(true));
    assert_eq!(grid.update(d, Vec3::ZERO), Err(GridError::UnknownObject(d)));
}

#[test]
fn volumetric_grid_separates_by_depth() {
    let cfg = GridConfig::volumetric(Vec3::ZERO, 40.0, 40.0, 40.0, 10.0);
    let mut grid: FieldGrid<u8> = FieldGrid::new(&cfg).expect("grid");
    grid.register(1, Sphere::new(Vec3::new(5.0, 5.0, 5.0), 1.0)).expect("near");
    grid.register(2, Sphere::new(Vec3::new(5.0, 5.0, 35.0), 1.0)).expect("deep");
    grid.register(3, Sphere::new(Vec3::new(5.5, 5.0, 5.0), 1.0)).expect("close");
    assert_eq!(grid.populated_count(), 2);

    let mut checker = Checker::new(OverlapRecorder::new());
    checker.scan(&mut grid);
    assert_eq!(checker.handler().len(), 1);
}

#[test]
fn worker_alternates_movement_and_scan_phases() {
    let mut grid = ten_by_ten();
    let a = grid.register("A", sphere(5.0, 5.0, 1.0)).expect("A");
    grid.register("B", sphere(6.0, 6.0, 1.0)).expect("B");
    let flags = grid.phase_flags();

    let worker = ScanWorker::spawn(Checker::new(OverlapRecorder::new())).expect("spawn");
    for _ in 0..5 {
        worker.submit(grid).expect("submit");
        grid = worker.reclaim().expect("reclaim");
        assert!(flags.objects_updatable());
        assert!(!flags.scan_allowed());
        grid.update(a, Vec3::planar(5.0, 5.0)).expect("move");
    }
    assert_eq!(worker.stats().passes, 5);
    let (checker, leftover) = worker.stop().expect("stop");
    assert!(leftover.is_empty());
    assert_eq!(checker.into_handler().len(), 5);
}
