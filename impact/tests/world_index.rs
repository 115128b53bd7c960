use std::sync::Arc;

use impact::{collect_window, CellProps, Mask, Population, Vec2f, Vec2i, WindowSize, WorldGrid};

#[test]
fn body_on_any_cell_corner_sees_its_own_cell() {
    let grid = WorldGrid::new(16, 12, 32).unwrap();
    let pop = Population::new();
    for col in 0..16u32 {
        for row in 0..12u32 {
            let corner = Vec2f::new((col * 32) as f32, (row * 32) as f32);
            for size in [WindowSize { cols: 1, rows: 1 }, WindowSize { cols: 3, rows: 2 }, WindowSize::default()] {
                let cells = collect_window(&grid, &pop, corner, size);
                assert!(
                    cells.iter().any(|c| c.col == col && c.row == row),
                    "corner of ({col}, {row}) missing from {size:?}"
                );
            }
        }
    }
}

#[test]
fn window_tops_out_at_requested_extent() {
    let grid = WorldGrid::new(50, 50, 32).unwrap();
    let population = Population::new();
    let cells = collect_window(&grid, &population, Vec2f::new(800.0, 800.0), WindowSize { cols: 6, rows: 4 });
    // start = centre - size/2 and end = start + size, both inclusive
    assert_eq!(cells.len(), 7 * 5);
    assert_eq!((cells[0].col, cells[0].row), (22, 23));
}

#[test]
fn occupant_index_survives_a_long_walk() {
    let mut grid = WorldGrid::new(24, 24, 32).unwrap();
    let mut pop = Population::new();
    let shell = Arc::new(Mask::circle(20));
    let ids: Vec<_> = (0..5)
        .map(|i| pop.spawn(&mut grid, "shell", Arc::clone(&shell), Vec2i::new(40 * i, 40 * i), CellProps::CLEAR).unwrap())
        .collect();
    for step in 0..200i32 {
        for (k, id) in ids.iter().enumerate() {
            let k = k as i32;
            let tl = Vec2i::new((step * 7 + k * 53) % 700 - 20, (step * 11 + k * 31) % 700 - 20);
            // walks partly outside the grid now and then; those moves are rejected
            let _ = pop.relocate(&mut grid, *id, tl, None);
        }
        assert!(grid.occupants_consistent(), "diverged at step {step}");
    }
    for id in ids {
        pop.despawn(&mut grid, id).unwrap();
    }
    assert_eq!(grid.occupant_count(), 0);
    for (col, row) in (impact::CellRange { col_start: 0, row_start: 0, col_end: 23, row_end: 23 }).iter() {
        assert!(!grid.get_cell(col, row).unwrap().is_occupied());
    }
}
