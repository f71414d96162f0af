//! Property-based tests for grids and geometry helpers.
//!
//! Run with: cargo test -p skin-types -- proptest

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]

use proptest::prelude::*;
use skin_types::{CellShape, Grid, GridCell, area_triangle, place_segments};

// =============================================================================
// Strategies
// =============================================================================

fn arb_cell() -> impl Strategy<Value = GridCell> {
    prop::array::uniform2(-1.0..1.0f64).prop_map(GridCell::from)
}

/// A grid with 1 to 40 cells and a dimension of 1 or 3.
fn arb_grid() -> impl Strategy<Value = Grid> {
    (prop::collection::vec(arb_cell(), 1..40), prop_oneof![Just(1usize), Just(3usize)])
        .prop_map(|(cells, dim)| Grid::from_sensors(dim, CellShape::square(0.01), cells))
}

/// A grid together with a sorted, duplicate-free subset of its cell indices.
fn arb_grid_and_indices() -> impl Strategy<Value = (Grid, Vec<usize>)> {
    arb_grid().prop_flat_map(|grid| {
        let n = grid.num_cells();
        let indices = prop::collection::vec(any::<bool>(), n).prop_map(|mask| {
            mask.iter()
                .enumerate()
                .filter_map(|(i, &erase)| erase.then_some(i))
                .collect::<Vec<_>>()
        });
        (Just(grid), indices)
    })
}

// =============================================================================
// Property Tests: Geometry
// =============================================================================

proptest! {
    /// Triangle area does not depend on vertex order.
    #[test]
    fn area_is_permutation_invariant(a in arb_cell(), b in arb_cell(), c in arb_cell()) {
        let reference = area_triangle(a, b, c);
        for area in [
            area_triangle(a, c, b),
            area_triangle(b, a, c),
            area_triangle(b, c, a),
            area_triangle(c, a, b),
            area_triangle(c, b, a),
        ] {
            prop_assert!((area - reference).abs() <= 1e-12);
        }
        prop_assert!(reference >= 0.0);
    }

    /// Placed segments fit inside the interval and are centered in it.
    #[test]
    fn segments_fit_and_are_centered(t0 in -10.0..10.0f64, len in 0.0..20.0f64, dt in 0.01..5.0f64) {
        let t1 = t0 + len;
        let p = place_segments(t0, t1, dt).unwrap();
        let end = p.origin + p.num as f64 * dt;

        prop_assert!(p.origin >= t0 - 1e-9);
        prop_assert!(end <= t1 + 1e-9);
        prop_assert!(((p.origin - t0) - (t1 - end)).abs() <= 1e-9);
        prop_assert!(t1 - end < dt + 1e-9);
        prop_assert!((p.first_center - p.origin - 0.5 * dt).abs() < 1e-12);
    }
}

// =============================================================================
// Property Tests: Grid
// =============================================================================

proptest! {
    /// Every written value is read back exactly.
    #[test]
    fn set_value_round_trips(grid in arb_grid(), seed in -1e6..1e6f64) {
        let mut grid = grid;
        let dim = grid.dim();
        for i in 0..grid.num_cells() {
            for d in 0..dim {
                grid.set_value(i, d, seed + (i * dim + d) as f64).unwrap();
            }
        }
        for i in 0..grid.num_cells() {
            for d in 0..dim {
                prop_assert_eq!(grid.value(i, d).unwrap(), seed + (i * dim + d) as f64);
            }
        }
    }

    /// Erasing keeps sizes consistent and the survivors in order.
    #[test]
    fn erase_keeps_invariants((grid, indices) in arb_grid_and_indices()) {
        let mut grid = grid;
        let n = grid.num_cells();
        let dim = grid.dim();
        for i in 0..n {
            for d in 0..dim {
                grid.set_value(i, d, i as f64).unwrap();
            }
        }
        let before = grid.cells().to_vec();

        grid.erase(&indices);

        prop_assert_eq!(grid.num_cells(), n - indices.len());
        prop_assert_eq!(grid.raw_values().len(), dim * (n - indices.len()));

        let survivors: Vec<usize> = (0..n).filter(|i| indices.binary_search(i).is_err()).collect();
        for (k, &orig) in survivors.iter().enumerate() {
            prop_assert_eq!(grid.cell(k).unwrap(), before[orig]);
            for d in 0..dim {
                prop_assert_eq!(grid.value(k, d).unwrap(), orig as f64);
            }
        }
    }

    /// Bounds always contain every cell center.
    #[test]
    fn bounds_contain_cells(grid in arb_grid()) {
        let b = grid.bounds();
        for c in grid.cells() {
            prop_assert!(c.x > b.min_x && c.x < b.max_x);
            prop_assert!(c.y > b.min_y && c.y < b.max_y);
        }
    }
}
