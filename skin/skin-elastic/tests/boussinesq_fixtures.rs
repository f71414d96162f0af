//! Reference values for the Boussinesq forward matrix.
//!
//! One force cell at (0.1, 0.1) and one displacement cell, either far from
//! it (offset (0.005, 0.007)) or at the same position, for every pairing of
//! 1D and 3D grids. `E = 300 kPa`, `h = 2 mm`, `ν = 0.5`.

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use nalgebra::DMatrix;
use skin_elastic::{AlgorithmParams, ContactAlgorithm, ElasticError, ForcesToDisplacements};
use skin_types::{CellShape, Grid, SkinAttributes};

const FAR_3_3: [f64; 9] = [
    4.776_124_991_82e-6,
    3.322_111_540_15e-6,
    -1.155_176_198_29e-5,
    3.322_111_540_15e-6,
    7.054_144_333_63e-6,
    -1.617_246_677_61e-5,
    -1.155_176_198_29e-5,
    -1.617_246_677_61e-5,
    -2.217_516_615_74e-6,
];
const FAR_NORMAL: [f64; 3] = [-1.155_176_198_29e-5, -1.617_246_677_61e-5, -2.217_516_615_74e-6];

const SAME_3_3: [f64; 9] = [
    1.931_371_010_12e-5,
    0.0,
    0.0,
    0.0,
    1.931_371_010_12e-5,
    0.0,
    0.0,
    0.0,
    3.862_742_020_23e-5,
];
const SAME_NORMAL: [f64; 3] = [0.0, 0.0, 3.862_742_020_23e-5];

fn params() -> AlgorithmParams {
    AlgorithmParams::new(SkinAttributes::new(0.002, 300_000.0, 0.5, 0.0))
}

fn matrix(f_dim: usize, d_dim: usize, d_pos: [f64; 2]) -> DMatrix<f64> {
    // Cells of area 0.002.
    let shape = CellShape::square(0.002_f64.sqrt());
    let forces = Grid::from_sensors(f_dim, shape, [[0.1, 0.1]]);
    let disps = Grid::from_sensors(d_dim, shape, [d_pos]);
    ForcesToDisplacements.offline(&forces, &disps, &params()).unwrap()
}

fn assert_row_major(m: &DMatrix<f64>, rows: usize, cols: usize, expected: &[f64]) {
    assert_eq!(m.shape(), (rows, cols));
    for r in 0..rows {
        for c in 0..cols {
            let e = expected[r * cols + c];
            assert_relative_eq!(m[(r, c)], e, max_relative = 1e-5, epsilon = 1e-12);
        }
    }
}

// ============================================================================
// Far field
// ============================================================================

const FAR: [f64; 2] = [0.105, 0.107];

#[test]
fn far_3_3() {
    assert_row_major(&matrix(3, 3, FAR), 3, 3, &FAR_3_3);
}

#[test]
fn far_1_3() {
    assert_row_major(&matrix(1, 3, FAR), 3, 1, &FAR_NORMAL);
}

#[test]
fn far_3_1() {
    assert_row_major(&matrix(3, 1, FAR), 1, 3, &FAR_NORMAL);
}

#[test]
fn far_1_1() {
    assert_row_major(&matrix(1, 1, FAR), 1, 1, &FAR_NORMAL[2..]);
}

// ============================================================================
// Same point
// ============================================================================

const SAME: [f64; 2] = [0.1, 0.1];

#[test]
fn same_3_3() {
    assert_row_major(&matrix(3, 3, SAME), 3, 3, &SAME_3_3);
}

#[test]
fn same_1_3() {
    assert_row_major(&matrix(1, 3, SAME), 3, 1, &SAME_NORMAL);
}

#[test]
fn same_3_1() {
    assert_row_major(&matrix(3, 1, SAME), 1, 3, &SAME_NORMAL);
}

#[test]
fn same_1_1() {
    assert_row_major(&matrix(1, 1, SAME), 1, 1, &SAME_NORMAL[2..]);
}

#[test]
fn near_offset_uses_same_point_values() {
    let m = matrix(3, 3, [0.1 + 1e-5, 0.1 + 1e-6]);
    assert_row_major(&m, 3, 3, &SAME_3_3);
}

// ============================================================================
// Preconditions
// ============================================================================

#[test]
fn unsupported_dimensions_fail() {
    let shape = CellShape::square(0.01);
    let f2 = Grid::from_sensors(2, shape, [[0.0, 0.0]]);
    let d1 = Grid::from_sensors(1, shape, [[0.0, 0.0]]);
    let err = ForcesToDisplacements.offline(&f2, &d1, &params()).unwrap_err();
    assert!(matches!(err, ElasticError::UnsupportedDimension { grid: "forces", dim: 2, .. }));

    let f1 = Grid::from_sensors(1, shape, [[0.0, 0.0]]);
    let d4 = Grid::from_sensors(4, shape, [[0.0, 0.0]]);
    let err = ForcesToDisplacements.offline(&f1, &d4, &params()).unwrap_err();
    assert!(matches!(
        err,
        ElasticError::UnsupportedDimension {
            grid: "displacements",
            dim: 4,
            ..
        }
    ));
}

#[test]
fn compressible_skin_only_warns() {
    let forces = Grid::from_sensors(1, CellShape::square(0.01), [[0.0, 0.0]]);
    let disps = Grid::from_sensors(1, CellShape::square(0.01), [[0.01, 0.0]]);
    let params = AlgorithmParams::new(SkinAttributes::new(0.002, 300_000.0, 0.3, 0.0));
    assert!(ForcesToDisplacements.offline(&forces, &disps, &params).is_ok());
}
