//! End-to-end runs of the reconstruction pipeline on a synthetic skin.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use clap::Parser;
use skin_cli::{Cli, run};
use skin_elastic::Algorithm;
use tempfile::TempDir;

/// 5 × 5 sensors at 4 mm pitch reading a Gaussian indentation.
fn write_skin(dir: &Path) -> std::path::PathBuf {
    let mut yaml = String::from("cells:\n");
    for i in 0..5 {
        for j in 0..5 {
            let x = f64::from(i) * 0.004;
            let y = f64::from(j) * 0.004;
            let r2 = (x - 0.008).powi(2) + (y - 0.008).powi(2);
            let value = 1e-5 * (-r2 / (2.0 * 0.004 * 0.004)).exp();
            writeln!(yaml, "  - {{ relative_position: [{x}, {y}], value: {value:e} }}").unwrap();
        }
    }
    yaml.push_str("attributes: { h: 0.002, E: 300000, nu: 0.5, taxelArea: 1.0e-6 }\n");

    let path = dir.join("skin.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

fn cli(dir: &TempDir, extra: &[&str]) -> Cli {
    let input = write_skin(dir.path());
    let out = dir.path().join("out");
    let mut args = vec![
        "skin-reconstruct".to_string(),
        input.display().to_string(),
        "--output-dir".to_string(),
        out.display().to_string(),
    ];
    args.extend(extra.iter().map(ToString::to_string));
    Cli::try_parse_from(args).unwrap()
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn pressures_least_squares() {
    let dir = TempDir::new().unwrap();
    let report = run(&cli(&dir, &[])).unwrap();

    assert_eq!(report.algorithm, Algorithm::DisplacementsToPressures);
    assert_eq!(report.natural_cells, 25);
    assert_eq!(report.displacement_cells, 25);
    assert_eq!(report.non_interpolable, 0);
    assert_eq!(report.result_cells, 9);
    assert!(report.total_force.is_finite());

    let names: Vec<_> = report
        .dumps
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["natural.txt", "result.txt", "reconstructed.txt"]);
}

#[test]
fn dump_format() {
    let dir = TempDir::new().unwrap();
    let report = run(&cli(&dir, &[])).unwrap();

    // dx dy, xs, ys, one line per component
    let natural = read_lines(&report.dumps[0]);
    assert_eq!(natural.len(), 4);
    assert_eq!(natural[1].split(' ').count(), 25);
    assert_eq!(natural[3].split(' ').count(), 25);

    let result = read_lines(&report.dumps[1]);
    assert_eq!(result[0], "0.005 0.005");
    assert_eq!(result[1].split(' ').count(), 9);
}

#[test]
fn nonnegative_pressures() {
    let dir = TempDir::new().unwrap();
    let report = run(&cli(&dir, &["--nnls", "--nnls-preset", "precise"])).unwrap();
    assert_eq!(report.algorithm, Algorithm::DisplacementsToNonnegativePressures);

    let result = read_lines(&report.dumps[1]);
    for value in result[3].split(' ') {
        assert!(value.parse::<f64>().unwrap() >= 0.0);
    }
    assert!(report.total_force >= 0.0);
}

#[test]
fn forces_with_resampling() {
    let dir = TempDir::new().unwrap();
    let report = run(&cli(
        &dir,
        &["--quantity", "forces", "--nnls", "--source-pitch", "0.002", "--nipp", "remove"],
    ))
    .unwrap();

    assert_eq!(report.algorithm, Algorithm::DisplacementsToNonnegativeNormalForces);
    assert_eq!(report.natural_cells, 25);
    assert!(report.displacement_cells > 25);
    assert_eq!(report.dumps.len(), 4);
    assert!(report.dumps[1].ends_with("interpolated.txt"));
    // No 5 mm force cell lies close enough to a 2 mm displacement cell to
    // push it down, so the clamped solution may be all zeros.
    assert!(report.total_force >= 0.0);
}

#[test]
fn nonnegative_forces_on_the_sensors() {
    let dir = TempDir::new().unwrap();
    let report = run(&cli(&dir, &["--quantity", "forces", "--nnls"])).unwrap();

    assert_eq!(report.algorithm, Algorithm::DisplacementsToNonnegativeNormalForces);
    assert_eq!(report.displacement_cells, 25);
    assert!(report.total_force > 0.0);

    let result = read_lines(&report.dumps[1]);
    for value in result[3].split(' ') {
        assert!(value.parse::<f64>().unwrap() >= 0.0);
    }
}

#[test]
fn missing_skin_file_fails() {
    let dir = TempDir::new().unwrap();
    let cli = Cli::try_parse_from([
        "skin-reconstruct".to_string(),
        dir.path().join("absent.yaml").display().to_string(),
    ])
    .unwrap();
    let err = run(&cli).unwrap_err();
    assert!(err.to_string().contains("failed to load skin"));
}
