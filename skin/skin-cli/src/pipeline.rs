//! The reconstruction pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use skin_elastic::{Algorithm, AlgorithmParams, BoussinesqOptions};
use skin_interp::{Interpolator, LinearDelaunayInterpolator};
use skin_provider::{SkinProvider, YamlSkinProvider};
use skin_types::{CellShape, Grid, dump_to_path};
use tracing::{debug, info};

use crate::cli::{Cli, Quantity};

/// Summary of one reconstruction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Inverse algorithm that produced the result.
    pub algorithm: Algorithm,
    /// Number of sensors.
    pub natural_cells: usize,
    /// Number of displacement cells fed to the inverse algorithm.
    pub displacement_cells: usize,
    /// Resampled cells outside the sensor hull (zeroed or removed).
    pub non_interpolable: usize,
    /// Number of reconstructed pressure or force cells.
    pub result_cells: usize,
    /// Total normal force on the skin.
    pub total_force: f64,
    /// Largest deviation between measured and reconstructed displacements.
    pub max_displacement_error: f64,
    /// Files written, in order.
    pub dumps: Vec<PathBuf>,
}

/// Resamples `natural` on a square grid of `pitch`.
///
/// Returns the resampled grid and the number of cells outside the sensor
/// hull.
fn resample(natural: &Grid, pitch: f64, cli: &Cli) -> Result<(Grid, usize)> {
    let mut regular = Grid::from_fill_bounds(natural.dim(), CellShape::square(pitch), natural)
        .context("failed to build the resampling grid")?;
    let filled = regular.num_cells();

    let mut interpolator = LinearDelaunayInterpolator::new(cli.nipp.into());
    interpolator
        .offline(natural, &mut regular)
        .context("failed to triangulate the sensors")?;
    interpolator.interpolate(natural, &mut regular)?;

    let removed = filled - regular.num_cells();
    let non_interpolable = removed + regular.bad_cells().len();
    debug!(filled, removed, non_interpolable, "Resampled sensor readings");
    Ok((regular, non_interpolable))
}

fn dump(grid: &Grid, dir: &Path, name: &str, dumps: &mut Vec<PathBuf>) -> Result<()> {
    let path = dir.join(format!("{name}.txt"));
    dump_to_path(grid, &path).with_context(|| format!("failed to write {}", path.display()))?;
    dumps.push(path);
    Ok(())
}

/// Runs the whole pipeline described by `cli`.
///
/// # Errors
///
/// Fails if the skin cannot be loaded, a grid cannot be built, an algorithm
/// rejects its grids or a dump cannot be written.
pub fn run(cli: &Cli) -> Result<Report> {
    ensure!(cli.target_pitch > 0.0, "target pitch must be positive");

    let mut provider = YamlSkinProvider::from_yaml_file(&cli.input)
        .with_context(|| format!("failed to load skin from {}", cli.input.display()))?;
    let mut natural = provider.create_grid();
    provider.update_grid(&mut natural)?;
    for v in natural.raw_values_mut() {
        *v *= cli.value_scale;
    }
    info!(cells = natural.num_cells(), "Loaded skin");

    let params = AlgorithmParams::new(provider.attributes())
        .with_boussinesq(BoussinesqOptions { psi: cli.psi() })
        .with_nnls(cli.nnls_preset.into());

    let (displacements, non_interpolable) = match cli.source_pitch {
        Some(pitch) => resample(&natural, pitch, cli)?,
        None => (natural.clone(), 0),
    };

    let mut result = Grid::from_fill_bounds(1, CellShape::square(cli.target_pitch), &displacements)
        .context("failed to build the reconstruction grid")?;

    let inverse = cli.inverse_algorithm();
    info!(algorithm = %inverse, inputs = displacements.num_cells(), outputs = result.num_cells(), "Reconstructing");
    let precomputed = inverse.offline(&displacements, &result, &params)?;
    inverse.run(&precomputed, &displacements, &mut result)?;

    let mut reconstructed = Grid::from_empty(displacements.dim(), *displacements.shape());
    reconstructed.clone_structure(&displacements);
    let forward = cli.forward_algorithm();
    let precomputed = forward.offline(&result, &reconstructed, &params)?;
    forward.run(&precomputed, &result, &mut reconstructed)?;

    let total_force = match cli.quantity {
        Quantity::Pressures => result.integrate(0)?,
        Quantity::Forces => result.raw_values().iter().sum(),
    };
    let max_displacement_error = displacements
        .raw_values()
        .iter()
        .zip(reconstructed.raw_values())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    info!(total_force, max_displacement_error, "Reconstruction done");

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;
    let mut dumps = Vec::new();
    dump(&natural, &cli.output_dir, "natural", &mut dumps)?;
    if cli.source_pitch.is_some() {
        dump(&displacements, &cli.output_dir, "interpolated", &mut dumps)?;
    }
    dump(&result, &cli.output_dir, "result", &mut dumps)?;
    dump(&reconstructed, &cli.output_dir, "reconstructed", &mut dumps)?;

    Ok(Report {
        algorithm: inverse,
        natural_cells: natural.num_cells(),
        displacement_cells: displacements.num_cells(),
        non_interpolable,
        result_cells: result.num_cells(),
        total_force,
        max_displacement_error,
        dumps,
    })
}
