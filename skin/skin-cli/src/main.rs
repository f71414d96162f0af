//! `skin-reconstruct`: contact reconstruction for recorded tactile skins.
//!
//! # Usage
//!
//! - `skin-reconstruct skin.yaml` - least-squares pressures on a 5 mm grid
//! - `skin-reconstruct skin.yaml --quantity forces --nnls` - non-negative
//!   normal forces
//! - `skin-reconstruct skin.yaml --source-pitch 0.002 -o plots/` - resample
//!   the readings first and write the dumps to `plots/`
//!
//! Set `RUST_LOG` to override the default `skin=info` log filter.

use anyhow::Result;
use clap::Parser;
use skin_cli::{Cli, Quantity};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    // Targets are matched by prefix, so "skin" covers every workspace crate.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("skin={level}")))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let report = skin_cli::run(&cli)?;

    let unit = match cli.quantity {
        Quantity::Pressures => "pressure cells",
        Quantity::Forces => "force cells",
    };
    println!("algorithm: {}", report.algorithm);
    println!(
        "{} sensors -> {} displacement cells -> {} {unit}",
        report.natural_cells, report.displacement_cells, report.result_cells
    );
    if report.non_interpolable > 0 {
        println!("{} resampled cells outside the sensor hull", report.non_interpolable);
    }
    println!("total force: {:.6} N", report.total_force);
    println!("max displacement error: {:.3e}", report.max_displacement_error);
    for path in &report.dumps {
        println!("wrote {}", path.display());
    }
    Ok(())
}
