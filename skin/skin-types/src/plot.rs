//! Plain-text grid dump for external plotting tools.
//!
//! Layout, one record per line, fields separated by single spaces:
//!
//! ```text
//! dx dy
//! x_0 x_1 ... x_n
//! y_0 y_1 ... y_n
//! v_0[0] v_1[0] ... v_n[0]
//! ...
//! v_0[dim-1] ... v_n[dim-1]
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::Grid;

/// Writes `grid` to `out` in the plot dump layout.
///
/// # Errors
///
/// Propagates I/O errors from `out`.
pub fn dump_for_plot<W: Write>(grid: &Grid, mut out: W) -> io::Result<()> {
    let shape = grid.shape();
    writeln!(out, "{} {}", shape.dx(), shape.dy())?;

    write_row(&mut out, grid.cells().iter().map(|c| c.x))?;
    write_row(&mut out, grid.cells().iter().map(|c| c.y))?;

    let dim = grid.dim();
    for component in 0..dim {
        write_row(
            &mut out,
            grid.raw_values().iter().skip(component).step_by(dim).copied(),
        )?;
    }
    out.flush()
}

/// Writes `grid` to the file at `path`, truncating it.
///
/// # Errors
///
/// Propagates errors from creating or writing the file.
pub fn dump_to_path(grid: &Grid, path: impl AsRef<Path>) -> io::Result<()> {
    let file = File::create(path)?;
    dump_for_plot(grid, BufWriter::new(file))
}

fn write_row<W: Write>(out: &mut W, row: impl Iterator<Item = f64>) -> io::Result<()> {
    for (i, v) in row.enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        write!(out, "{v}")?;
    }
    out.write_all(b"\n")
}
