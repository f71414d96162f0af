//! The sensor provider contract.

use skin_types::{Grid, SkinAttributes};

use crate::error::Result;

/// A source of skin readings.
///
/// A provider describes a fixed set of sensors. [`create_grid`] returns a
/// grid with one cell per sensor; [`update`] reads fresh values in the same
/// order.
///
/// [`create_grid`]: SkinProvider::create_grid
/// [`update`]: SkinProvider::update
pub trait SkinProvider {
    /// Number of value components per sensor.
    fn dim(&self) -> usize;

    /// A fresh grid sized to the sensors, with zeroed values.
    fn create_grid(&self) -> Grid;

    /// Replaces the contents of `values` with one fresh reading per sensor
    /// component.
    ///
    /// # Errors
    ///
    /// Fails if the sensors cannot be read.
    fn update(&mut self, values: &mut Vec<f64>) -> Result<()>;

    /// Physical properties of the skin.
    fn attributes(&self) -> SkinAttributes;

    /// Reads fresh values straight into `grid`.
    ///
    /// # Errors
    ///
    /// Fails like [`update`](Self::update), or if `grid` does not have one
    /// value slot per reading.
    fn update_grid(&mut self, grid: &mut Grid) -> Result<()> {
        let mut values = Vec::with_capacity(grid.raw_values().len());
        self.update(&mut values)?;
        grid.set_raw_values(values)?;
        Ok(())
    }
}
