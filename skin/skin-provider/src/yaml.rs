//! Skin descriptions stored as YAML.
//!
//! ```yaml
//! cells:
//!   - relative_position: [0.0, 0.0]
//!     value: 0.12
//!   - relative_position: [0.004, 0.0]
//!     value: 0.08
//! attributes:
//!   h: 0.002
//!   E: 300000
//!   nu: 0.5
//!   taxelArea: 1.2e-5
//! ```
//!
//! `nodes` is accepted in place of `cells`. The taxel size may be given as
//! `taxelRadius` instead of `taxelArea`. Sensors are 1D and their cells are
//! circles of the taxel area.

use std::f64::consts::PI;
use std::path::Path;

use serde::Deserialize;
use skin_types::{CellShape, Grid, GridCell, SkinAttributes};
use tracing::debug;

use crate::error::{ProviderError, Result};
use crate::provider::SkinProvider;

#[derive(Debug, Deserialize)]
struct RawSkin {
    #[serde(alias = "nodes")]
    cells: Option<Vec<RawCell>>,
    attributes: Option<RawAttributes>,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    relative_position: Option<[f64; 2]>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAttributes {
    h: Option<f64>,
    #[serde(rename = "E")]
    e: Option<f64>,
    nu: Option<f64>,
    #[serde(rename = "taxelArea")]
    taxel_area: Option<f64>,
    #[serde(rename = "taxelRadius")]
    taxel_radius: Option<f64>,
}

impl RawAttributes {
    fn into_attributes(self) -> Result<SkinAttributes> {
        const LOCATION: &str = "attributes";
        let h = self.h.ok_or_else(|| ProviderError::missing_key("h", LOCATION))?;
        let e = self.e.ok_or_else(|| ProviderError::missing_key("E", LOCATION))?;
        let nu = self.nu.ok_or_else(|| ProviderError::missing_key("nu", LOCATION))?;
        let taxel_area = match (self.taxel_area, self.taxel_radius) {
            (Some(area), _) => area,
            (None, Some(r)) => PI * r * r,
            (None, None) => return Err(ProviderError::missing_key("taxelArea", LOCATION)),
        };

        let attributes = SkinAttributes::new(h, e, nu, taxel_area);
        attributes.validate().map_err(ProviderError::InvalidAttributes)?;
        // Sensor cells are circles of this area.
        if attributes.taxel_area <= 0.0 {
            return Err(ProviderError::InvalidAttributes("taxel area must be positive"));
        }
        Ok(attributes)
    }
}

/// A skin whose sensors and readings are read once from a YAML document.
///
/// Every [`update`](SkinProvider::update) returns the stored readings.
///
/// # Example
///
/// ```
/// use skin_provider::{SkinProvider, YamlSkinProvider};
///
/// let yaml = "
/// cells:
///   - { relative_position: [0.0, 0.0], value: 1.5 }
///   - { relative_position: [0.004, 0.0], value: 0.5 }
/// attributes: { h: 0.002, E: 300000, nu: 0.5, taxelArea: 1.0e-5 }
/// ";
/// let mut provider = YamlSkinProvider::from_yaml_str(yaml).unwrap();
/// let mut grid = provider.create_grid();
/// provider.update_grid(&mut grid).unwrap();
///
/// assert_eq!(grid.num_cells(), 2);
/// assert_eq!(grid.raw_values(), &[1.5, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct YamlSkinProvider {
    cells: Vec<GridCell>,
    values: Vec<f64>,
    attributes: SkinAttributes,
}

impl YamlSkinProvider {
    /// Sensor value dimension.
    pub const DIM: usize = 1;

    /// Loads a skin description from a file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid description.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses a skin description.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Yaml`] for malformed YAML or mistyped values
    /// - [`ProviderError::MissingKey`] naming the first missing key
    /// - [`ProviderError::InvalidAttributes`] for unphysical attributes
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: RawSkin = serde_yaml::from_str(yaml)?;

        let raw_cells = raw.cells.ok_or_else(|| ProviderError::missing_key("cells", "document"))?;
        let attributes = raw
            .attributes
            .ok_or_else(|| ProviderError::missing_key("attributes", "document"))?
            .into_attributes()?;

        let mut cells = Vec::with_capacity(raw_cells.len());
        let mut values = Vec::with_capacity(raw_cells.len());
        for (i, cell) in raw_cells.into_iter().enumerate() {
            let [x, y] = cell
                .relative_position
                .ok_or_else(|| ProviderError::missing_key("relative_position", format!("cells[{i}]")))?;
            let value = cell
                .value
                .ok_or_else(|| ProviderError::missing_key("value", format!("cells[{i}]")))?;
            cells.push(GridCell::new(x, y));
            values.push(value);
        }

        debug!(
            cells = cells.len(),
            taxel_area = attributes.taxel_area,
            "Loaded YAML skin"
        );
        Ok(Self {
            cells,
            values,
            attributes,
        })
    }

    /// Sensor positions, in reading order.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Shape of every sensor cell: a circle of the taxel area.
    #[must_use]
    pub fn cell_shape(&self) -> CellShape {
        CellShape::circle_with_area(self.attributes.taxel_area)
    }
}

impl SkinProvider for YamlSkinProvider {
    fn dim(&self) -> usize {
        Self::DIM
    }

    fn create_grid(&self) -> Grid {
        Grid::from_sensors(Self::DIM, self.cell_shape(), self.cells.iter().copied())
    }

    fn update(&mut self, values: &mut Vec<f64>) -> Result<()> {
        values.clone_from(&self.values);
        Ok(())
    }

    fn attributes(&self) -> SkinAttributes {
        self.attributes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ATTRS: &str = "attributes: { h: 0.002, E: 300000, nu: 0.5, taxelArea: 0.0001 }";

    #[test]
    fn test_nodes_alias() {
        let yaml = format!("nodes:\n  - {{ relative_position: [1, 2], value: 3 }}\n{ATTRS}");
        let p = YamlSkinProvider::from_yaml_str(&yaml).unwrap();
        assert_eq!(p.cells(), &[GridCell::new(1.0, 2.0)]);
    }

    #[test]
    fn test_taxel_radius() {
        let yaml = "cells: []\nattributes: { h: 0.002, E: 3.0e6, nu: 0.5, taxelRadius: 0.002 }";
        let p = YamlSkinProvider::from_yaml_str(yaml).unwrap();
        assert_relative_eq!(p.attributes().taxel_area, PI * 4e-6);
        assert_relative_eq!(p.cell_shape().r(), 0.002, epsilon = 1e-15);
    }

    #[test]
    fn test_missing_cells() {
        let err = YamlSkinProvider::from_yaml_str(ATTRS).unwrap_err();
        assert!(matches!(err, ProviderError::MissingKey { key: "cells", .. }));
    }

    #[test]
    fn test_missing_attribute_field() {
        let yaml = "cells: []\nattributes: { h: 0.002, nu: 0.5, taxelArea: 0.0001 }";
        let err = YamlSkinProvider::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ProviderError::MissingKey { key: "E", .. }));
    }

    #[test]
    fn test_missing_value_names_cell() {
        let yaml = format!(
            "cells:\n  - {{ relative_position: [0, 0], value: 1 }}\n  - {{ relative_position: [1, 0] }}\n{ATTRS}"
        );
        let err = YamlSkinProvider::from_yaml_str(&yaml).unwrap_err();
        assert_eq!(err.to_string(), "missing key 'value' in cells[1]");
    }

    #[test]
    fn test_wrong_position_length() {
        let yaml = format!("cells:\n  - {{ relative_position: [0, 0, 0], value: 1 }}\n{ATTRS}");
        let err = YamlSkinProvider::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ProviderError::Yaml(_)));
    }

    #[test]
    fn test_cells_not_a_sequence() {
        let yaml = format!("cells: 3\n{ATTRS}");
        let err = YamlSkinProvider::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, ProviderError::Yaml(_)));
    }

    #[test]
    fn test_invalid_attributes() {
        let yaml = "cells: []\nattributes: { h: -1, E: 300000, nu: 0.5, taxelArea: 0 }";
        let err = YamlSkinProvider::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidAttributes(_)));
    }

    #[test]
    fn test_zero_taxel_size_rejected() {
        for taxel in ["taxelArea: 0", "taxelRadius: 0.0"] {
            let yaml = format!("cells: []\nattributes: {{ h: 0.002, E: 300000, nu: 0.5, {taxel} }}");
            let err = YamlSkinProvider::from_yaml_str(&yaml).unwrap_err();
            assert_eq!(err.to_string(), "invalid skin attributes: taxel area must be positive");
        }
    }
}
