//! Error types for sensor providers.

use std::io;

use skin_types::GridError;
use thiserror::Error;

/// Errors that can occur while loading or reading a skin.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// The skin description could not be read.
    #[error("failed to read skin description: {0}")]
    Io(#[from] io::Error),

    /// The skin description is not valid YAML, or a value has the wrong type.
    #[error("invalid skin description: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required key is absent.
    #[error("missing key '{key}' in {location}")]
    MissingKey {
        /// Name of the missing key.
        key: &'static str,
        /// Where the key was expected, e.g. `cells[3]`.
        location: String,
    },

    /// The skin attributes are not physical.
    #[error("invalid skin attributes: {0}")]
    InvalidAttributes(&'static str),

    /// The provider produced values that do not fit the grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl ProviderError {
    /// Creates a missing key error.
    pub fn missing_key(key: &'static str, location: impl Into<String>) -> Self {
        Self::MissingKey {
            key,
            location: location.into(),
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
