//! Sensor providers for tactile skins.
//!
//! A provider owns the description of a physical skin (sensor positions and
//! elastomer properties) and hands out readings on demand:
//!
//! - [`SkinProvider`] - the contract consumed by the reconstruction pipeline
//! - [`YamlSkinProvider`] - a recorded skin read from a YAML document
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no runtime or GUI dependencies. Hardware
//! drivers implement [`SkinProvider`] in their own crates.
//!
//! # Example
//!
//! ```no_run
//! use skin_provider::{SkinProvider, YamlSkinProvider};
//!
//! let mut provider = YamlSkinProvider::from_yaml_file("skin.yaml")?;
//! let mut natural = provider.create_grid();
//! provider.update_grid(&mut natural)?;
//! println!("{} sensors, h = {}", natural.num_cells(), provider.attributes().thickness);
//! # Ok::<(), skin_provider::ProviderError>(())
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod provider;
mod yaml;

pub use error::{ProviderError, Result};
pub use provider::SkinProvider;
pub use yaml::YamlSkinProvider;
