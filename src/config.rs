use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

const DEFAULT_WIDTH: usize = 20;
const DEFAULT_HEIGHT: usize = 20;

/// Grid shape, topology and random seed for a [`crate::Solver`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Join opposite edges into a torus.
    pub wrap: bool,
    /// Seed for the random source; a fresh one is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            wrap: false,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// A config with the given size and defaults elsewhere.
    ///
    /// Sizes are not checked here; see [`SolverConfig::validate`].
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set wrapping.
    #[must_use]
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Fix the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the grid has at least one row and one column.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyGrid`] when either dimension is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Parse from YAML; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`Error::Yaml`] for malformed documents, [`Error::EmptyGrid`] for a zero dimension.
    pub fn from_yaml_str(data: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not describe a valid config.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml_str(&data).with_context(|| format!("Invalid config {}", path.display()))
    }
}
