use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::params::RawParameters;

/// A run as configured by a driver: the input record plus the run seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub parameters: RawParameters,
}

fn default_seed() -> u64 {
    42
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RunConfig {
    /// Reference scenario: 100 obligors at Φ(−2) ≈ 2.3 % PD, 5 % asset
    /// correlation, unit exposure, 60 % LGD, 1 000 draws.
    pub fn canonical() -> Self {
        RunConfig {
            seed: default_seed(),
            parameters: RawParameters {
                asset_correlation: 0.05,
                default_threshold: -2.0,
                exposure_at_default: 1.0,
                loss_given_default: 0.6,
                portfolio_size: 100,
                simulation_count: 1000,
            },
        }
    }

    /// Load a JSON config. `parameters` fields accept either naming style.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: display.clone(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: display, source })
    }
}
