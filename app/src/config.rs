//! FILENAME: app/src/config.rs
//! PURPOSE: Host configuration read from the environment.
//! CONTEXT: Every setting has a default, so an empty environment runs the
//! bundled dataset with unseeded synthesis and no log file.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

pub const ENV_DATASET: &str = "PIVOT_DATASET";
pub const ENV_LOG_FILE: &str = "PIVOT_LOG_FILE";
pub const ENV_SEED: &str = "PIVOT_SEED";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value '{value}': expected an unsigned integer")]
    InvalidSeed { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON dataset to load instead of the bundled one.
    pub dataset_path: Option<PathBuf>,

    /// File receiving unified log lines.
    pub log_file: Option<PathBuf>,

    /// Seed for synthesized carats/pcs values.
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let seed = match get(ENV_SEED) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidSeed {
                key: ENV_SEED,
                value: raw.clone(),
            })?),
            None => None,
        };

        Ok(AppConfig {
            dataset_path: get(ENV_DATASET).map(PathBuf::from),
            log_file: get(ENV_LOG_FILE).map(PathBuf::from),
            seed,
        })
    }

    /// Random source for dataset synthesis: seeded when configured.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
