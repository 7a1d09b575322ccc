// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bias_core::stats::Tolerance;
use bias_core::vectors::BulkTolerance;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Default log_level.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration of the tool, read from a TOML file and overridden by the
/// command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    pub log_level: Option<String>,

    #[serde(default = "SimulationConfig::default")]
    pub simulation: SimulationConfig,

    #[serde(default = "VectorsConfig::default")]
    pub vectors: VectorsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of random `(nullifier, secret)` pairs to draw
    pub samples: u32,
    pub seed: u64,
    pub threads: usize,
    pub tolerance: BulkTolerance,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            samples: 10_000,
            seed: 0xb1a5,
            threads: 4,
            tolerance: Tolerance::default().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorsConfig {
    /// Directory the vector files are written to
    pub output: PathBuf,
    /// Also prove every vector with the uniform circuit
    pub prove: bool,
}

impl Default for VectorsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("vectors"),
            prove: false,
        }
    }
}

impl RecoveryConfig {
    /// Reads the configuration from `path`, or the defaults if `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => {
                let toml = fs::read_to_string(path)?;
                Ok(toml::from_str(&toml)?)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn log_level(&self) -> Result<tracing::Level, Error> {
        let log_level = match &self.log_level {
            None => DEFAULT_LOG_LEVEL,
            Some(log_level) => log_level,
        };
        tracing::Level::from_str(log_level)
            .map_err(|_| Error::LogLevel(log_level.to_string()))
    }
}
