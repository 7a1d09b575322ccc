// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io;

use bias_core::stats::Deviation;
use bias_core::vectors::VectorError;
use dusk_plonk::prelude::Error as PlonkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] bias_core::Error),
    #[error("Circuit error: {0}")]
    Circuit(#[from] bias_circuits::Error),
    #[error("Plonk error: {0:?}")]
    Plonk(PlonkError),
    #[error("Test vector rejected: {0}")]
    Vector(#[from] VectorError),
    #[error("Distribution off target: {0}")]
    Deviation(#[from] Deviation),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Invalid log level {0:?}")]
    LogLevel(String),
    #[error("Cannot build the simulation pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("No samples to simulate")]
    NoSamples,
}

impl From<PlonkError> for Error {
    fn from(e: PlonkError) -> Self {
        Self::Plonk(e)
    }
}

impl From<bias_core::TableError> for Error {
    fn from(e: bias_core::TableError) -> Self {
        Self::Evaluation(e.into())
    }
}
