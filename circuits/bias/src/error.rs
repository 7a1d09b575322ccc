// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_plonk::prelude::{BlsScalar, Error as PlonkError};

use std::{error, fmt};

#[derive(Debug)]
pub enum Error {
    InvalidPlonkObject(PlonkError),
    Evaluation(bias_core::Error),
    /// The public inputs of a proof do not match the reference evaluator.
    Divergence {
        index: usize,
        expected: BlsScalar,
        found: BlsScalar,
    },
    PublicInputCount(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Evaluation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PlonkError> for Error {
    fn from(e: PlonkError) -> Self {
        Self::InvalidPlonkObject(e)
    }
}

impl From<bias_core::Error> for Error {
    fn from(e: bias_core::Error) -> Self {
        Self::Evaluation(e)
    }
}
