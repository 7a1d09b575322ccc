// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use bias_core::table::{SEGMENTS, UNIFORM_DOMAIN};
use bias_core::CANONICAL;
use dusk_plonk::prelude::*;
use once_cell::sync::Lazy;

use crate::gadgets::{self, UNIFORM_BIT_PAIRS};

static CIRCUIT_ID: Lazy<[u8; 32]> =
    Lazy::new(|| crate::circuit_id("UniformCircuit", "0.1.0"));

/// Circuit proving that `bias` is the canonical table evaluated at a public
/// `uniform` sample.
///
/// Public inputs, in order: uniform sample, bias.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UniformCircuit {
    uniform: u32,
    less_than: [bool; SEGMENTS - 1],
    remainder: u64,
    bias: u8,
}

impl UniformCircuit {
    /// Builds the witness with the reference evaluator.
    ///
    /// # Errors
    /// Fails if `uniform` is outside of the sample domain.
    pub fn new(uniform: u32) -> Result<Self, crate::Error> {
        let evaluation = bias_core::evaluate(uniform)?;

        Ok(Self {
            uniform,
            less_than: evaluation.less_than,
            remainder: evaluation.remainder,
            bias: evaluation.bias,
        })
    }

    pub fn circuit_id() -> &'static [u8; 32] {
        &CIRCUIT_ID
    }

    pub const fn bias(&self) -> u8 {
        self.bias
    }

    /// The public inputs a proof of this circuit is verified against.
    pub fn public_inputs(&self) -> Vec<BlsScalar> {
        vec![
            BlsScalar::from(u64::from(self.uniform)),
            BlsScalar::from(u64::from(self.bias)),
        ]
    }
}

impl Circuit for UniformCircuit {
    fn circuit(&self, composer: &mut Composer) -> Result<(), Error> {
        let uniform =
            composer.append_public(BlsScalar::from(u64::from(self.uniform)));

        gadgets::bounded::<UNIFORM_BIT_PAIRS>(
            composer,
            uniform,
            BlsScalar::from(u64::from(UNIFORM_DOMAIN - 1)),
        );

        let bias = gadgets::table_bias(
            composer,
            &CANONICAL,
            uniform,
            &self.less_than,
            self.remainder,
        );

        let public_bias =
            composer.append_public(BlsScalar::from(u64::from(self.bias)));
        composer.assert_equal(bias, public_bias);

        Ok(())
    }
}
