// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use core::fmt;

use bias_core::table::SEGMENTS;
use bias_core::CANONICAL;
use dusk_plonk::prelude::*;
use once_cell::sync::Lazy;

use crate::gadgets;

static CIRCUIT_ID: Lazy<[u8; 32]> =
    Lazy::new(|| crate::circuit_id("BiasCircuit", "0.1.0"));

/// Circuit proving that `bias` is the canonical table evaluated at the
/// sample drawn from `Poseidon(nullifier, secret, ENTROPY_DOMAIN)`.
///
/// Public inputs, in order: nullifier, uniform sample, bias.
#[derive(Default, Clone)]
pub struct BiasCircuit {
    nullifier: BlsScalar,
    secret: BlsScalar,
    quotient: BlsScalar,
    uniform: u32,
    less_than: [bool; SEGMENTS - 1],
    remainder: u64,
    bias: u8,
}

impl BiasCircuit {
    /// Builds the witness with the reference evaluator.
    ///
    /// # Errors
    /// Fails if the digest cannot be reduced, see
    /// [`bias_core::Entropy::derive`].
    pub fn new(
        nullifier: BlsScalar,
        secret: BlsScalar,
    ) -> Result<Self, crate::Error> {
        let outcome = bias_core::bias(&nullifier, &secret)?;
        let evaluation = outcome.evaluation;

        Ok(Self {
            nullifier,
            secret,
            quotient: outcome.entropy.quotient,
            uniform: evaluation.uniform,
            less_than: evaluation.less_than,
            remainder: evaluation.remainder,
            bias: evaluation.bias,
        })
    }

    pub fn circuit_id() -> &'static [u8; 32] {
        &CIRCUIT_ID
    }

    pub const fn uniform(&self) -> u32 {
        self.uniform
    }

    pub const fn bias(&self) -> u8 {
        self.bias
    }

    /// The public inputs a proof of this circuit is verified against.
    pub fn public_inputs(&self) -> Vec<BlsScalar> {
        vec![
            self.nullifier,
            BlsScalar::from(u64::from(self.uniform)),
            BlsScalar::from(u64::from(self.bias)),
        ]
    }
}

impl fmt::Debug for BiasCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiasCircuit")
            .field("nullifier", &self.nullifier)
            .field("uniform", &self.uniform)
            .field("bias", &self.bias)
            .finish_non_exhaustive()
    }
}

impl Circuit for BiasCircuit {
    fn circuit(&self, composer: &mut Composer) -> Result<(), Error> {
        let nullifier = composer.append_public(self.nullifier);
        let secret = composer.append_witness(self.secret);
        let quotient = composer.append_witness(self.quotient);

        // 1. u = H(n, s, D) mod 10⁴
        let uniform = gadgets::entropy(composer, nullifier, secret, quotient);

        let public_uniform =
            composer.append_public(BlsScalar::from(u64::from(self.uniform)));
        composer.assert_equal(uniform, public_uniform);

        // 2. b = T(u)
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
