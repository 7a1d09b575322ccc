// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_plonk::prelude::{BlsScalar, Proof, Prover, Verifier};
use rand::{CryptoRng, RngCore};

use crate::{BiasCircuit, Error};

/// Compares the public inputs returned by the prover with the ones expected
/// from the reference evaluator.
///
/// # Errors
/// Fails on the first differing input, or if the counts differ.
pub fn check_public_inputs(
    expected: &[BlsScalar],
    found: &[BlsScalar],
) -> Result<(), Error> {
    if expected.len() != found.len() {
        return Err(Error::PublicInputCount(found.len()));
    }

    expected
        .iter()
        .zip(found)
        .enumerate()
        .try_for_each(|(index, (expected, found))| {
            if expected == found {
                Ok(())
            } else {
                Err(Error::Divergence {
                    index,
                    expected: *expected,
                    found: *found,
                })
            }
        })
}

/// A proof of [`BiasCircuit`] together with its public values.
#[derive(Debug, Clone)]
pub struct BiasProof {
    pub proof: Proof,
    pub nullifier: BlsScalar,
    pub uniform: u32,
    pub bias: u8,
}

impl BiasProof {
    /// Public inputs in the order the circuit declares them.
    pub fn public_inputs(&self) -> [BlsScalar; 3] {
        [
            self.nullifier,
            BlsScalar::from(u64::from(self.uniform)),
            BlsScalar::from(u64::from(self.bias)),
        ]
    }
}

/// Proves biases with compiled [`BiasCircuit`] keys.
pub struct BiasProver {
    prover: Prover,
}

impl BiasProver {
    pub fn new(prover: Prover) -> Self {
        Self { prover }
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(Prover::try_from_bytes(bytes)?))
    }

    /// Draws and proves the bias of `(nullifier, secret)`.
    ///
    /// The public inputs of the proof are checked against the reference
    /// evaluator before it is returned.
    pub fn prove<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        nullifier: BlsScalar,
        secret: BlsScalar,
    ) -> Result<BiasProof, Error> {
        let circuit = BiasCircuit::new(nullifier, secret)?;
        let (proof, public_inputs) = self.prover.prove(rng, &circuit)?;

        check_public_inputs(&circuit.public_inputs(), &public_inputs)?;

        Ok(BiasProof {
            proof,
            nullifier,
            uniform: circuit.uniform(),
            bias: circuit.bias(),
        })
    }
}

/// Verifies [`BiasProof`]s.
pub struct BiasVerifier {
    verifier: Verifier,
}

impl BiasVerifier {
    pub fn new(verifier: Verifier) -> Self {
        Self { verifier }
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(Verifier::try_from_bytes(bytes)?))
    }

    /// Verifies the proof and that the claimed bias is the one the
    /// reference evaluator assigns to the claimed sample.
    pub fn verify(&self, proof: &BiasProof) -> Result<(), Error> {
        let expected = bias_core::evaluate(proof.uniform)?.bias;
        if expected != proof.bias {
            return Err(Error::Divergence {
                index: 2,
                expected: BlsScalar::from(u64::from(expected)),
                found: BlsScalar::from(u64::from(proof.bias)),
            });
        }

        self.verifier.verify(&proof.proof, &proof.public_inputs())?;
        Ok(())
    }
}
