// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use bias_circuits::{
    check_public_inputs, gadgets, BiasCircuit, BiasProver, BiasVerifier,
    Error, UniformCircuit, TRANSCRIPT_LABEL,
};
use bias_core::table::{KNOTS, UNIFORM_DOMAIN};
use dusk_plonk::prelude::*;
use ff::Field;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::SeedableRng;

static PUB_PARAMS: Lazy<PublicParameters> = Lazy::new(|| {
    let rng = &mut StdRng::seed_from_u64(0xbeef);
    PublicParameters::setup(1 << 13, rng)
        .expect("Setting up the parameters should succeed")
});

static BIAS_KEYS: Lazy<(Vec<u8>, Vec<u8>)> = Lazy::new(|| {
    let (prover, verifier) =
        Compiler::compile::<BiasCircuit>(&PUB_PARAMS, TRANSCRIPT_LABEL)
            .expect("Compiling the circuit should succeed");
    (prover.to_bytes(), verifier.to_bytes())
});

static UNIFORM_KEYS: Lazy<(Prover, Verifier)> = Lazy::new(|| {
    Compiler::compile::<UniformCircuit>(&PUB_PARAMS, TRANSCRIPT_LABEL)
        .expect("Compiling the circuit should succeed")
});

fn bias_keys() -> (BiasProver, BiasVerifier) {
    let (prover, verifier) = &*BIAS_KEYS;
    (
        BiasProver::try_from_bytes(prover).expect("prover key is valid"),
        BiasVerifier::try_from_bytes(verifier).expect("verifier key is valid"),
    )
}

fn prove_uniform(uniform: u32) -> Result<(), Error> {
    let rng = &mut StdRng::seed_from_u64(u64::from(uniform));
    let (prover, verifier) = &*UNIFORM_KEYS;

    let circuit = UniformCircuit::new(uniform)?;
    let (proof, public_inputs) = prover.prove(rng, &circuit)?;
    check_public_inputs(&circuit.public_inputs(), &public_inputs)?;
    verifier.verify(&proof, &public_inputs)?;

    Ok(())
}

#[test]
fn prove_verify_bias() -> Result<(), Error> {
    let rng = &mut StdRng::seed_from_u64(0xb1a5);
    let (prover, verifier) = bias_keys();

    for _ in 0..4 {
        let nullifier = BlsScalar::random(&mut *rng);
        let secret = BlsScalar::random(&mut *rng);

        let proof = prover.prove(rng, nullifier, secret)?;
        let outcome = bias_core::bias(&nullifier, &secret)?;

        assert_eq!(proof.uniform, outcome.entropy.uniform);
        assert_eq!(proof.bias, outcome.bias());
        verifier.verify(&proof)?;
    }

    Ok(())
}

#[test]
fn claimed_bias_is_checked() -> Result<(), Error> {
    let rng = &mut StdRng::seed_from_u64(0x0b1a5);
    let (prover, verifier) = bias_keys();

    let nullifier = BlsScalar::random(&mut *rng);
    let secret = BlsScalar::random(&mut *rng);
    let mut proof = prover.prove(rng, nullifier, secret)?;

    proof.bias = proof.bias.wrapping_add(1) % 101;
    assert!(matches!(
        verifier.verify(&proof),
        Err(Error::Divergence { index: 2, .. })
    ));

    // a consistent pair that was not proven
    proof.uniform = (proof.uniform + 1) % UNIFORM_DOMAIN;
    proof.bias = bias_core::evaluate(proof.uniform)?.bias;
    assert!(matches!(
        verifier.verify(&proof),
        Err(Error::InvalidPlonkObject(_))
    ));

    Ok(())
}

#[test]
fn public_input_mismatch() {
    let expected = [BlsScalar::one(), BlsScalar::zero()];

    assert!(check_public_inputs(&expected, &expected).is_ok());
    assert!(matches!(
        check_public_inputs(&expected, &expected[..1]),
        Err(Error::PublicInputCount(1))
    ));
    assert!(matches!(
        check_public_inputs(&expected, &[BlsScalar::one(), BlsScalar::one()]),
        Err(Error::Divergence { index: 1, .. })
    ));
}

#[test]
fn circuit_ids() {
    assert_ne!(BiasCircuit::circuit_id(), UniformCircuit::circuit_id());
    assert_eq!(BiasCircuit::circuit_id(), BiasCircuit::circuit_id());
}

#[test]
fn circuit_matches_reference_sampled() -> Result<(), Error> {
    let boundaries = KNOTS[1..KNOTS.len() - 1]
        .iter()
        .flat_map(|k| [k - 1, *k, k + 1]);
    let stride = (0..UNIFORM_DOMAIN).step_by(997);

    for uniform in boundaries.chain(stride).chain([UNIFORM_DOMAIN - 1]) {
        prove_uniform(uniform)?;
    }

    Ok(())
}

#[test]
#[ignore = "proves every sample of the domain"]
fn circuit_matches_reference_exhaustive() -> Result<(), Error> {
    for uniform in 0..UNIFORM_DOMAIN {
        prove_uniform(uniform)?;
    }

    Ok(())
}

#[derive(Default)]
struct OversizedDegree;

impl Circuit for OversizedDegree {
    fn circuit(
        &self,
        composer: &mut Composer,
    ) -> Result<(), dusk_plonk::prelude::Error> {
        let mut table = bias_core::CANONICAL;
        table.degree = 7;

        let evaluation =
            bias_core::evaluate(5000).expect("sample is in the domain");
        let uniform = composer.append_witness(BlsScalar::from(5000u64));
        gadgets::table_bias(
            composer,
            &table,
            uniform,
            &evaluation.less_than,
            evaluation.remainder,
        );

        Ok(())
    }
}

#[test]
fn oversized_degree_is_capped() {
    let compiled = Compiler::compile::<OversizedDegree>(
        &PUB_PARAMS,
        TRANSCRIPT_LABEL,
    );
    assert!(compiled.is_ok());
}
