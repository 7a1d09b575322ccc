// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fs;
use std::path::Path;

use bias_circuits::{check_public_inputs, UniformCircuit};
use bias_core::vectors::{
    CaseExpected, CaseInput, TestVectorSet, SUMMARY_FILE, VECTORS_FILE,
};
use bias_core::CANONICAL;
use dusk_plonk::prelude::{Prover, Verifier};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::{Error, Theme};

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    debug!("written {}", path.display());
    Ok(())
}

/// Writes the vector set, one input and one expectation file per case, and
/// the summary into `dir`.
pub fn write(dir: &Path, set: &TestVectorSet) -> Result<(), Error> {
    fs::create_dir_all(dir)?;

    write_json(&dir.join(VECTORS_FILE), set)?;
    for (case, input, expected) in set.cases() {
        write_json(&dir.join(CaseInput::file_name(case)), &input)?;
        write_json(&dir.join(CaseExpected::file_name(case)), &expected)?;
    }
    write_json(&dir.join(SUMMARY_FILE), &set.summary())?;

    Ok(())
}

/// Reads a vector set from a JSON file.
pub fn read(path: &Path) -> Result<TestVectorSet, Error> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

/// Checks every vector against the reference evaluator and, if keys are
/// given, proves it with the uniform circuit.
pub fn check(
    set: &TestVectorSet,
    keys: Option<&(Prover, Verifier)>,
) -> Result<(), Error> {
    let theme = Theme::default();

    set.validate(&CANONICAL)?;
    info!(
        "{} {} vectors against the evaluator",
        theme.success("Checked"),
        set.test_cases.len()
    );

    if let Some((prover, verifier)) = keys {
        let rng = &mut StdRng::seed_from_u64(0xdead);
        for vector in &set.test_cases {
            let circuit = UniformCircuit::new(vector.uniform_input)?;
            let (proof, public_inputs) = prover.prove(rng, &circuit)?;

            check_public_inputs(&circuit.public_inputs(), &public_inputs)?;
            verifier.verify(&proof, &public_inputs)?;
            debug!("proved {} -> {}", vector.name, circuit.bias());
        }
        info!(
            "{} {} vectors with the circuit",
            theme.success("Proved"),
            set.test_cases.len()
        );
    }

    Ok(())
}

/// Checks the canonical vectors, or the set at `input`, and writes them
/// into `output`.
pub fn exec(
    input: Option<&Path>,
    output: &Path,
    keys: Option<&(Prover, Verifier)>,
) -> Result<(), Error> {
    let theme = Theme::default();

    let set = match input {
        Some(path) => {
            info!("{} {}", theme.action("Loading"), path.display());
            read(path)?
        }
        None => bias_core::vectors::canonical_vectors(),
    };

    check(&set, keys)?;
    write(output, &set)?;
    info!("{} vectors to {}", theme.success("Written"), output.display());

    Ok(())
}
