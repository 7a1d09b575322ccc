// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fs;

use bias_circuits::{BiasCircuit, UniformCircuit};
use bias_core::vectors::{
    canonical_vectors, CaseInput, TestVector, SUMMARY_FILE, VECTORS_FILE,
};
use bias_core::CANONICAL;
use bias_profile::Profile;
use bias_recovery_tools::{keys, table, vectors, Error};
use tempfile::tempdir;

#[test]
fn table_export() -> Result<(), Error> {
    let tmp = tempdir()?;

    table::exec(None, Some(tmp.path()))?;
    let file = tmp.path().join(table::TABLE_FILE);
    assert_eq!(table::load(&file)?, CANONICAL);

    // the exported record is accepted as input
    table::exec(Some(&file), None)?;
    Ok(())
}

#[test]
fn loaded_table_is_exported() -> Result<(), Error> {
    let tmp = tempdir()?;
    table::exec(None, Some(tmp.path()))?;
    let file = tmp.path().join(table::TABLE_FILE);

    let mut record: serde_json::Value =
        serde_json::from_slice(&fs::read(&file)?)?;
    record["version"] = serde_json::json!(2);
    fs::write(&file, record.to_string())?;

    let output = tmp.path().join("out");
    table::exec(Some(&file), Some(&output))?;

    let exported = table::load(&output.join(table::TABLE_FILE))?;
    assert_eq!(exported.version, 2);
    assert_eq!(exported.segments, CANONICAL.segments);
    Ok(())
}

#[test]
fn tampered_table_is_rejected() -> Result<(), Error> {
    let tmp = tempdir()?;
    table::exec(None, Some(tmp.path()))?;
    let file = tmp.path().join(table::TABLE_FILE);

    let json = fs::read_to_string(&file)?;
    let mut record: serde_json::Value = serde_json::from_str(&json)?;
    record["segments"][5]["b_scaled"] = serde_json::json!(0);
    fs::write(&file, record.to_string())?;

    assert!(matches!(table::load(&file), Err(Error::Evaluation(_))));
    assert!(table::exec(Some(&file), None).is_err());
    Ok(())
}

#[test]
fn vectors_files() -> Result<(), Error> {
    let tmp = tempdir()?;
    let set = canonical_vectors();

    vectors::exec(None, tmp.path(), None)?;

    let written = vectors::read(&tmp.path().join(VECTORS_FILE))?;
    assert_eq!(written, set);
    assert!(tmp.path().join(SUMMARY_FILE).exists());

    for case in 1..=set.test_cases.len() {
        let input: CaseInput = serde_json::from_slice(&fs::read(
            tmp.path().join(CaseInput::file_name(case)),
        )?)?;
        assert_eq!(input.uniform, set.test_cases[case - 1].uniform_input);
    }
    Ok(())
}

#[test]
fn wrong_vector_aborts() -> Result<(), Error> {
    let tmp = tempdir()?;
    let mut set = canonical_vectors();
    set.test_cases
        .push(TestVector::new("wrong", 5000, 40, 1, "off by far"));

    let input = tmp.path().join("wrong.json");
    fs::write(&input, serde_json::to_string(&set)?)?;

    let output = tmp.path().join("out");
    assert!(matches!(
        vectors::exec(Some(&input), &output, None),
        Err(Error::Vector(_))
    ));
    assert!(!output.join(VECTORS_FILE).exists());
    Ok(())
}

#[test]
fn keys_cache_and_prove() -> Result<(), Error> {
    let tmp = tempdir()?;
    let profile = Profile::at(tmp.path())?;

    let stray = [0x11; 32];
    profile.add_keys_for(&stray, vec![0], vec![0])?;

    keys::exec(&profile, true)?;
    assert!(profile.keys_for(&stray).get_verifier().is_ok());
    for id in [BiasCircuit::circuit_id(), UniformCircuit::circuit_id()] {
        assert!(profile.keys_for(id).get_prover().is_ok());
        assert!(profile.keys_for(id).get_verifier().is_ok());
    }

    let crs = profile.get_common_reference_string()?;
    assert!(profile.verify_common_reference_string(&crs));

    keys::exec(&profile, false)?;
    assert!(profile.keys_for(&stray).get_verifier().is_err());

    // served from the cache
    let uniform_keys = keys::uniform_keys(&profile)?;
    vectors::check(&canonical_vectors(), Some(&uniform_keys))?;
    Ok(())
}
