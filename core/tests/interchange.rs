// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

#![cfg(feature = "serde")]

use bias_core::interchange::TableRecord;
use bias_core::vectors::{canonical_vectors, CaseInput, TestVectorSet};
use bias_core::{Error, TableError, CANONICAL};
use serde::Serialize;

fn assert_canonical_json<T>(
    input: &T,
    expected: &str,
) -> Result<String, Box<dyn std::error::Error>>
where
    T: ?Sized + Serialize,
{
    let serialized = serde_json::to_string(input)?;
    let input_canonical: serde_json::Value = serialized.parse()?;
    let expected_canonical: serde_json::Value = expected.parse()?;
    assert_eq!(input_canonical, expected_canonical);
    Ok(serialized)
}

#[test]
fn table_record_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let record = TableRecord::from(&CANONICAL);
    let json = serde_json::to_string_pretty(&record)?;
    let parsed: TableRecord = serde_json::from_str(&json)?;

    assert_eq!(parsed, record);
    assert_eq!(parsed.to_table()?, CANONICAL);
    Ok(())
}

#[test]
fn segment_json_shape() -> Result<(), Box<dyn std::error::Error>> {
    let record = TableRecord::from(&CANONICAL);
    assert_canonical_json(
        &record.segments[1],
        r#"{
            "index": 1,
            "range": [150, 700],
            "a_scaled": 3305776950,
            "b_scaled": 7750452
        }"#,
    )?;
    Ok(())
}

#[test]
fn tampered_record_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let record = TableRecord::from(&CANONICAL);
    let mut value = serde_json::to_value(&record)?;
    value["segments"][4]["a_scaled"] = serde_json::json!(31_421_070_751_i64);

    let tampered: TableRecord = serde_json::from_value(value)?;
    assert!(matches!(
        tampered.to_table(),
        Err(Error::Table(TableError::Discontinuity { segment: 3, .. }))
    ));
    Ok(())
}

#[test]
fn vectors_json() -> Result<(), Box<dyn std::error::Error>> {
    let vectors = canonical_vectors();
    let json = serde_json::to_string(&vectors)?;
    let parsed: TestVectorSet = serde_json::from_str(&json)?;
    assert_eq!(parsed, vectors);
    parsed.validate(&CANONICAL)?;

    let (_, input, _) = &vectors.cases()[0];
    assert_canonical_json(input, r#"{"uniform": 0}"#)?;
    assert_eq!(CaseInput::file_name(3), "input_case3.json");
    Ok(())
}

#[test]
fn vectors_without_notes() -> Result<(), Box<dyn std::error::Error>> {
    let json = r#"{
        "name": "median",
        "uniform_input": 5000,
        "expected_output": 27,
        "tolerance": 0
    }"#;
    let vector: bias_core::vectors::TestVector = serde_json::from_str(json)?;
    assert!(vector.notes.is_empty());
    assert_eq!(vector.check(&CANONICAL)?, 27);
    Ok(())
}
