// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Test vectors shared by the circuit, the reference evaluator and external
//! harnesses.
//!
//! A [`TestVectorSet`] is the single source of truth for expected outputs. The
//! per-case records ([`CaseInput`], [`CaseExpected`]) and the
//! [`TestSummary`] mirror the files written next to it, one input and one
//! expectation per case.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::stats::{self, Tolerance, TARGET};
use crate::table::{CoefficientTable, KNOTS, SEGMENTS, TABLE_VERSION};
use crate::Error;

/// A single expected evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TestVector {
    /// Unique name of the case.
    pub name: String,
    /// The uniform sample fed to the evaluator.
    pub uniform_input: u32,
    /// The bias it is expected to map to.
    pub expected_output: u8,
    /// Accepted absolute distance from `expected_output`.
    pub tolerance: u8,
    /// Free form description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub notes: String,
}

/// Distribution targets used when validating many random samples at once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BulkValidation {
    /// Free form description.
    pub description: String,
    /// Number of random `(nullifier, secret)` pairs to draw.
    pub samples: u32,
    /// Expected mean bias.
    pub expected_mean: f64,
    /// Expected standard deviation.
    pub expected_std_dev: f64,
    /// Expected fraction of biases above 50.
    pub expected_tail_rate: f64,
    /// Accepted deviation of each moment.
    pub tolerance: BulkTolerance,
}

/// Serializable mirror of [`Tolerance`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BulkTolerance {
    /// Accepted deviation of the mean.
    pub mean: f64,
    /// Accepted deviation of the standard deviation.
    pub std_dev: f64,
    /// Accepted deviation of the tail rate.
    pub tail_rate: f64,
}

impl From<BulkTolerance> for Tolerance {
    fn from(t: BulkTolerance) -> Self {
        Self {
            mean: t.mean,
            std_dev: t.std_dev,
            tail_rate: t.tail_rate,
        }
    }
}

impl From<Tolerance> for BulkTolerance {
    fn from(t: Tolerance) -> Self {
        Self {
            mean: t.mean,
            std_dev: t.std_dev,
            tail_rate: t.tail_rate,
        }
    }
}

impl BulkValidation {
    /// The target moments.
    pub fn target(&self) -> stats::Moments {
        stats::Moments {
            mean: self.expected_mean,
            std_dev: self.expected_std_dev,
            tail_rate: self.expected_tail_rate,
        }
    }
}

/// A versioned list of test vectors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TestVectorSet {
    /// Free form description.
    pub description: String,
    /// Version of the table the vectors were produced for.
    pub table_version: u32,
    /// The individual cases.
    pub test_cases: Vec<TestVector>,
    /// Bulk distribution targets.
    pub bulk_validation: BulkValidation,
}

/// A test vector that the evaluator does not reproduce.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorError {
    /// The output is further than the tolerance from the expectation.
    Mismatch {
        /// Name of the failing case
        name: String,
        /// Expected bias
        expected: u8,
        /// Accepted distance
        tolerance: u8,
        /// Bias produced
        actual: u8,
    },
    /// The evaluator rejected the input.
    Evaluation {
        /// Name of the failing case
        name: String,
        /// The evaluator error
        error: Error,
    },
    /// The set was produced for another table version.
    Version(u32),
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch {
                name,
                expected,
                tolerance,
                actual,
            } => write!(
                f,
                "vector {name}: got {actual}, expected {expected} ± {tolerance}"
            ),
            Self::Evaluation { name, error } => {
                write!(f, "vector {name}: {error}")
            }
            Self::Version(v) => write!(
                f,
                "vectors target table version {v}, not {TABLE_VERSION}"
            ),
        }
    }
}

impl std::error::Error for VectorError {}

impl TestVector {
    /// Creates a vector.
    pub fn new(
        name: impl Into<String>,
        uniform_input: u32,
        expected_output: u8,
        tolerance: u8,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uniform_input,
            expected_output,
            tolerance,
            notes: notes.into(),
        }
    }

    /// Whether `actual` lies within the tolerance.
    pub fn accepts(&self, actual: u8) -> bool {
        actual.abs_diff(self.expected_output) <= self.tolerance
    }

    /// Evaluates the vector against `table`, returning the produced bias.
    ///
    /// # Errors
    /// Fails if the table rejects the input or the output is off.
    pub fn check(&self, table: &CoefficientTable) -> Result<u8, VectorError> {
        let actual = table
            .evaluate(self.uniform_input)
            .map_err(|error| VectorError::Evaluation {
                name: self.name.clone(),
                error,
            })?
            .bias;

        if self.accepts(actual) {
            Ok(actual)
        } else {
            Err(VectorError::Mismatch {
                name: self.name.clone(),
                expected: self.expected_output,
                tolerance: self.tolerance,
                actual,
            })
        }
    }
}

impl TestVectorSet {
    /// Checks every vector against `table`.
    ///
    /// # Errors
    /// Returns the first failing vector.
    pub fn validate(
        &self,
        table: &CoefficientTable,
    ) -> Result<(), VectorError> {
        if self.table_version != table.version {
            return Err(VectorError::Version(self.table_version));
        }
        self.test_cases
            .iter()
            .try_for_each(|v| v.check(table).map(|_| ()))
    }

    /// Per-case input and expectation records, numbered from 1.
    pub fn cases(&self) -> Vec<(usize, CaseInput, CaseExpected)> {
        self.test_cases
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let input = CaseInput {
                    uniform: v.uniform_input,
                };
                let expected = CaseExpected {
                    expected_output: v.expected_output,
                    tolerance: v.tolerance,
                    name: v.name.clone(),
                    notes: v.notes.clone(),
                };
                (i + 1, input, expected)
            })
            .collect()
    }

    /// Index of the per-case files.
    pub fn summary(&self) -> TestSummary {
        let test_cases = self
            .test_cases
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let case = i + 1;
                CaseSummary {
                    case,
                    name: v.name.clone(),
                    input: v.uniform_input,
                    expected: v.expected_output,
                    tolerance: v.tolerance,
                    input_file: CaseInput::file_name(case),
                    expected_file: CaseExpected::file_name(case),
                }
            })
            .collect();

        TestSummary {
            description: "Summary of all bias circuit test cases".to_string(),
            total_cases: self.test_cases.len(),
            bulk_validation: self.bulk_validation.clone(),
            test_cases,
        }
    }
}

/// Input of a single case, as fed to an external prover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseInput {
    /// The uniform sample.
    pub uniform: u32,
}

impl CaseInput {
    /// Name of the file holding case `case`.
    pub fn file_name(case: usize) -> String {
        format!("input_case{case}.json")
    }
}

/// Expected output of a single case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseExpected {
    /// Expected bias.
    pub expected_output: u8,
    /// Accepted distance.
    pub tolerance: u8,
    /// Name of the case.
    pub name: String,
    /// Free form description.
    pub notes: String,
}

impl CaseExpected {
    /// Name of the file holding case `case`.
    pub fn file_name(case: usize) -> String {
        format!("expected_case{case}.json")
    }
}

/// Entry of the [`TestSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseSummary {
    /// Case number, starting at 1.
    pub case: usize,
    /// Name of the case.
    pub name: String,
    /// The uniform sample.
    pub input: u32,
    /// Expected bias.
    pub expected: u8,
    /// Accepted distance.
    pub tolerance: u8,
    /// File holding the [`CaseInput`].
    pub input_file: String,
    /// File holding the [`CaseExpected`].
    pub expected_file: String,
}

/// Index of every per-case file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TestSummary {
    /// Free form description.
    pub description: String,
    /// Number of cases.
    pub total_cases: usize,
    /// Bulk distribution targets.
    pub bulk_validation: BulkValidation,
    /// The cases.
    pub test_cases: Vec<CaseSummary>,
}

/// File name of the summary.
pub const SUMMARY_FILE: &str = "test_summary.json";

/// File name of the vector set.
pub const VECTORS_FILE: &str = "test_vectors.json";

/// The canonical vectors for the compiled table.
///
/// Besides the named scenarios, every interior knot is checked against the
/// rounded Beta(2,5) inverse CDF.
pub fn canonical_vectors() -> TestVectorSet {
    let mut test_cases = alloc::vec![
        TestVector::new("zero", 0, 0, 0, "Lower end of the domain"),
        TestVector::new(
            "median",
            5000,
            26,
            1,
            "Median of Beta(2,5) is 26.44, the chord above it rounds to 27",
        ),
        TestVector::new("upper_tail", 9800, 65, 1, "98th percentile"),
        TestVector::new(
            "max_uniform",
            9999,
            100,
            1,
            "Largest sample, closest to the pinned endpoint",
        ),
    ];

    for knot in &KNOTS[1..SEGMENTS] {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = stats::ideal_bias(*knot).round() as u8;
        test_cases.push(TestVector::new(
            format!("knot_{knot}"),
            *knot,
            expected,
            1,
            "Exact inverse CDF at an interior knot",
        ));
    }

    TestVectorSet {
        description: "Bias circuit test vectors, Beta(2,5) inverse CDF"
            .to_string(),
        table_version: TABLE_VERSION,
        test_cases,
        bulk_validation: BulkValidation {
            description: "Random (nullifier, secret) pairs".to_string(),
            samples: 10_000,
            expected_mean: TARGET.mean,
            expected_std_dev: TARGET.std_dev,
            expected_tail_rate: TARGET.tail_rate,
            tolerance: Tolerance::default().into(),
        },
    }
}
