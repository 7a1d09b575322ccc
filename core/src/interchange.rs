// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Serializable form of the coefficient table.
//!
//! The record carries table metadata next to the segments so that consumers
//! outside of this workspace can check they agree on the scale and the field
//! before using the coefficients.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::field::MODULUS_LIMBS;
use crate::table::{
    CoefficientTable, Segment, EXPECTED_MEAN, EXPECTED_STD_DEV,
    EXPECTED_TAIL_RATE, MAX_COEFFICIENTS, SCALE, SEGMENTS,
};
use crate::{Error, TableError};

/// One segment of a [`TableRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Position of the segment in the table.
    pub index: usize,
    /// Half-open `[start, end)` range of the segment.
    pub range: [u32; 2],
    /// Constant term.
    pub a_scaled: i64,
    /// Linear term.
    pub b_scaled: i64,
    /// Quadratic term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_scaled: Option<i64>,
    /// Cubic term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_scaled: Option<i64>,
}

/// Moments the table is expected to reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedMoments {
    /// Mean bias.
    pub mean: f64,
    /// Standard deviation of the bias.
    pub std_dev: f64,
    /// Fraction of biases above 50.
    pub tail_rate: f64,
}

/// A complete coefficient table with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Table version.
    pub version: u32,
    /// Fixed-point scale of the coefficients.
    pub scale: u64,
    /// Hex encoded modulus of the field the table is evaluated in.
    pub field_prime: String,
    /// Target distribution moments.
    pub expected: ExpectedMoments,
    /// The segments.
    pub segments: Vec<SegmentRecord>,
}

/// Hex encoding of the scalar field modulus.
pub fn field_prime() -> String {
    format!(
        "0x{:016x}{:016x}{:016x}{:016x}",
        MODULUS_LIMBS[3], MODULUS_LIMBS[2], MODULUS_LIMBS[1], MODULUS_LIMBS[0]
    )
}

impl From<&CoefficientTable> for TableRecord {
    fn from(table: &CoefficientTable) -> Self {
        let higher = |j: usize, c: i64| (table.degree >= j).then_some(c);
        let segments = table
            .segments
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let [a, b, c, d] = s.coefficients;
                SegmentRecord {
                    index,
                    range: [s.start, s.end],
                    a_scaled: a,
                    b_scaled: b,
                    c_scaled: higher(2, c),
                    d_scaled: higher(3, d),
                }
            })
            .collect();

        Self {
            version: table.version,
            scale: SCALE,
            field_prime: field_prime(),
            expected: ExpectedMoments {
                mean: EXPECTED_MEAN,
                std_dev: EXPECTED_STD_DEV,
                tail_rate: EXPECTED_TAIL_RATE,
            },
            segments,
        }
    }
}

impl TableRecord {
    /// Rebuilds and validates the table.
    ///
    /// The degree is the highest term present in any segment; absent terms
    /// are zero.
    ///
    /// # Errors
    /// Fails on metadata that does not match this build, on a wrong number
    /// or order of segments, and on any [`CoefficientTable::validate`]
    /// failure.
    pub fn to_table(&self) -> Result<CoefficientTable, Error> {
        if self.scale != SCALE {
            return Err(TableError::ScaleMismatch(self.scale).into());
        }
        if !self.field_prime.eq_ignore_ascii_case(&field_prime()) {
            return Err(TableError::FieldMismatch.into());
        }
        if self.segments.len() != SEGMENTS {
            return Err(TableError::SegmentCount(self.segments.len()).into());
        }

        let mut degree = 1;
        let mut segments = [Segment {
            start: 0,
            end: 0,
            coefficients: [0; MAX_COEFFICIENTS],
        }; SEGMENTS];

        for (i, (segment, record)) in
            segments.iter_mut().zip(&self.segments).enumerate()
        {
            if record.index != i {
                return Err(TableError::KnotsNotIncreasing(i).into());
            }
            if record.c_scaled.is_some() {
                degree = degree.max(2);
            }
            if record.d_scaled.is_some() {
                degree = 3;
            }
            *segment = Segment {
                start: record.range[0],
                end: record.range[1],
                coefficients: [
                    record.a_scaled,
                    record.b_scaled,
                    record.c_scaled.unwrap_or_default(),
                    record.d_scaled.unwrap_or_default(),
                ],
            };
        }

        let table = CoefficientTable {
            version: self.version,
            degree,
            segments,
        };
        table.validate()?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CANONICAL;

    #[test]
    fn canonical_record_is_linear() {
        let record = TableRecord::from(&CANONICAL);
        assert_eq!(record.segments.len(), SEGMENTS);
        assert!(record
            .segments
            .iter()
            .all(|s| s.c_scaled.is_none() && s.d_scaled.is_none()));
        assert_eq!(record.segments[3].range, [3950, 6100]);
        assert_eq!(record.to_table(), Ok(CANONICAL));
    }

    #[test]
    fn field_prime_encoding() {
        assert_eq!(
            field_prime(),
            "0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001"
        );
    }

    #[test]
    fn metadata_is_checked() {
        let mut record = TableRecord::from(&CANONICAL);
        record.scale = 1_000_000;
        assert_eq!(
            record.to_table(),
            Err(Error::Table(TableError::ScaleMismatch(1_000_000)))
        );

        let mut record = TableRecord::from(&CANONICAL);
        record.field_prime = "0x01".into();
        assert_eq!(
            record.to_table(),
            Err(Error::Table(TableError::FieldMismatch))
        );

        let mut record = TableRecord::from(&CANONICAL);
        record.segments.pop();
        assert_eq!(
            record.to_table(),
            Err(Error::Table(TableError::SegmentCount(SEGMENTS - 1)))
        );
    }

    #[test]
    fn higher_terms_raise_the_degree() {
        let mut record = TableRecord::from(&CANONICAL);
        record.segments[0].c_scaled = Some(0);
        let table = record.to_table().expect("a zero term keeps the table");
        assert_eq!(table.degree, 2);
        assert_eq!(table.evaluate(100), CANONICAL.evaluate(100));
    }
}
