// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Error-type for bias-core.

use core::fmt;

/// The bias-core error type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The uniform sample is outside of `[0, UNIFORM_DOMAIN)`.
    UniformOutOfRange(u32),
    /// The hash quotient exceeds the bound the circuit can prove.
    QuotientOutOfRange,
    /// The evaluated polynomial left the `[0, MAX_BIAS]` output domain.
    BiasOutOfRange(i128),
    /// The coefficient table failed static validation.
    Table(TableError),
}

/// Defects of a coefficient table. All of them are fatal and must be caught
/// before a table is compiled into a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The first knot is not `0` or the last one is not `UNIFORM_DOMAIN`.
    BadDomain {
        /// First knot found
        first: u32,
        /// Last knot found
        last: u32,
    },
    /// Knots are not strictly increasing at the given segment.
    KnotsNotIncreasing(usize),
    /// The polynomial degree is not supported.
    UnsupportedDegree(usize),
    /// A coefficient above the table degree is not zero.
    UnusedCoefficient(usize),
    /// Segment `i` does not end where segment `i + 1` starts.
    Discontinuity {
        /// Index of the left segment
        segment: usize,
        /// Value of the left segment at its right edge
        left: i128,
        /// Value of the right segment at its left edge
        right: i128,
    },
    /// The last segment does not end at `MAX_BIAS`.
    BadEndpoint(i128),
    /// The first segment does not start at zero.
    BadOrigin(i128),
    /// The table decreases between `uniform - 1` and `uniform`.
    NonMonotonic(u32),
    /// The magnitude bound of a segment leaves no headroom in the field.
    Overflow(usize),
    /// The interchange record carries a different scale factor.
    ScaleMismatch(u64),
    /// The interchange record targets a different field.
    FieldMismatch,
    /// The interchange record has the wrong number of segments.
    SegmentCount(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bias-Core Error: {:?}", &self)
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coefficient Table Error: {:?}", &self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Table(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TableError {}

impl From<TableError> for Error {
    fn from(table_error: TableError) -> Self {
        Self::Table(table_error)
    }
}
