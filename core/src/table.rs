// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! The compiled knot and coefficient table.
//!
//! The table partitions `[0, UNIFORM_DOMAIN)` into [`SEGMENTS`] intervals.
//! Each interval carries a polynomial in the local offset
//! `dx = uniform - start`, with coefficients expressed in bias units scaled
//! by [`SCALE`]. The canonical table is linear: `a` is the Beta(2,5)
//! inverse CDF at the left knot and `b` the slope towards the right knot, so
//! consecutive segments meet exactly at every knot.
//!
//! Coefficients are baked into the circuit. Any change to this table is a new
//! circuit version and must bump [`TABLE_VERSION`].

use num_bigint::BigUint;

use crate::field;
use crate::TableError;

/// Fixed-point scale of the coefficients.
pub const SCALE: u64 = 1_000_000_000;

/// Size of the uniform sample domain. Samples lie in `[0, UNIFORM_DOMAIN)`.
pub const UNIFORM_DOMAIN: u32 = 10_000;

/// Largest bias value.
pub const MAX_BIAS: u8 = 100;

/// Number of intervals of the table.
pub const SEGMENTS: usize = 10;

/// Maximum number of coefficients per segment (cubic polynomials).
pub const MAX_COEFFICIENTS: usize = 4;

/// Version of the canonical table.
pub const TABLE_VERSION: u32 = 1;

/// Breakpoints of the canonical table.
pub const KNOTS: [u32; SEGMENTS + 1] =
    [0, 150, 700, 3950, 6100, 7550, 8700, 9400, 9800, 9950, 10_000];

/// Mean of `100 * Beta(2,5)`.
pub const EXPECTED_MEAN: f64 = 200.0 / 7.0;

/// Standard deviation of `100 * Beta(2,5)`.
pub const EXPECTED_STD_DEV: f64 = 15.971_914_124_998_5;

/// Probability that `100 * Beta(2,5)` exceeds 50.
pub const EXPECTED_TAIL_RATE: f64 = 0.109_375;

/// A single interval of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Left knot, inclusive.
    pub start: u32,
    /// Right knot, exclusive except for the last segment.
    pub end: u32,
    /// Coefficients in ascending order of degree: `[a, b, c, d]`.
    pub coefficients: [i64; MAX_COEFFICIENTS],
}

impl Segment {
    const fn linear(start: u32, end: u32, a: i64, b: i64) -> Self {
        Self {
            start,
            end,
            coefficients: [a, b, 0, 0],
        }
    }

    /// Width of the interval.
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the interval is empty.
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Evaluates the first `terms` coefficients at `dx` with Horner's rule.
    pub fn horner(&self, terms: usize, dx: u32) -> i128 {
        let dx = i128::from(dx);
        self.coefficients[..terms]
            .iter()
            .rev()
            .fold(0i128, |acc, c| acc * dx + i128::from(*c))
    }
}

/// A versioned set of [`SEGMENTS`] polynomial segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoefficientTable {
    /// Table version, bound into the circuit identity.
    pub version: u32,
    /// Polynomial degree shared by every segment.
    pub degree: usize,
    /// The segments, ordered by their knots.
    pub segments: [Segment; SEGMENTS],
}

/// The canonical linear table.
///
/// Knot values are `round(100 * Q(k / 10000) * SCALE)` for the Beta(2,5)
/// quantile `Q`, except the last which is pinned to `100 * SCALE`. Slopes are
/// rounded and the next knot value re-derived from them so that continuity is
/// exact.
pub const CANONICAL: CoefficientTable = CoefficientTable {
    version: TABLE_VERSION,
    degree: 1,
    segments: [
        Segment::linear(0, 150, 0, 22_038_513),
        Segment::linear(150, 700, 3_305_776_950, 7_750_452),
        Segment::linear(700, 3950, 7_568_525_550, 4_456_913),
        Segment::linear(3950, 6100, 22_053_492_800, 4_357_013),
        Segment::linear(6100, 7550, 31_421_070_750, 5_404_690),
        Segment::linear(7550, 8700, 39_257_871_250, 7_541_626),
        Segment::linear(8700, 9400, 47_930_741_150, 12_142_459),
        Segment::linear(9400, 9800, 56_430_462_450, 23_490_466),
        Segment::linear(9800, 9950, 65_826_648_850, 58_493_929),
        Segment::linear(9950, 10_000, 74_600_738_200, 507_985_236),
    ],
};

impl Default for CoefficientTable {
    fn default() -> Self {
        CANONICAL
    }
}

impl CoefficientTable {
    /// Number of coefficients evaluated per segment, capped at
    /// [`MAX_COEFFICIENTS`].
    pub const fn terms(&self) -> usize {
        if self.degree < MAX_COEFFICIENTS {
            self.degree + 1
        } else {
            MAX_COEFFICIENTS
        }
    }

    /// The knots of the table, including both ends of the domain.
    pub fn knots(&self) -> [u32; SEGMENTS + 1] {
        let mut knots = [0u32; SEGMENTS + 1];
        for (knot, segment) in knots.iter_mut().zip(self.segments.iter()) {
            *knot = segment.start;
        }
        knots[SEGMENTS] = self.segments[SEGMENTS - 1].end;
        knots
    }

    /// Column `j` of the coefficients, one entry per segment.
    pub fn column(&self, j: usize) -> [i64; SEGMENTS] {
        let mut column = [0i64; SEGMENTS];
        for (c, segment) in column.iter_mut().zip(self.segments.iter()) {
            *c = segment.coefficients[j];
        }
        column
    }

    /// Index of the segment containing `uniform`.
    ///
    /// Intervals are half-open, the last one is closed.
    pub fn segment_of(&self, uniform: u32) -> usize {
        self.segments
            .iter()
            .position(|s| uniform < s.end)
            .unwrap_or(SEGMENTS - 1)
    }

    /// Scaled value of the table at `uniform`, for any `uniform` in
    /// `[0, UNIFORM_DOMAIN]`.
    pub fn scaled_at(&self, uniform: u32) -> i128 {
        let segment = &self.segments[self.segment_of(uniform)];
        segment.horner(self.terms(), uniform - segment.start)
    }

    /// Upper bound of `Σ |c_j| · len^j` for each segment, or `None` if it
    /// does not even fit in 128 bits.
    pub fn max_magnitude(&self) -> [Option<u128>; SEGMENTS] {
        let mut bounds = [None; SEGMENTS];
        for (bound, segment) in bounds.iter_mut().zip(self.segments.iter()) {
            let len = u128::from(segment.len());
            *bound = segment.coefficients[..self.terms()]
                .iter()
                .enumerate()
                .try_fold(0u128, |acc, (j, c)| {
                    let power = len.checked_pow(u32::try_from(j).ok()?)?;
                    let term = u128::from(c.unsigned_abs()).checked_mul(power)?;
                    acc.checked_add(term)
                });
        }
        bounds
    }

    /// Statically validates the table.
    ///
    /// Checks the domain and knot ordering, exact continuity at every interior
    /// knot, that the table starts at zero and ends at `MAX_BIAS`, that it is
    /// non-decreasing over every integer input, and that no segment can come
    /// close to the field modulus.
    ///
    /// # Errors
    /// Returns the first [`TableError`] found.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.degree == 0 || self.degree >= MAX_COEFFICIENTS {
            return Err(TableError::UnsupportedDegree(self.degree));
        }

        let knots = self.knots();
        if knots[0] != 0 || knots[SEGMENTS] != UNIFORM_DOMAIN {
            return Err(TableError::BadDomain {
                first: knots[0],
                last: knots[SEGMENTS],
            });
        }

        for (i, pair) in self.segments.windows(2).enumerate() {
            if pair[0].end != pair[1].start {
                return Err(TableError::KnotsNotIncreasing(i));
            }
        }

        for (i, segment) in self.segments.iter().enumerate() {
            if segment.start >= segment.end {
                return Err(TableError::KnotsNotIncreasing(i));
            }
            if segment.coefficients[self.terms()..].iter().any(|c| *c != 0) {
                return Err(TableError::UnusedCoefficient(i));
            }
        }

        let headroom = field::headroom();
        for (i, bound) in self.max_magnitude().iter().enumerate() {
            match bound {
                Some(bound) if BigUint::from(*bound) < headroom => {}
                _ => return Err(TableError::Overflow(i)),
            }
        }

        for (i, pair) in self.segments.windows(2).enumerate() {
            let left = pair[0].horner(self.terms(), pair[0].len());
            let right = pair[1].horner(self.terms(), 0);
            if left != right {
                return Err(TableError::Discontinuity {
                    segment: i,
                    left,
                    right,
                });
            }
        }

        let origin = self.segments[0].horner(self.terms(), 0);
        if origin != 0 {
            return Err(TableError::BadOrigin(origin));
        }

        let last = &self.segments[SEGMENTS - 1];
        let endpoint = last.horner(self.terms(), last.len());
        if endpoint != i128::from(MAX_BIAS) * i128::from(SCALE) {
            return Err(TableError::BadEndpoint(endpoint));
        }

        let mut previous = origin;
        for uniform in 1..=UNIFORM_DOMAIN {
            let value = self.scaled_at(uniform);
            if value < previous {
                return Err(TableError::NonMonotonic(uniform));
            }
            previous = value;
        }

        Ok(())
    }

    /// Digest identifying the table, used to version the circuit.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.version.to_le_bytes());
        hasher.update(&(self.degree as u64).to_le_bytes());
        for segment in &self.segments {
            hasher.update(&segment.start.to_le_bytes());
            hasher.update(&segment.end.to_le_bytes());
            for c in &segment.coefficients {
                hasher.update(&c.to_le_bytes());
            }
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_table_is_valid() {
        assert_eq!(CANONICAL.validate(), Ok(()));
        assert_eq!(CANONICAL.knots(), KNOTS);
    }

    #[test]
    fn exact_at_knots() {
        for (i, segment) in CANONICAL.segments.iter().enumerate() {
            assert_eq!(
                CANONICAL.scaled_at(segment.start),
                i128::from(segment.coefficients[0]),
                "segment {i} does not start at its constant term"
            );
        }
        assert_eq!(
            CANONICAL.scaled_at(UNIFORM_DOMAIN),
            i128::from(MAX_BIAS) * i128::from(SCALE)
        );
    }

    #[test]
    fn segment_boundaries_are_half_open() {
        assert_eq!(CANONICAL.segment_of(0), 0);
        assert_eq!(CANONICAL.segment_of(149), 0);
        assert_eq!(CANONICAL.segment_of(150), 1);
        assert_eq!(CANONICAL.segment_of(9949), 8);
        assert_eq!(CANONICAL.segment_of(9950), 9);
        assert_eq!(CANONICAL.segment_of(9999), 9);
        assert_eq!(CANONICAL.segment_of(UNIFORM_DOMAIN), 9);
    }

    #[test]
    fn magnitude_is_far_below_modulus() {
        for bound in CANONICAL.max_magnitude() {
            let bound = bound.expect("bound fits in 128 bits");
            assert!(bound <= u128::from(MAX_BIAS) * u128::from(SCALE));
        }
    }

    #[test]
    fn discontinuity_is_rejected() {
        let mut table = CANONICAL;
        table.segments[3].coefficients[0] += 1;
        assert!(matches!(
            table.validate(),
            Err(TableError::Discontinuity { segment: 2, .. })
        ));
    }

    #[test]
    fn decreasing_segment_is_rejected() {
        let mut table = CANONICAL;
        // keeps both endpoints of segment 4 but dips in between
        table.degree = 2;
        let len = i64::from(table.segments[4].len());
        let b = table.segments[4].coefficients[1];
        table.segments[4].coefficients[1] = b - 2_000_000 * len;
        table.segments[4].coefficients[2] = 2_000_000;
        assert_eq!(table.validate(), Err(TableError::NonMonotonic(6101)));
    }

    #[test]
    fn broken_domain_is_rejected() {
        let mut table = CANONICAL;
        table.segments[9].end = 9999;
        assert_eq!(
            table.validate(),
            Err(TableError::BadDomain {
                first: 0,
                last: 9999
            })
        );

        let mut table = CANONICAL;
        table.segments[5].start = table.segments[5].end;
        assert_eq!(table.validate(), Err(TableError::KnotsNotIncreasing(4)));
    }

    #[test]
    fn worst_case_coefficients_fit_the_field() {
        let mut table = CANONICAL;
        table.degree = 3;
        table.segments[2].coefficients = [i64::MIN; MAX_COEFFICIENTS];
        table.segments[2].end = UNIFORM_DOMAIN;

        let bound = table.max_magnitude()[2].expect("fits in 128 bits");
        assert!(BigUint::from(bound) < field::headroom());
    }

    #[test]
    fn unused_coefficients_are_rejected() {
        let mut table = CANONICAL;
        table.segments[7].coefficients[2] = 1;
        assert_eq!(table.validate(), Err(TableError::UnusedCoefficient(7)));

        table.degree = 4;
        assert_eq!(table.validate(), Err(TableError::UnsupportedDegree(4)));
        assert_eq!(table.terms(), MAX_COEFFICIENTS);
        assert!(table.max_magnitude().iter().all(Option::is_some));
    }

    #[test]
    fn digest_tracks_coefficients() {
        let mut table = CANONICAL;
        table.segments[0].coefficients[1] += 1;
        assert_ne!(table.digest(), CANONICAL.digest());

        let mut table = CANONICAL;
        table.version += 1;
        assert_ne!(table.digest(), CANONICAL.digest());
    }
}
