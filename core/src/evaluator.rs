// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use dusk_bls12_381::BlsScalar;

use crate::field::{self, HALF_SCALE};
use crate::table::{
    CoefficientTable, CANONICAL, MAX_BIAS, MAX_COEFFICIENTS, SCALE, SEGMENTS,
    UNIFORM_DOMAIN,
};
use crate::{Entropy, Error, TableError};

/// Every intermediate value of the bias computation for one sample.
///
/// The values are produced with the same selection and multiplexing
/// arithmetic the circuit uses, so they double as the prover's witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// The sample.
    pub uniform: u32,
    /// `less_than[i]` holds iff `uniform < knots[i + 1]`.
    pub less_than: [bool; SEGMENTS - 1],
    /// One-hot selector of the active segment.
    pub flags: [bool; SEGMENTS],
    /// Index of the active segment.
    pub segment: usize,
    /// Left knot of the active segment, selected through the flags.
    pub start: u32,
    /// Offset of the sample into the active segment.
    pub dx: u32,
    /// The selected coefficients, zero above the table degree.
    pub coefficients: [i64; MAX_COEFFICIENTS],
    /// Polynomial value, in bias units scaled by `SCALE`.
    pub scaled: i128,
    /// `(scaled + HALF_SCALE) mod SCALE`.
    pub remainder: u64,
    /// The bias, `scaled / SCALE` rounded to the nearest integer.
    pub bias: u8,
}

impl Evaluation {
    /// Recomputes the bias with field arithmetic only, multiplying by the
    /// inverse of the scale the way the circuit does.
    pub fn bias_in_field(&self) -> BlsScalar {
        let shifted = field::scalar_from_i128(self.scaled)
            + BlsScalar::from(HALF_SCALE)
            - BlsScalar::from(self.remainder);
        shifted * field::inv_scale()
    }
}

/// A bias together with the entropy it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// The entropy reduction.
    pub entropy: Entropy,
    /// The evaluation of the reduced sample.
    pub evaluation: Evaluation,
}

impl Outcome {
    /// The bias value.
    pub const fn bias(&self) -> u8 {
        self.evaluation.bias
    }
}

impl CoefficientTable {
    /// Evaluates the table at `uniform`.
    ///
    /// # Errors
    /// Fails if `uniform` is not below `UNIFORM_DOMAIN`, if the degree or the
    /// knots of the table cannot be evaluated, or if the table produces a
    /// value outside of `[0, MAX_BIAS]`. None of these can happen for a table
    /// that passed [`CoefficientTable::validate`].
    pub fn evaluate(&self, uniform: u32) -> Result<Evaluation, Error> {
        if uniform >= UNIFORM_DOMAIN {
            return Err(Error::UniformOutOfRange(uniform));
        }
        if self.degree == 0 || self.degree >= MAX_COEFFICIENTS {
            return Err(TableError::UnsupportedDegree(self.degree).into());
        }

        let knots = self.knots();
        if knots[0] != 0 {
            return Err(TableError::BadDomain {
                first: knots[0],
                last: knots[SEGMENTS],
            }
            .into());
        }
        if let Some(i) = knots.windows(2).position(|k| k[0] >= k[1]) {
            return Err(TableError::KnotsNotIncreasing(i).into());
        }

        let mut less_than = [false; SEGMENTS - 1];
        for (lt, knot) in less_than.iter_mut().zip(&knots[1..SEGMENTS]) {
            *lt = uniform < *knot;
        }

        let mut flags = [false; SEGMENTS];
        flags[0] = less_than[0];
        for i in 1..SEGMENTS - 1 {
            flags[i] = less_than[i] && !less_than[i - 1];
        }
        flags[SEGMENTS - 1] = !less_than[SEGMENTS - 2];

        // sum over the one-hot flags, never indexing by the sample
        let start: u32 = flags
            .iter()
            .zip(&knots[..SEGMENTS])
            .map(|(f, k)| u32::from(*f) * k)
            .sum();
        let mut coefficients = [0i64; MAX_COEFFICIENTS];
        for (j, c) in coefficients.iter_mut().enumerate() {
            *c = flags
                .iter()
                .zip(self.column(j))
                .map(|(f, v)| i64::from(*f) * v)
                .sum();
        }

        let segment = flags.iter().position(|f| *f).unwrap_or(SEGMENTS - 1);
        let dx = uniform - start;

        let scaled = coefficients[..self.terms()]
            .iter()
            .rev()
            .fold(0i128, |acc, c| acc * i128::from(dx) + i128::from(*c));

        let max = i128::from(MAX_BIAS) * i128::from(SCALE);
        if !(0..=max).contains(&scaled) {
            return Err(Error::BiasOutOfRange(scaled));
        }

        // both casts are bounded by the range check above
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let (bias, remainder) = {
            let shifted = scaled + i128::from(HALF_SCALE);
            let scale = i128::from(SCALE);
            ((shifted / scale) as u8, (shifted % scale) as u64)
        };

        Ok(Evaluation {
            uniform,
            less_than,
            flags,
            segment,
            start,
            dx,
            coefficients,
            scaled,
            remainder,
            bias,
        })
    }
}

/// Evaluates the canonical table at `uniform`.
///
/// # Errors
/// See [`CoefficientTable::evaluate`].
pub fn evaluate(uniform: u32) -> Result<Evaluation, Error> {
    CANONICAL.evaluate(uniform)
}

/// Derives the bias of a participant from their nullifier and secret.
///
/// # Errors
/// Propagates failures of [`Entropy::derive`] and [`evaluate`].
pub fn bias(
    nullifier: &BlsScalar,
    secret: &BlsScalar,
) -> Result<Outcome, Error> {
    let entropy = Entropy::derive(nullifier, secret)?;
    let evaluation = evaluate(entropy.uniform)?;
    Ok(Outcome {
        entropy,
        evaluation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::KNOTS;

    fn bias_of(uniform: u32) -> u8 {
        evaluate(uniform).expect("sample in range").bias
    }

    #[test]
    fn reference_scenarios() {
        assert_eq!(bias_of(0), 0);
        assert_eq!(bias_of(5000), 27);
        assert_eq!(bias_of(9800), 66);
        assert_eq!(bias_of(9999), 99);
    }

    #[test]
    fn values_at_knot_boundaries() {
        assert_eq!(bias_of(149), 3);
        assert_eq!(bias_of(150), 3);
        assert_eq!(bias_of(9949), 75);
        assert_eq!(bias_of(9950), 75);

        for (i, knot) in KNOTS[..SEGMENTS].iter().enumerate() {
            let evaluation = evaluate(*knot).unwrap();
            assert_eq!(evaluation.segment, i);
            assert_eq!(evaluation.dx, 0);
            assert_eq!(evaluation.start, *knot);
            if *knot > 0 {
                assert_eq!(evaluate(knot - 1).unwrap().segment, i - 1);
            }
        }
    }

    #[test]
    fn exactly_one_flag() {
        for uniform in 0..UNIFORM_DOMAIN {
            let evaluation = evaluate(uniform).unwrap();
            let raised: usize =
                evaluation.flags.iter().map(|f| usize::from(*f)).sum();
            assert_eq!(raised, 1, "sample {uniform}");
            assert!(evaluation.flags[evaluation.segment]);
            assert_eq!(evaluation.segment, CANONICAL.segment_of(uniform));
        }
    }

    #[test]
    fn monotone_and_in_range() {
        let mut previous = 0;
        for uniform in 0..UNIFORM_DOMAIN {
            let bias = bias_of(uniform);
            assert!(bias <= MAX_BIAS);
            assert!(bias >= previous, "decrease at {uniform}");
            previous = bias;
        }
    }

    #[test]
    fn out_of_domain_sample() {
        assert_eq!(
            evaluate(UNIFORM_DOMAIN),
            Err(Error::UniformOutOfRange(UNIFORM_DOMAIN))
        );
        assert_eq!(evaluate(u32::MAX), Err(Error::UniformOutOfRange(u32::MAX)));
    }

    #[test]
    fn broken_table_is_caught() {
        let mut table = CANONICAL;
        table.segments[9].coefficients[1] *= 2;
        assert!(matches!(
            table.evaluate(9999),
            Err(Error::BiasOutOfRange(_))
        ));
    }

    #[test]
    fn malformed_table_is_refused() {
        let mut table = CANONICAL;
        table.degree = MAX_COEFFICIENTS;
        assert_eq!(
            table.evaluate(5000),
            Err(Error::Table(TableError::UnsupportedDegree(MAX_COEFFICIENTS)))
        );

        let mut table = CANONICAL;
        table.segments[3].start = table.segments[4].start;
        assert_eq!(
            table.evaluate(table.segments[3].end),
            Err(Error::Table(TableError::KnotsNotIncreasing(3)))
        );

        let mut table = CANONICAL;
        table.segments[0].start = 10;
        assert!(matches!(
            table.evaluate(0),
            Err(Error::Table(TableError::BadDomain { first: 10, .. }))
        ));
    }

    #[test]
    fn field_arithmetic_agrees() {
        for uniform in (0..UNIFORM_DOMAIN).step_by(7).chain([9999]) {
            let evaluation = evaluate(uniform).unwrap();
            assert_eq!(
                evaluation.bias_in_field(),
                BlsScalar::from(u64::from(evaluation.bias)),
                "sample {uniform}"
            );
            assert!(evaluation.remainder < SCALE);
        }
    }

    #[test]
    fn outcome_matches_sample() {
        let nullifier = BlsScalar::from(0x5eedu64);
        let secret = BlsScalar::from(42u64);
        let outcome = bias(&nullifier, &secret).unwrap();
        assert_eq!(
            outcome.evaluation,
            evaluate(outcome.entropy.uniform).unwrap()
        );
        assert_eq!(outcome.bias(), outcome.evaluation.bias);
    }
}
