// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Distribution checks for the compiled table.
//!
//! The table approximates `100 * X` for `X ~ Beta(2, 5)`. This module holds
//! the closed form of that distribution, the knot values the canonical table
//! is compiled from, and the moment accumulators used to compare an empirical
//! distribution of biases against the target.

use core::fmt;

use crate::table::{
    CoefficientTable, Segment, EXPECTED_MEAN, EXPECTED_STD_DEV,
    EXPECTED_TAIL_RATE, MAX_BIAS, SCALE, SEGMENTS, TABLE_VERSION,
    UNIFORM_DOMAIN,
};
use crate::Error;

/// Bias above which a sample counts towards the tail rate.
pub const TAIL_THRESHOLD: u8 = 50;

const BISECTION_STEPS: usize = 200;

/// CDF of Beta(2, 5), `1 - (1 - x)^5 (1 + 5x)`.
pub fn cdf(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    1.0 - (1.0 - x).powi(5) * (1.0 + 5.0 * x)
}

/// Inverse CDF of Beta(2, 5), found by bisection.
pub fn quantile(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    for _ in 0..BISECTION_STEPS {
        let mid = (lo + hi) / 2.0;
        if cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

/// `100 * Q(uniform / UNIFORM_DOMAIN)`, the exact bias a sample should map to.
pub fn ideal_bias(uniform: u32) -> f64 {
    let p = f64::from(uniform) / f64::from(UNIFORM_DOMAIN);
    f64::from(MAX_BIAS) * quantile(p)
}

/// Scaled values of the inverse CDF at the given knots.
///
/// The last knot is pinned to `MAX_BIAS * SCALE`.
pub fn derive_knot_values(
    knots: &[u32; SEGMENTS + 1],
) -> [i128; SEGMENTS + 1] {
    let mut values = [0i128; SEGMENTS + 1];
    for (value, knot) in values.iter_mut().zip(knots) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        {
            *value = (ideal_bias(*knot) * SCALE as f64).round() as i128;
        }
    }
    values[SEGMENTS] = i128::from(MAX_BIAS) * i128::from(SCALE);
    values
}

/// Compiles a continuous linear table through the given knots.
///
/// Each slope is rounded towards the inverse CDF at the right knot, starting
/// from the value the previous segment actually reaches, so neighbouring
/// segments meet exactly. The returned table still has to pass
/// [`CoefficientTable::validate`].
///
/// # Errors
/// Fails if a slope does not fit the coefficient type.
pub fn compile_linear(
    knots: &[u32; SEGMENTS + 1],
) -> Result<CoefficientTable, Error> {
    let values = derive_knot_values(knots);
    let mut segments = [Segment {
        start: 0,
        end: 0,
        coefficients: [0; 4],
    }; SEGMENTS];

    let mut reached = values[0];
    for (i, segment) in segments.iter_mut().enumerate() {
        let (start, end) = (knots[i], knots[i + 1]);
        let len = i128::from(end.saturating_sub(start).max(1));
        let slope = div_round(values[i + 1] - reached, len);

        let narrow = |v: i128| {
            i64::try_from(v)
                .map_err(|_| Error::Table(crate::TableError::Overflow(i)))
        };
        *segment = Segment {
            start,
            end,
            coefficients: [narrow(reached)?, narrow(slope)?, 0, 0],
        };
        reached += slope * len;
    }

    Ok(CoefficientTable {
        version: TABLE_VERSION,
        degree: 1,
        segments,
    })
}

fn div_round(n: i128, d: i128) -> i128 {
    (2 * n + d).div_euclid(2 * d)
}

/// Summary statistics of a bias distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Mean bias.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Fraction of biases above [`TAIL_THRESHOLD`].
    pub tail_rate: f64,
}

/// Moments of `100 * Beta(2, 5)`.
pub const TARGET: Moments = Moments {
    mean: EXPECTED_MEAN,
    std_dev: EXPECTED_STD_DEV,
    tail_rate: EXPECTED_TAIL_RATE,
};

impl fmt::Display for Moments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean {:.4}, std dev {:.4}, P(bias > {TAIL_THRESHOLD}) {:.4}",
            self.mean, self.std_dev, self.tail_rate
        )
    }
}

/// Streaming accumulator of bias values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    count: u64,
    sum: u64,
    sum_sq: u64,
    tail: u64,
    min: Option<u8>,
    max: Option<u8>,
}

impl Summary {
    /// Records a bias.
    pub fn push(&mut self, bias: u8) {
        let b = u64::from(bias);
        self.count += 1;
        self.sum += b;
        self.sum_sq += b * b;
        self.tail += u64::from(bias > TAIL_THRESHOLD);
        self.min = Some(self.min.map_or(bias, |m| m.min(bias)));
        self.max = Some(self.max.map_or(bias, |m| m.max(bias)));
    }

    /// Folds another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.tail += other.tail;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    /// Number of recorded values.
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Smallest and largest recorded value.
    pub fn range(&self) -> Option<(u8, u8)> {
        self.min.zip(self.max)
    }

    /// Moments of the recorded values, `None` if nothing was recorded.
    #[allow(clippy::cast_precision_loss)]
    pub fn moments(&self) -> Option<Moments> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum as f64 / n;
        let variance = (self.sum_sq as f64 / n - mean * mean).max(0.0);
        Some(Moments {
            mean,
            std_dev: variance.sqrt(),
            tail_rate: self.tail as f64 / n,
        })
    }
}

impl Extend<u8> for Summary {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        iter.into_iter().for_each(|b| self.push(b));
    }
}

/// Absolute tolerances on each moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Allowed deviation of the mean.
    pub mean: f64,
    /// Allowed deviation of the standard deviation.
    pub std_dev: f64,
    /// Allowed deviation of the tail rate.
    pub tail_rate: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            mean: 0.5,
            std_dev: 1.0,
            tail_rate: 0.01,
        }
    }
}

/// A moment that fell outside of its tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deviation {
    /// The mean, observed and expected.
    Mean(f64, f64),
    /// The standard deviation, observed and expected.
    StdDev(f64, f64),
    /// The tail rate, observed and expected.
    TailRate(f64, f64),
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, observed, expected) = match self {
            Self::Mean(o, e) => ("mean", o, e),
            Self::StdDev(o, e) => ("std dev", o, e),
            Self::TailRate(o, e) => ("tail rate", o, e),
        };
        write!(f, "{name} {observed:.4} deviates from {expected:.4}")
    }
}

impl std::error::Error for Deviation {}

impl Tolerance {
    /// Checks observed moments against the expected ones.
    ///
    /// # Errors
    /// Returns the first moment outside of the tolerance.
    pub fn check(
        &self,
        observed: &Moments,
        expected: &Moments,
    ) -> Result<(), Deviation> {
        if (observed.mean - expected.mean).abs() > self.mean {
            return Err(Deviation::Mean(observed.mean, expected.mean));
        }
        if (observed.std_dev - expected.std_dev).abs() > self.std_dev {
            return Err(Deviation::StdDev(observed.std_dev, expected.std_dev));
        }
        if (observed.tail_rate - expected.tail_rate).abs() > self.tail_rate {
            return Err(Deviation::TailRate(
                observed.tail_rate,
                expected.tail_rate,
            ));
        }
        Ok(())
    }
}

/// Accumulates the bias of every sample in the domain.
///
/// # Errors
/// Propagates evaluation failures of the table.
pub fn exhaustive(table: &CoefficientTable) -> Result<Summary, Error> {
    let mut summary = Summary::default();
    for uniform in 0..UNIFORM_DOMAIN {
        summary.push(table.evaluate(uniform)?.bias);
    }
    Ok(summary)
}

/// Largest distance between the table and the ideal inverse CDF, over the
/// samples below `limit`.
///
/// # Errors
/// Propagates evaluation failures of the table.
pub fn max_abs_error(
    table: &CoefficientTable,
    limit: u32,
) -> Result<f64, Error> {
    let mut worst = 0.0f64;
    for uniform in 0..limit.min(UNIFORM_DOMAIN) {
        let bias = f64::from(table.evaluate(uniform)?.bias);
        worst = worst.max((bias - ideal_bias(uniform)).abs());
    }
    Ok(worst)
}
