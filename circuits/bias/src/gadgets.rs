// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use bias_core::field::{self, HALF_SCALE};
use bias_core::table::{
    CoefficientTable, MAX_COEFFICIENTS, SCALE, SEGMENTS, UNIFORM_DOMAIN,
};
use bias_core::ENTROPY_DOMAIN;
use dusk_plonk::prelude::*;
use dusk_poseidon::{Domain, HashGadget};

/// Bit pairs covering `[0, UNIFORM_DOMAIN)`, 14 bits.
pub const UNIFORM_BIT_PAIRS: usize = 7;

/// Bit pairs covering the hash quotient, 242 bits.
pub const QUOTIENT_BIT_PAIRS: usize = 121;

/// Bit pairs covering the rounding remainder `[0, SCALE)`, 30 bits.
pub const REMAINDER_BIT_PAIRS: usize = 15;

/// Bit pairs covering the bias, 8 bits.
pub const BIAS_BIT_PAIRS: usize = 4;

/// Constrain `0 ≤ w ≤ max`.
///
/// `w` and `max - w` must both fit in `2 · BIT_PAIRS` bits, which is only
/// sound while `max + 2^(2 · BIT_PAIRS)` stays below the modulus.
pub fn bounded<const BIT_PAIRS: usize>(
    composer: &mut Composer,
    w: Witness,
    max: BlsScalar,
) {
    composer.component_range::<BIT_PAIRS>(w);

    let constraint = Constraint::new()
        .left(-BlsScalar::one())
        .a(w)
        .constant(max);
    let slack = composer.gate_add(constraint);

    composer.component_range::<BIT_PAIRS>(slack);
}

/// Reduce `Poseidon(nullifier, secret, ENTROPY_DOMAIN)` to a sample in
/// `[0, UNIFORM_DOMAIN)`.
///
/// `entropy(n, s, q) → u = H(n, s, D) − q · 10⁴ ∧ u < 10⁴ ∧ q ≤ q_max`
pub fn entropy(
    composer: &mut Composer,
    nullifier: Witness,
    secret: Witness,
    quotient: Witness,
) -> Witness {
    let domain = composer.append_constant(BlsScalar::from(ENTROPY_DOMAIN));
    let hash = HashGadget::digest(
        composer,
        Domain::Other,
        &[nullifier, secret, domain],
    )[0];

    let constraint = Constraint::new()
        .left(BlsScalar::one())
        .a(hash)
        .right(-BlsScalar::from(u64::from(UNIFORM_DOMAIN)))
        .b(quotient);
    let uniform = composer.gate_add(constraint);

    bounded::<UNIFORM_BIT_PAIRS>(
        composer,
        uniform,
        BlsScalar::from(u64::from(UNIFORM_DOMAIN - 1)),
    );
    bounded::<QUOTIENT_BIT_PAIRS>(composer, quotient, field::quotient_max());

    uniform
}

/// Assert that the boolean `lt` is set iff `u < k`.
///
/// With `lt = 1` the gate yields `k − 1 − u`, otherwise `u − k`. The false
/// branch wraps around the modulus and fails the range check.
pub fn less_than_constant(
    composer: &mut Composer,
    u: Witness,
    lt: Witness,
    k: u32,
) {
    composer.component_boolean(lt);

    let k = BlsScalar::from(u64::from(k));
    let two = BlsScalar::from(2u64);

    let constraint = Constraint::new().mult(two).a(lt).b(u);
    let lt_u = composer.gate_mul(constraint);

    // lt · (2k − 1) − 2 · lt · u + u − k
    let constraint = Constraint::new()
        .left(two * k - BlsScalar::one())
        .a(lt)
        .right(-BlsScalar::one())
        .b(lt_u)
        .fourth(BlsScalar::one())
        .d(u)
        .constant(-k);
    let diff = composer.gate_add(constraint);

    composer.component_range::<UNIFORM_BIT_PAIRS>(diff);
}

/// Turn the comparison bits `lt[i] = u < knot[i + 1]` into a one-hot vector
/// over the segments.
///
/// `flag[0] = lt[0]`, `flag[i] = lt[i] · (1 − lt[i − 1])`,
/// `flag[n − 1] = 1 − lt[n − 2]`
pub fn interval_flags(
    composer: &mut Composer,
    less_than: &[Witness; SEGMENTS - 1],
) -> [Witness; SEGMENTS] {
    let mut flags = [Composer::ZERO; SEGMENTS];
    flags[0] = less_than[0];

    for i in 1..SEGMENTS - 1 {
        let constraint = Constraint::new()
            .mult(-BlsScalar::one())
            .a(less_than[i])
            .b(less_than[i - 1])
            .fourth(BlsScalar::one())
            .d(less_than[i]);
        flags[i] = composer.gate_mul(constraint);
    }

    let constraint = Constraint::new()
        .left(-BlsScalar::one())
        .a(less_than[SEGMENTS - 2])
        .constant(BlsScalar::one());
    flags[SEGMENTS - 1] = composer.gate_add(constraint);

    flags
}

/// Assert every flag is boolean and exactly one of them is set.
pub fn assert_one_hot(composer: &mut Composer, flags: &[Witness]) {
    let sum = flags.iter().fold(Composer::ZERO, |sum, flag| {
        composer.component_boolean(*flag);

        let constraint = Constraint::new()
            .left(BlsScalar::one())
            .a(sum)
            .right(BlsScalar::one())
            .b(*flag);
        composer.gate_add(constraint)
    });

    composer.assert_equal_constant(sum, BlsScalar::one(), None);
}

/// Multiplex a column of constants with one-hot flags.
///
/// `select(f, v) → Σ f[i] · v[i]`
///
/// Every entry is accumulated, so the gate sequence does not depend on which
/// flag is set.
pub fn select_constant(
    composer: &mut Composer,
    flags: &[Witness; SEGMENTS],
    values: &[BlsScalar; SEGMENTS],
) -> Witness {
    flags
        .iter()
        .zip(values.iter())
        .fold(Composer::ZERO, |acc, (flag, value)| {
            let constraint = Constraint::new()
                .left(BlsScalar::one())
                .a(acc)
                .right(*value)
                .b(*flag);
            composer.gate_add(constraint)
        })
}

/// Evaluate a polynomial with Horner's rule.
///
/// `coefficients` are in ascending order of degree.
pub fn horner(
    composer: &mut Composer,
    coefficients: &[Witness],
    x: Witness,
) -> Witness {
    let mut terms = coefficients.iter().rev();
    let Some(leading) = terms.next() else {
        return Composer::ZERO;
    };

    terms.fold(*leading, |acc, c| {
        let constraint = Constraint::new()
            .mult(BlsScalar::one())
            .a(acc)
            .b(x)
            .fourth(BlsScalar::one())
            .d(*c);
        composer.gate_mul(constraint)
    })
}

/// Divide a scaled value by `SCALE`, rounding to the nearest integer.
///
/// `descale(v, r) → (v + SCALE / 2 − r) · SCALE⁻¹ ∧ 0 ≤ r < SCALE`
///
/// The caller must range check the result; a wrong remainder leaves a
/// non-integer quotient that wraps around the modulus.
pub fn descale(
    composer: &mut Composer,
    scaled: Witness,
    remainder: Witness,
) -> Witness {
    bounded::<REMAINDER_BIT_PAIRS>(
        composer,
        remainder,
        BlsScalar::from(SCALE - 1),
    );

    let inv = field::inv_scale();
    let constraint = Constraint::new()
        .left(inv)
        .a(scaled)
        .right(-inv)
        .b(remainder)
        .constant(BlsScalar::from(HALF_SCALE) * inv);

    composer.gate_add(constraint)
}

/// Map a uniform sample to its bias through `table`.
///
/// `less_than` and `remainder` are prover hints, every other value is
/// recomputed and constrained. Returns the bias, range checked to
/// `[0, MAX_BIAS]`.
pub fn table_bias(
    composer: &mut Composer,
    table: &CoefficientTable,
    uniform: Witness,
    less_than: &[bool; SEGMENTS - 1],
    remainder: u64,
) -> Witness {
    let knots = table.knots();

    let mut lt = [Composer::ZERO; SEGMENTS - 1];
    for (i, (w, bit)) in lt.iter_mut().zip(less_than).enumerate() {
        *w = composer.append_witness(BlsScalar::from(u64::from(*bit)));
        less_than_constant(composer, uniform, *w, knots[i + 1]);
    }

    let flags = interval_flags(composer, &lt);
    assert_one_hot(composer, &flags);

    let mut starts = [BlsScalar::zero(); SEGMENTS];
    for (s, knot) in starts.iter_mut().zip(&knots[..SEGMENTS]) {
        *s = BlsScalar::from(u64::from(*knot));
    }
    let start = select_constant(composer, &flags, &starts);

    let constraint = Constraint::new()
        .left(BlsScalar::one())
        .a(uniform)
        .right(-BlsScalar::one())
        .b(start);
    let dx = composer.gate_add(constraint);

    let terms = table.terms();
    let mut coefficients = [Composer::ZERO; MAX_COEFFICIENTS];
    for (j, c) in coefficients.iter_mut().take(terms).enumerate() {
        let column = table.column(j).map(field::scalar_from_i64);
        *c = select_constant(composer, &flags, &column);
    }
    let scaled = horner(composer, &coefficients[..terms], dx);

    let remainder = composer.append_witness(BlsScalar::from(remainder));
    let bias = descale(composer, scaled, remainder);

    bounded::<BIAS_BIT_PAIRS>(
        composer,
        bias,
        BlsScalar::from(u64::from(bias_core::table::MAX_BIAS)),
    );

    bias
}
