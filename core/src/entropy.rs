// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use core::fmt;

use dusk_bls12_381::BlsScalar;
use dusk_poseidon::{Domain, Hash};
use num_bigint::BigUint;

use crate::field;
use crate::table::UNIFORM_DOMAIN;
use crate::Error;

/// Domain separator appended to the entropy preimage, `"bias-v01"` read as a
/// big-endian integer.
pub const ENTROPY_DOMAIN: u64 = u64::from_be_bytes(*b"bias-v01");

/// The reduction of `Poseidon(nullifier, secret, ENTROPY_DOMAIN)` to a
/// uniform sample.
///
/// `hash = quotient * UNIFORM_DOMAIN + uniform`, with `uniform` in
/// `[0, UNIFORM_DOMAIN)` and `quotient` no larger than
/// [`field::quotient_max`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Entropy {
    /// The Poseidon digest.
    pub hash: BlsScalar,
    /// `hash / UNIFORM_DOMAIN`.
    pub quotient: BlsScalar,
    /// `hash % UNIFORM_DOMAIN`.
    pub uniform: u32,
}

impl Entropy {
    /// Hashes the nullifier and secret and reduces the digest.
    ///
    /// # Errors
    /// Fails with [`Error::QuotientOutOfRange`] when the digest falls in the
    /// last, incomplete block of `UNIFORM_DOMAIN` values below the modulus.
    pub fn derive(
        nullifier: &BlsScalar,
        secret: &BlsScalar,
    ) -> Result<Self, Error> {
        Self::from_hash(Self::digest(nullifier, secret))
    }

    /// The raw entropy digest.
    pub fn digest(nullifier: &BlsScalar, secret: &BlsScalar) -> BlsScalar {
        let domain = BlsScalar::from(ENTROPY_DOMAIN);
        Hash::digest(Domain::Other, &[*nullifier, *secret, domain])[0]
    }

    /// Reduces an already computed digest.
    ///
    /// # Errors
    /// See [`Entropy::derive`].
    pub fn from_hash(hash: BlsScalar) -> Result<Self, Error> {
        let value = field::to_biguint(&hash);
        let domain = BigUint::from(UNIFORM_DOMAIN);

        let quotient = &value / &domain;
        if quotient > field::quotient_bound() {
            return Err(Error::QuotientOutOfRange);
        }

        // a zero remainder has no digits
        let uniform = (value % domain).iter_u32_digits().next().unwrap_or(0);

        Ok(Self {
            hash,
            quotient: field::from_biguint(&quotient),
            uniform,
        })
    }
}

// The hash and quotient are enough to brute force a low entropy secret, so
// only the public sample is printed.
impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entropy")
            .field("uniform", &self.uniform)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::collections::HashSet;
    use std::format;

    use ff::Field;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn domain_separator() {
        assert_eq!(ENTROPY_DOMAIN, 0x6269_6173_2d76_3031);
    }

    #[test]
    fn decomposition_recombines() {
        let mut rng = StdRng::seed_from_u64(0xbead);
        let domain = BlsScalar::from(u64::from(UNIFORM_DOMAIN));

        for _ in 0..64 {
            let nullifier = BlsScalar::random(&mut rng);
            let secret = BlsScalar::random(&mut rng);
            let entropy = Entropy::derive(&nullifier, &secret)
                .expect("random digests are reducible");

            assert!(entropy.uniform < UNIFORM_DOMAIN);
            assert_eq!(
                entropy.quotient * domain
                    + BlsScalar::from(u64::from(entropy.uniform)),
                entropy.hash
            );
        }
    }

    #[test]
    fn deterministic_and_secret_dependent() {
        let nullifier = BlsScalar::from(7u64);
        let a = Entropy::derive(&nullifier, &BlsScalar::from(1u64)).unwrap();
        let b = Entropy::derive(&nullifier, &BlsScalar::from(1u64)).unwrap();
        let c = Entropy::derive(&nullifier, &BlsScalar::from(2u64)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a.hash, c.hash);
    }

    #[test]
    fn nullifiers_spread_over_the_domain() {
        let secret = BlsScalar::from(0xdead_beefu64);
        let samples: HashSet<u32> = (0..200u64)
            .map(|n| {
                Entropy::derive(&BlsScalar::from(n), &secret)
                    .unwrap()
                    .uniform
            })
            .collect();

        // 200 draws from 10000 values collide only a handful of times
        assert!(samples.len() > 190);
    }

    #[test]
    fn top_block_is_rejected() {
        let minus_one = -BlsScalar::one();
        assert_eq!(
            Entropy::from_hash(minus_one),
            Err(Error::QuotientOutOfRange)
        );

        let max = field::quotient_max() * BlsScalar::from(10_000u64)
            + BlsScalar::from(9_999u64);
        let entropy = Entropy::from_hash(max).unwrap();
        assert_eq!(entropy.quotient, field::quotient_max());
        assert_eq!(entropy.uniform, 9_999);
    }

    #[test]
    fn debug_hides_digest() {
        let entropy = Entropy::from_hash(BlsScalar::from(123_456u64)).unwrap();
        let printed = format!("{entropy:?}");
        assert_eq!(printed, "Entropy { uniform: 3456, .. }");
    }
}
