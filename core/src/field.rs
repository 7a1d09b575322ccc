// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Field constants shared by the circuit and the reference evaluator.
//!
//! The scalar field of BLS12-381 has no integer division, so the fixed-point
//! scale is removed by multiplying with its modular inverse. Both the inverse
//! and the largest provable hash quotient depend on the field modulus `r` and
//! have to be recomputed if it or [`SCALE`] ever changes.
//!
//! [`SCALE`]: crate::table::SCALE

use alloc::vec::Vec;

use dusk_bls12_381::BlsScalar;
use dusk_bytes::Serializable;
use num_bigint::BigUint;

use crate::table::SCALE;

/// Little-endian limbs of the scalar field modulus
/// `r = 0x73eda753..00000001`.
pub const MODULUS_LIMBS: [u64; 4] = [
    0xffff_ffff_0000_0001,
    0x53bd_a402_fffe_5bfe,
    0x3339_d808_09a1_d805,
    0x73ed_a753_299d_7d48,
];

/// Little-endian limbs of `SCALE^-1 mod r`.
pub const INV_SCALE_LIMBS: [u64; 4] = [
    0x645b_ec8b_322f_a813,
    0xfb61_6f9b_32c8_5d94,
    0x1722_222d_c2a8_da72,
    0x2cd5_2999_c0b0_b30a,
];

/// Little-endian limbs of `floor(r / UNIFORM_DOMAIN) - 1`.
///
/// Bounding the quotient by this value keeps
/// `quotient * UNIFORM_DOMAIN + uniform` strictly below `r`, which makes the
/// decomposition of a hash into quotient and remainder unique.
pub const QUOTIENT_MAX_LIMBS: [u64; 4] = [
    0x019c_e075_f6f6_9445,
    0x72d3_0a2d_fa57_a77c,
    0xef6a_941e_1b3d_46e8,
    0x0002_f7bf_7880_dc4c,
];

/// Half of the scale, added before dividing to round to the nearest integer.
pub const HALF_SCALE: u64 = SCALE / 2;

/// Number of bits needed to represent [`quotient_max`].
pub const QUOTIENT_BITS: usize = 242;

/// Multiplicative inverse of [`SCALE`] in the scalar field.
pub fn inv_scale() -> BlsScalar {
    BlsScalar::from_raw(INV_SCALE_LIMBS)
}

/// Largest quotient accepted by the entropy reduction.
pub fn quotient_max() -> BlsScalar {
    BlsScalar::from_raw(QUOTIENT_MAX_LIMBS)
}

/// The scalar field modulus as a big integer.
pub fn modulus() -> BigUint {
    from_limbs(&MODULUS_LIMBS)
}

/// Largest accepted quotient as a big integer.
pub fn quotient_bound() -> BigUint {
    from_limbs(&QUOTIENT_MAX_LIMBS)
}

/// Field elements available above a value before it wraps around, used to
/// judge whether the table coefficients leave enough headroom.
pub fn headroom() -> BigUint {
    modulus() >> 64
}

/// Maps a signed integer into the field, negative values wrapping to
/// `r - |value|`.
pub fn scalar_from_i64(value: i64) -> BlsScalar {
    let magnitude = BlsScalar::from(value.unsigned_abs());
    if value < 0 { -magnitude } else { magnitude }
}

/// Maps a signed 128-bit integer into the field.
pub fn scalar_from_i128(value: i128) -> BlsScalar {
    let magnitude = value.unsigned_abs();
    #[allow(clippy::cast_possible_truncation)]
    let limbs = [magnitude as u64, (magnitude >> 64) as u64, 0, 0];
    let magnitude = BlsScalar::from_raw(limbs);
    if value < 0 { -magnitude } else { magnitude }
}

/// The canonical representative of `scalar`.
pub fn to_biguint(scalar: &BlsScalar) -> BigUint {
    BigUint::from_bytes_le(&scalar.to_bytes())
}

/// Maps an integer below `2^256` into the field.
///
/// Digits above the fourth limb are ignored, so `value` is expected to be
/// smaller than the modulus.
pub fn from_biguint(value: &BigUint) -> BlsScalar {
    let mut limbs = [0u64; 4];
    limbs
        .iter_mut()
        .zip(value.iter_u64_digits())
        .for_each(|(limb, digit)| *limb = digit);
    BlsScalar::from_raw(limbs)
}

fn from_limbs(limbs: &[u64; 4]) -> BigUint {
    let bytes: Vec<u8> = limbs.iter().flat_map(|l| l.to_le_bytes()).collect();
    BigUint::from_bytes_le(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::UNIFORM_DOMAIN;

    #[test]
    fn inverse_round_trip() {
        let scale = BlsScalar::from(SCALE);
        assert_eq!(scale * inv_scale(), BlsScalar::one());

        let expected: Option<BlsScalar> = scale.invert().into();
        assert_eq!(Some(inv_scale()), expected);
    }

    #[test]
    fn inverse_removes_scale_from_exact_multiples() {
        for bias in [0u64, 1, 27, 99, 100] {
            let scaled = BlsScalar::from(bias * SCALE);
            assert_eq!(scaled * inv_scale(), BlsScalar::from(bias));
        }
    }

    #[test]
    fn modulus_matches_field() {
        // r - 1 is the largest canonical element
        let minus_one = -BlsScalar::one();
        assert_eq!(to_biguint(&minus_one) + 1u32, modulus());
        assert_eq!(modulus().bits(), 255);
    }

    #[test]
    fn quotient_bound_is_tight() {
        let bound = quotient_bound();
        let domain = BigUint::from(UNIFORM_DOMAIN);
        let r = modulus();

        assert_eq!(bound.bits(), QUOTIENT_BITS as u64);
        assert!(&bound * &domain + (&domain - 1u32) < r);
        assert!((&bound + 2u32) * &domain > r);
        assert_eq!(from_biguint(&bound), quotient_max());
    }

    #[test]
    fn big_integer_conversion() {
        let value = BlsScalar::from(123_456_789u64);
        assert_eq!(to_biguint(&value), BigUint::from(123_456_789u64));

        let minus_one = -BlsScalar::one();
        assert_eq!(from_biguint(&to_biguint(&minus_one)), minus_one);
    }

    #[test]
    fn signed_embedding() {
        let five = BlsScalar::from(5u64);
        assert_eq!(scalar_from_i64(-5) + five, BlsScalar::zero());

        let big = 1i128 << 70;
        let sum = scalar_from_i128(-big) + scalar_from_i128(big);
        assert_eq!(sum, BlsScalar::zero());

        assert_eq!(to_biguint(&scalar_from_i64(42)), BigUint::from(42u32));
        assert_eq!(to_biguint(&scalar_from_i64(-1)), modulus() - 1u32);
    }
}
