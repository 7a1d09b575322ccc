// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Types and reference arithmetic for the bias circuit.
//!
//! A participant's bias is a number in `[0, 100]` that weights their vote.
//! It is obtained by hashing a public nullifier together with a private
//! secret, reducing the hash to a uniform sample in `[0, 10000)` and mapping
//! that sample through a piecewise-linear approximation of the Beta(2,5)
//! inverse CDF.
//!
//! This crate holds the compiled coefficient table, the native entropy
//! derivation and the reference evaluator. The evaluator performs exactly the
//! same arithmetic as the circuit in `bias-circuits`, so it can be used to
//! build witnesses, to generate test vectors and to settle outcomes when no
//! proof is required.

#![no_std]
#![deny(missing_docs)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod entropy;
mod error;
mod evaluator;
pub mod field;
pub mod table;

#[cfg(feature = "serde")]
pub mod interchange;
#[cfg(feature = "std")]
pub mod stats;
#[cfg(feature = "std")]
pub mod vectors;

pub use entropy::{Entropy, ENTROPY_DOMAIN};
pub use error::{Error, TableError};
pub use evaluator::{bias, evaluate, Evaluation, Outcome};
pub use table::{CoefficientTable, Segment, CANONICAL};

pub use dusk_bls12_381::BlsScalar;
