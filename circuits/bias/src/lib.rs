// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! PLONK circuits proving that a bias was drawn correctly.
//!
//! [`BiasCircuit`] proves the whole pipeline, from the public nullifier and a
//! private secret to the public bias. [`UniformCircuit`] starts from a public
//! uniform sample and is used to check the table arithmetic against test
//! vectors.

mod bias;
mod error;
pub mod gadgets;
mod prover;
mod uniform;

pub use bias::BiasCircuit;
pub use error::Error;
pub use prover::{check_public_inputs, BiasProof, BiasProver, BiasVerifier};
pub use uniform::UniformCircuit;

/// Label of the proof transcript shared by every circuit of this crate.
pub const TRANSCRIPT_LABEL: &[u8] = b"bias-circuits";

/// Identifier of a circuit over the canonical table.
///
/// Changing the table or the circuit version yields a new identifier, which
/// invalidates cached keys.
fn circuit_id(name: &str, version: &str) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(version.as_bytes());
    hasher.update(&bias_core::CANONICAL.digest());
    hasher.finalize().into()
}
